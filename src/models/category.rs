//! Category model
//!
//! Categories carry display metadata (icon, color) and an explicit sort
//! order. Every user starts with a seed of default categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, UserId};

/// A spending/income category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Owning user
    pub user_id: UserId,

    /// Category name
    pub name: String,

    /// Icon name or emoji
    #[serde(default)]
    pub icon: String,

    /// Display color as `#RRGGBB`
    #[serde(default = "default_color")]
    pub color: String,

    /// Whether this category came from the default seed
    #[serde(default)]
    pub is_default: bool,

    /// Sort order for display
    #[serde(default)]
    pub order: i32,

    /// When the category was created
    pub created_at: DateTime<Utc>,

    /// When the category was last modified
    pub updated_at: DateTime<Utc>,
}

fn default_color() -> String {
    "#94a3b8".to_string()
}

impl Category {
    /// Create a new category
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            user_id,
            name: name.into(),
            icon: String::new(),
            color: default_color(),
            is_default: false,
            order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set icon and color (builder style)
    pub fn with_style(mut self, icon: impl Into<String>, color: impl Into<String>) -> Self {
        self.icon = icon.into();
        self.color = color.into();
        self
    }

    /// Set sort order (builder style)
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Mark the category as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        if !is_hex_color(&self.color) {
            return Err(CategoryValidationError::InvalidColor(self.color.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Default categories seeded for new users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultCategory {
    Food,
    Transport,
    Housing,
    Utilities,
    Entertainment,
    Shopping,
    Health,
    Salary,
    Other,
}

impl DefaultCategory {
    /// Get all default categories in display order
    pub fn all() -> &'static [Self] {
        &[
            Self::Food,
            Self::Transport,
            Self::Housing,
            Self::Utilities,
            Self::Entertainment,
            Self::Shopping,
            Self::Health,
            Self::Salary,
            Self::Other,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Food => "Food & Dining",
            Self::Transport => "Transport",
            Self::Housing => "Housing",
            Self::Utilities => "Utilities",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Health => "Health",
            Self::Salary => "Salary",
            Self::Other => "Other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Food => "utensils",
            Self::Transport => "car",
            Self::Housing => "home",
            Self::Utilities => "zap",
            Self::Entertainment => "film",
            Self::Shopping => "shopping-bag",
            Self::Health => "heart",
            Self::Salary => "briefcase",
            Self::Other => "tag",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Food => "#f97316",
            Self::Transport => "#3b82f6",
            Self::Housing => "#8b5cf6",
            Self::Utilities => "#eab308",
            Self::Entertainment => "#ec4899",
            Self::Shopping => "#14b8a6",
            Self::Health => "#ef4444",
            Self::Salary => "#22c55e",
            Self::Other => "#94a3b8",
        }
    }

    /// Build the category row for a user
    pub fn to_category(&self, user_id: UserId, order: i32) -> Category {
        let mut category = Category::new(user_id, self.name())
            .with_style(self.icon(), self.color())
            .with_order(order);
        category.is_default = true;
        category
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::InvalidColor(color) => {
                write!(f, "Invalid color '{}' (expected #RRGGBB)", color)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let user = UserId::new();
        let category = Category::new(user, "Groceries");
        assert_eq!(category.name, "Groceries");
        assert_eq!(category.user_id, user);
        assert!(!category.is_default);
        assert!(category.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut category = Category::new(UserId::new(), "Valid");

        category.name = "  ".to_string();
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        category.name = "a".repeat(51);
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::NameTooLong(51))
        ));

        category.name = "Valid".to_string();
        category.color = "red".to_string();
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_default_seed() {
        let user = UserId::new();
        let defaults = DefaultCategory::all();
        assert_eq!(defaults.len(), 9);

        for (i, default) in defaults.iter().enumerate() {
            let category = default.to_category(user, i as i32);
            assert!(category.is_default);
            assert_eq!(category.order, i as i32);
            assert!(category.validate().is_ok(), "{} is invalid", category.name);
        }
    }

    #[test]
    fn test_serialization_defaults_missing_fields() {
        let category = Category::new(UserId::new(), "Books");
        let mut json = serde_json::to_value(&category).unwrap();
        json.as_object_mut().unwrap().remove("color");
        json.as_object_mut().unwrap().remove("order");

        let back: Category = serde_json::from_value(json).unwrap();
        assert_eq!(back.color, "#94a3b8");
        assert_eq!(back.order, 0);
    }
}
