//! Savings goal model
//!
//! Goals are independent of transactions: the user moves money toward a
//! goal by hand.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GoalId, UserId};
use super::money::Money;

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub user_id: UserId,
    pub name: String,
    pub target_amount: Money,
    #[serde(default)]
    pub current_amount: Money,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Create a new goal with nothing saved yet
    pub fn new(user_id: UserId, name: impl Into<String>, target_amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: GoalId::new(),
            user_id,
            name: name.into(),
            target_amount,
            current_amount: Money::zero(),
            icon: "target".to_string(),
            color: "#22c55e".to_string(),
            deadline: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set a deadline (builder style)
    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Percentage of the target saved so far; 0 when the target is zero.
    /// Not capped: an over-funded goal reports more than 100.
    pub fn progress_percent(&self) -> f64 {
        if self.target_amount.is_zero() {
            return 0.0;
        }
        self.current_amount.to_f64() / self.target_amount.to_f64() * 100.0
    }

    /// Amount still missing (never negative)
    pub fn remaining(&self) -> Money {
        let remaining = self.target_amount - self.current_amount;
        if remaining.is_negative() {
            Money::zero()
        } else {
            remaining
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Add money to the goal
    pub fn contribute(&mut self, amount: Money) {
        self.current_amount += amount;
        self.updated_at = Utc::now();
    }

    /// Take money out of the goal, never going below zero. Returns the
    /// amount actually withdrawn.
    pub fn withdraw(&mut self, amount: Money) -> Money {
        let taken = if amount > self.current_amount {
            self.current_amount
        } else {
            amount
        };
        self.current_amount -= taken;
        self.updated_at = Utc::now();
        taken
    }

    /// Days until the deadline (negative when overdue)
    pub fn days_until_deadline(&self, today: NaiveDate) -> Option<i64> {
        self.deadline.map(|d| (d - today).num_days())
    }

    /// Validate the goal
    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.name.trim().is_empty() {
            return Err(GoalValidationError::EmptyName);
        }
        if !self.target_amount.is_positive() {
            return Err(GoalValidationError::NonPositiveTarget);
        }
        if self.current_amount.is_negative() {
            return Err(GoalValidationError::NegativeCurrent);
        }
        Ok(())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} / {}",
            self.name, self.current_amount, self.target_amount
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyName,
    NonPositiveTarget,
    NegativeCurrent,
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Goal name cannot be empty"),
            Self::NonPositiveTarget => write!(f, "Goal target must be greater than zero"),
            Self::NegativeCurrent => write!(f, "Saved amount cannot be negative"),
        }
    }
}

impl std::error::Error for GoalValidationError {}
