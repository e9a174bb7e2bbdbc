//! First-run setup

use tracing::info;

use crate::config::paths::FinsightPaths;
use crate::error::FinsightResult;
use crate::models::{Category, DefaultCategory, UserId};

use super::Storage;

/// Create the directory layout for a fresh installation
pub fn initialize_storage(paths: &FinsightPaths) -> FinsightResult<()> {
    paths.ensure_directories()
}

/// Give a user the default category set if they have no categories yet.
///
/// Returns the categories that were created (empty when the user already had
/// some). Persists the categories table.
pub fn seed_default_categories(storage: &Storage, user_id: UserId) -> FinsightResult<Vec<Category>> {
    if storage.categories.count(user_id)? > 0 {
        return Ok(Vec::new());
    }

    let seeded: Vec<Category> = DefaultCategory::all()
        .iter()
        .enumerate()
        .map(|(i, default)| default.to_category(user_id, i as i32))
        .collect();

    for category in &seeded {
        storage.categories.upsert(category.clone())?;
    }
    storage.categories.save()?;

    info!(user = %user_id, count = seeded.len(), "seeded default categories");
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinsightPaths::with_base_dir(temp_dir.path().join("fresh"));

        initialize_storage(&paths).unwrap();
        assert!(paths.data_dir().exists());
        assert!(paths.export_dir().exists());
    }

    #[test]
    fn test_seed_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(FinsightPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let user = UserId::new();

        let first = seed_default_categories(&storage, user).unwrap();
        assert_eq!(first.len(), DefaultCategory::all().len());
        assert!(first.iter().all(|c| c.is_default));

        let second = seed_default_categories(&storage, user).unwrap();
        assert!(second.is_empty());
        assert_eq!(storage.categories.count(user).unwrap(), first.len());

        // Another user gets their own copy
        let other = seed_default_categories(&storage, UserId::new()).unwrap();
        assert_eq!(other.len(), first.len());
    }
}
