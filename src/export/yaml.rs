//! YAML Export functionality
//!
//! Exports one user's complete data to YAML for a human-readable backup.

use crate::error::{FinsightError, FinsightResult};
use crate::export::json::FullExport;
use crate::models::UserId;
use crate::storage::Storage;
use std::io::Write;

/// Export a user's data to YAML
pub fn export_full_yaml<W: Write>(storage: &Storage, user_id: UserId, writer: &mut W) -> FinsightResult<()> {
    let export = FullExport::from_storage(storage, user_id)?;

    let header = format!(
        "# finsight export\n# Generated: {}\n# App Version: {}\n#\n# Keep it private - it contains all your financial data.\n\n",
        export.exported_at, export.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| FinsightError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FinsightPaths;
    use crate::models::Category;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_export() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open(FinsightPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let user = UserId::new();
        storage.categories.upsert(Category::new(user, "Groceries")).unwrap();

        let mut output = Vec::new();
        export_full_yaml(&storage, user, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("# finsight export"));
        assert!(text.contains("schema_version"));
        assert!(text.contains("Groceries"));
    }
}
