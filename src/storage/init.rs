//! First-run setup

use tracing::info;

use crate::config::paths::PocketPaths;
use crate::error::PocketError;
use crate::models::{Category, STANDARD_CATEGORIES};

use super::file_io::write_json_atomic;

/// Prepare a fresh data directory
///
/// Seeds the built-in categories unless a categories file already exists.
/// Returns the number of categories created.
pub fn initialize_storage(paths: &PocketPaths) -> Result<usize, PocketError> {
    paths.ensure_directories()?;

    if paths.categories_file().exists() {
        return Ok(0);
    }

    let categories: Vec<Category> = STANDARD_CATEGORIES.iter().map(Category::built_in).collect();
    write_json_atomic(paths.categories_file(), &categories)?;

    info!(count = categories.len(), "seeded built-in categories");
    Ok(categories.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use tempfile::TempDir;

    #[test]
    fn test_seeds_built_ins_once() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(initialize_storage(&paths).unwrap(), STANDARD_CATEGORIES.len());
        assert_eq!(initialize_storage(&paths).unwrap(), 0);

        let storage = Storage::open(paths).unwrap();
        let categories = storage.categories.get_all().unwrap();
        assert_eq!(categories.len(), STANDARD_CATEGORIES.len());
        assert!(categories.iter().all(Category::is_built_in));
        assert!(categories
            .iter()
            .any(|c| c.standard_key.as_deref() == Some("food_drink")));
    }
}
