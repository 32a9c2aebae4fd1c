//! Store location and opening.
//!
//! The database path comes from `--db`, then `COMPOUNDER_DB`, then a
//! platform-specific default.

use compounder_data::{DataError, SqliteStore};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Get the default data directory path.
///
/// Uses platform-specific data directories:
/// - Linux: `~/.local/share/compounder/`
/// - macOS: `~/Library/Application Support/compounder/`
/// - Windows: `%APPDATA%\compounder\`
pub(crate) fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("compounder")
}

/// Get the default database path.
pub(crate) fn default_db_path() -> PathBuf {
    default_data_dir().join("compounder.db")
}

/// Get the configured database path.
pub(crate) fn resolve_db_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(default_db_path, Path::to_path_buf)
}

/// Open the store, creating the directory if needed.
pub(crate) fn open_store(explicit: Option<&Path>) -> Result<SqliteStore, DataError> {
    let db_path = resolve_db_path(explicit);

    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    debug!(path = %db_path.display(), "opening store");
    SqliteStore::new(&db_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_ends_with_db_name() {
        let path = default_db_path();
        assert!(path.ends_with("compounder/compounder.db"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_db_path(Some(Path::new("/tmp/x.db")));
        assert_eq!(path, PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn test_open_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("c.db");
        let store = open_store(Some(&db)).unwrap();
        assert_eq!(store.stats().unwrap().companies, 0);
        assert!(db.exists());
    }
}
