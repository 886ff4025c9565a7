//! Path utilities for locating workspace files from tests.

use std::path::PathBuf;

/// Returns the workspace root directory.
///
/// This is determined by walking up from the test-utils manifest directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Path of the checked-in service configuration, `config/dashboard.yaml`.
pub fn dashboard_config_path() -> PathBuf {
    workspace_root().join("config").join("dashboard.yaml")
}

/// Creates a temporary directory for test files.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// Write `contents` to `name` inside a fresh temporary directory.
///
/// Returns the directory guard together with the file path.
pub fn write_temp_file(name: &str, contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = temp_test_dir();
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("Failed to write temporary test file");
    (dir, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_is_valid() {
        let root = workspace_root();
        assert!(
            root.join("Cargo.toml").exists(),
            "Workspace root should contain Cargo.toml: {:?}",
            root
        );
    }

    #[test]
    fn test_dashboard_config_exists() {
        assert!(dashboard_config_path().exists());
    }

    #[test]
    fn test_write_temp_file() {
        let (_dir, path) = write_temp_file("sample.yaml", "default_city: Cotonou\n");
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "default_city: Cotonou\n"
        );
    }
}
