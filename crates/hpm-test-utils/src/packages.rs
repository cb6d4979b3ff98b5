//! [`TestPackages`] builder for package manager test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

/// A temporary Houdini user preference directory laid out as
/// `<root>/packages/*.json` with plugin folders alongside.
///
/// # Example
///
/// ```rust,no_run
/// use hpm_test_utils::packages::TestPackages;
/// use serde_json::json;
///
/// let packages = TestPackages::new();
/// let plugin = packages.plugin_dir("MOPS");
/// packages.write_config("MOPS.json", &json!({"hpath": plugin}));
/// packages.assert_file_contains("packages/MOPS.json", "MOPS");
/// ```
pub struct TestPackages {
    temp_dir: TempDir,
}

impl Default for TestPackages {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPackages {
    /// Create a temporary preference directory with an empty `packages/`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("packages")).unwrap();
        Self { temp_dir }
    }

    /// Root of the preference directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The `packages/` folder inside the root.
    pub fn packages_dir(&self) -> PathBuf {
        self.root().join("packages")
    }

    /// Create `<root>/plugins/<name>` and return it as a forward-slash string,
    /// the form package configs use.
    pub fn plugin_dir(&self, name: &str) -> String {
        let dir = self.root().join("plugins").join(name);
        fs::create_dir_all(&dir).unwrap();
        dir.to_string_lossy().replace('\\', "/")
    }

    /// Write `value` as pretty JSON to `packages/<file_name>`.
    pub fn write_config(&self, file_name: &str, value: &Value) -> PathBuf {
        let text = serde_json::to_string_pretty(value).unwrap();
        self.write_raw_config(file_name, &text)
    }

    /// Write arbitrary text to `packages/<file_name>`, for malformed configs.
    pub fn write_raw_config(&self, file_name: &str, text: &str) -> PathBuf {
        let path = self.packages_dir().join(file_name);
        fs::write(&path, text)
            .unwrap_or_else(|e| panic!("Could not write config {}: {e}", path.display()));
        path
    }

    /// Read and parse `packages/<file_name>`.
    ///
    /// # Panics
    /// Panics if the file is missing or not valid JSON.
    pub fn read_config(&self, file_name: &str) -> Value {
        let path = self.packages_dir().join(file_name);
        let text = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read config: {}", path.display()));
        serde_json::from_str(&text)
            .unwrap_or_else(|e| panic!("Config {} is not valid JSON: {e}", path.display()))
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to the root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}
