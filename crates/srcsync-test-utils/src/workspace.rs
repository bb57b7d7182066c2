//! [`TestWorkspace`] builder for sync and check scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary output and cache directories plus a manifest location.
///
/// The manifest is written inside the output directory with
/// `output_dir: ./`, mirroring the most common real-world setup.
///
/// # Example
///
/// ```rust,no_run
/// use srcsync_test_utils::workspace::{TestWorkspace, manifest_yaml};
///
/// let ws = TestWorkspace::new();
/// ws.write_manifest(&manifest_yaml("/srv/git/roles", "master", &[("roles", "roles2")]));
/// ws.assert_exists("roles2/dummyrole1/tasks/main.yml");
/// ```
pub struct TestWorkspace {
    output: TempDir,
    cache: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create empty output and cache directories.
    pub fn new() -> Self {
        Self {
            output: TempDir::new().unwrap(),
            cache: TempDir::new().unwrap(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        self.output.path()
    }

    pub fn cache_dir(&self) -> &Path {
        self.cache.path()
    }

    /// Path the manifest is written to.
    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir().join("manifest.yml")
    }

    /// Write (or overwrite) the manifest and return its path.
    pub fn write_manifest(&self, content: &str) -> PathBuf {
        let path = self.manifest_path();
        fs::write(&path, content).unwrap();
        path
    }

    /// Absolute path of `relative` inside the output directory.
    pub fn output_path(&self, relative: &str) -> PathBuf {
        self.output_dir().join(relative)
    }

    /// Assert that `relative` exists in the output directory.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, relative: &str) {
        let full_path = self.output_path(relative);
        assert!(
            full_path.exists(),
            "Expected output path to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `relative` does **not** exist in the output directory.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_missing(&self, relative: &str) {
        let full_path = self.output_path(relative);
        assert!(
            !full_path.exists(),
            "Expected output path NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `relative` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, relative: &str, content: &str) {
        let full_path = self.output_path(relative);
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

/// Build a single-repository manifest with `output_dir: ./`.
///
/// Every `src`/`dst` is single-quoted so globs and empty destinations
/// survive YAML parsing.
pub fn manifest_yaml(url: &str, version: &str, pairs: &[(&str, &str)]) -> String {
    let mut manifest = format!(
        "---\noutput_dir: ./\nrepos:\n- id: testrepo\n  url: '{url}'\n  version: '{version}'\n  copy:"
    );
    for (src, dst) in pairs {
        manifest.push_str(&format!("\n  - src: '{src}'\n    dst: '{dst}'"));
    }
    manifest.push('\n');
    manifest
}
