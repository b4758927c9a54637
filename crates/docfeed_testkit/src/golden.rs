//! Golden test utilities for feed output.
//!
//! Compares encoded feeds against checked-in `.golden` files. Set
//! `UPDATE_GOLDEN=1` to rewrite the files from the current output.

use std::fs;
use std::path::{Path, PathBuf};

/// A golden test that compares output against expected files.
#[derive(Debug)]
pub struct GoldenTest {
    name: String,
    golden_dir: PathBuf,
    update_mode: bool,
}

impl GoldenTest {
    /// Creates a golden test reading files from `golden_dir`.
    pub fn new(name: impl Into<String>, golden_dir: impl AsRef<Path>) -> Self {
        Self {
            name: name.into(),
            golden_dir: golden_dir.as_ref().to_path_buf(),
            update_mode: std::env::var("UPDATE_GOLDEN").is_ok(),
        }
    }

    /// Forces update mode on or off regardless of the environment.
    #[must_use]
    pub fn updating(mut self, update: bool) -> Self {
        self.update_mode = update;
        self
    }

    /// Asserts that `actual` matches the golden file.
    ///
    /// In update mode the golden file is written instead.
    pub fn assert_text(&self, suffix: &str, actual: &str) {
        let path = self.file_path(suffix);

        if self.update_mode {
            self.update_golden_file(&path, actual.as_bytes());
            return;
        }

        if !path.exists() {
            panic!(
                "Golden file not found: {:?}\n\
                 Run with UPDATE_GOLDEN=1 to create it.\n\
                 Actual:\n{}",
                path, actual
            );
        }

        let expected = fs::read_to_string(&path).expect("Failed to read golden file");

        if actual != expected {
            panic!(
                "Golden test '{}' failed for '{}':\n\
                 --- Expected ---\n{}\n\
                 --- Actual ---\n{}\n\
                 {}\n\
                 Run with UPDATE_GOLDEN=1 to update.",
                self.name,
                suffix,
                expected,
                actual,
                first_difference(&expected, actual)
            );
        }
    }

    fn file_path(&self, suffix: &str) -> PathBuf {
        let filename = if suffix.is_empty() {
            format!("{}.golden", self.name)
        } else {
            format!("{}_{}.golden", self.name, suffix)
        };
        self.golden_dir.join(filename)
    }

    fn update_golden_file(&self, path: &Path, data: &[u8]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create golden directory");
        }
        fs::write(path, data).expect("Failed to write golden file");
        println!("Updated golden file: {:?}", path);
    }
}

/// Describes the first line where two texts differ.
pub fn first_difference(expected: &str, actual: &str) -> String {
    let mut expected_lines = expected.lines();
    let mut actual_lines = actual.lines();
    let mut line = 1;
    loop {
        match (expected_lines.next(), actual_lines.next()) {
            (None, None) => return "texts differ only in trailing newlines".to_string(),
            (e, a) if e == a => line += 1,
            (e, a) => {
                return format!(
                    "first difference at line {line}:\n  expected: {}\n  actual:   {}",
                    e.unwrap_or("<end>"),
                    a.unwrap_or("<end>")
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn update_then_compare() {
        let dir = TempDir::new().unwrap();
        GoldenTest::new("feed", dir.path())
            .updating(true)
            .assert_text("small", "<gsafeed/>\n");
        assert!(dir.path().join("feed_small.golden").exists());
        GoldenTest::new("feed", dir.path())
            .updating(false)
            .assert_text("small", "<gsafeed/>\n");
    }

    #[test]
    #[should_panic(expected = "Golden test 'feed' failed")]
    fn mismatch_panics() {
        let dir = TempDir::new().unwrap();
        GoldenTest::new("feed", dir.path())
            .updating(true)
            .assert_text("", "a\nb\n");
        GoldenTest::new("feed", dir.path())
            .updating(false)
            .assert_text("", "a\nc\n");
    }

    #[test]
    fn difference_report() {
        assert_eq!(
            first_difference("a\nb", "a\nc"),
            "first difference at line 2:\n  expected: b\n  actual:   c"
        );
        assert_eq!(
            first_difference("a\n", "a"),
            "texts differ only in trailing newlines"
        );
    }
}
