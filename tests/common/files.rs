//! Temporary config files.

use portknob::ConfigError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// A config file living in the system temp directory for the test's lifetime.
pub struct TestConfig {
    file: NamedTempFile,
}

impl TestConfig {
    pub fn new(contents: &str) -> Self {
        let mut file = NamedTempFile::new().expect("create temp config");
        file.write_all(contents.as_bytes()).expect("write temp config");
        Self { file }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Replace the file contents in place, keeping the path.
    #[allow(dead_code)]
    pub fn rewrite(&self, contents: &str) {
        std::fs::write(self.file.path(), contents).expect("rewrite temp config");
    }
}

/// Assert that `err` is an `InvalidOption` for `option` rejecting `value`.
#[allow(dead_code)]
pub fn assert_invalid_option(err: &ConfigError, option: &str, value: &str) {
    match err {
        ConfigError::InvalidOption {
            option: got_option,
            value: got_value,
        } => {
            assert_eq!(got_option, option);
            assert_eq!(got_value, value);
        }
        other => panic!("expected InvalidOption({option}, {value}), got {other:?}"),
    }
}
