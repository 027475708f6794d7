//! Owned handle to the active configuration.

use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::ConfigError;
use super::types::Config;

/// Holds the active [`Config`] and the file it came from.
///
/// Consumers take an `Arc<Config>` snapshot with [`current`](Self::current)
/// and read it without locking. [`reload`](Self::reload) builds a complete
/// new instance before swapping the pointer, so a broken file never replaces
/// a working configuration and no reader observes a partial update.
#[derive(Debug)]
pub struct ConfigHandle {
    path: PathBuf,
    active: RwLock<Arc<Config>>,
}

impl ConfigHandle {
    /// Load the initial configuration from `path`.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = Config::load(&path)?;
        Ok(Self {
            path,
            active: RwLock::new(Arc::new(config)),
        })
    }

    /// Path the configuration is (re)loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the active configuration.
    pub fn current(&self) -> Arc<Config> {
        self.active.read().clone()
    }

    /// Re-read the file and, if it is valid, make it the active configuration.
    ///
    /// On error the previous configuration stays active.
    pub fn reload(&self) -> Result<Arc<Config>, ConfigError> {
        let next = Arc::new(Config::load(&self.path)?);
        *self.active.write() = Arc::clone(&next);
        tracing::info!(
            path = %self.path.display(),
            rules = next.firewall.len(),
            "Configuration reloaded"
        );
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reload_swaps_in_new_config() {
        let file = write_config("[daemon]\nfirewall-chain-name = \"one\"\n");
        let handle = ConfigHandle::load(file.path()).unwrap();
        let before = handle.current();
        assert_eq!(before.daemon.firewall_chain_name, "one");

        std::fs::write(file.path(), "[daemon]\nfirewall-chain-name = \"two\"\n").unwrap();
        let after = handle.reload().unwrap();

        assert_eq!(after.daemon.firewall_chain_name, "two");
        assert_eq!(handle.current().daemon.firewall_chain_name, "two");
        // Earlier snapshots are untouched.
        assert_eq!(before.daemon.firewall_chain_name, "one");
    }

    #[test]
    fn failed_reload_keeps_previous_config() {
        let file = write_config("[daemon]\nfirewall-chain-name = \"one\"\n");
        let handle = ConfigHandle::load(file.path()).unwrap();

        std::fs::write(file.path(), "[daemon]\nfirewall-deny-method = \"block\"\n").unwrap();
        let err = handle.reload().unwrap_err();

        assert_eq!(err.option(), Some("firewall-deny-method"));
        assert_eq!(handle.current().daemon.firewall_chain_name, "one");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ConfigHandle::load("/nonexistent/portknob.toml").unwrap_err();
        assert_eq!(err.kind(), "load");
    }
}
