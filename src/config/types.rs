//! Core configuration types and loading.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::ConfigError;
use super::firewall::{DenyMethod, FirewallRule, RawRule};
use super::schema;
use super::validation;

/// Validated daemon configuration.
///
/// Built once by [`Config::load`] and never mutated afterwards; share it as
/// `Arc<Config>` (see [`super::ConfigHandle`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `[daemon]` settings, fully defaulted.
    pub daemon: DaemonSettings,
    /// `[[firewall]]` rules in declaration order.
    pub firewall: Vec<FirewallRule>,
    /// `[secrets]` table, opaque to the configuration core.
    pub secrets: Secrets,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loading configuration");
        Self::from_toml_str(&content)
    }

    /// Parse, default and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let document: toml::Table = toml::from_str(content)?;
        if let Some(key) = schema::find_unknown_key(&document) {
            return Err(ConfigError::UnknownOption(key));
        }

        let raw: RawConfig = toml::Value::Table(document).try_into()?;
        let config = validation::validate(raw.with_defaults())?;
        tracing::debug!(
            rules = config.firewall.len(),
            secrets = config.secrets.len(),
            "Configuration validated"
        );
        Ok(config)
    }
}

/// `[daemon]` settings after defaults and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonSettings {
    /// HTTP address and port to listen on.
    pub listen: String,
    /// Debug verbosity for firewall operations.
    pub verbose: u32,
    /// HTTP path to provide service on.
    pub http_path: String,
    /// HTTP header set by the load balancer carrying the visitor's IP address.
    pub client_ip: String,
    /// IPv4 subnet prefix added to the firewall whitelist.
    pub ipv4_prefix: u8,
    /// IPv6 subnet prefix added to the firewall whitelist.
    pub ipv6_prefix: u8,
    /// File storing the cache database.
    pub cache_database: PathBuf,
    /// How long the visitor's browser caches authorization. Zero disables it.
    pub cookie_lifespan: Duration,
    /// How long a visitor stays on the firewall whitelist. Zero disables it.
    pub firewall_lifespan: Duration,
    /// Firewall chain portknob owns.
    pub firewall_chain_name: String,
    /// Action applied to unauthorized clients.
    pub firewall_deny_method: DenyMethod,
}

/// `[secrets]` table: secret name to secret value.
///
/// `Debug` prints names only.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secrets(HashMap<String, String>);

impl Secrets {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_map()
            .entries(names.into_iter().map(|name| (name, "<redacted>")))
            .finish()
    }
}

/// Config file as decoded, before defaults and validation.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawConfig {
    #[serde(default)]
    pub daemon: RawDaemon,
    #[serde(default)]
    pub firewall: Vec<RawRule>,
    #[serde(default)]
    pub secrets: Secrets,
}

/// `[daemon]` table as decoded. `None` means the option was not written.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct RawDaemon {
    pub listen: Option<String>,
    pub verbose: Option<u32>,
    pub http_path: Option<String>,
    pub client_ip: Option<String>,
    pub ipv4_prefix: Option<u32>,
    pub ipv6_prefix: Option<u32>,
    pub cache_database: Option<PathBuf>,
    pub cookie_lifespan: Option<u64>,
    pub firewall_lifespan: Option<u64>,
    pub firewall_chain_name: Option<String>,
    pub firewall_deny_method: Option<String>,
}
