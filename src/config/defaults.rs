//! Default values for `[daemon]` options.
//!
//! Separated into its own module so the documented defaults live in one place.

use std::path::PathBuf;
use std::time::Duration;

use super::firewall::RawRule;
use super::types::{RawConfig, RawDaemon, Secrets};

pub const DEFAULT_LISTEN: &str = "[::1]:706";
pub const DEFAULT_HTTP_PATH: &str = "/";
pub const DEFAULT_CLIENT_IP: &str = "X-Real-IP";
pub const DEFAULT_IPV4_PREFIX: u8 = 24;
pub const DEFAULT_IPV6_PREFIX: u8 = 48;
pub const DEFAULT_CACHE_DATABASE: &str = "/var/cache/portknob.db";
/// Seven days.
pub const DEFAULT_LIFESPAN_SECS: u64 = 604_800;
pub const DEFAULT_FIREWALL_CHAIN_NAME: &str = "portknob";
pub const DEFAULT_FIREWALL_DENY_METHOD: &str = "reject";

/// Config with every `[daemon]` option filled in but not yet validated.
#[derive(Debug)]
pub(crate) struct DefaultedConfig {
    pub daemon: DefaultedDaemon,
    pub firewall: Vec<RawRule>,
    pub secrets: Secrets,
}

/// `[daemon]` with defaults applied. The deny method and prefixes are still
/// raw: they are checked by validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultedDaemon {
    pub listen: String,
    pub verbose: u32,
    pub http_path: String,
    pub client_ip: String,
    pub ipv4_prefix: u32,
    pub ipv6_prefix: u32,
    pub cache_database: PathBuf,
    pub cookie_lifespan: Duration,
    pub firewall_lifespan: Duration,
    pub firewall_chain_name: String,
    pub firewall_deny_method: String,
}

impl RawConfig {
    /// Fill unset `[daemon]` options. Firewall rules and secrets have no
    /// implicit defaults and pass through untouched.
    pub(crate) fn with_defaults(self) -> DefaultedConfig {
        DefaultedConfig {
            daemon: self.daemon.with_defaults(),
            firewall: self.firewall,
            secrets: self.secrets,
        }
    }
}

impl RawDaemon {
    /// Absent options and empty strings take the documented default.
    /// Numbers are only defaulted when absent, so an explicit `0` is kept.
    pub(crate) fn with_defaults(self) -> DefaultedDaemon {
        DefaultedDaemon {
            listen: text_or_default("listen", self.listen, DEFAULT_LISTEN),
            verbose: self.verbose.unwrap_or(0),
            http_path: text_or_default("http-path", self.http_path, DEFAULT_HTTP_PATH),
            client_ip: text_or_default("client-ip", self.client_ip, DEFAULT_CLIENT_IP),
            ipv4_prefix: number_or_default(
                "ipv4-prefix",
                self.ipv4_prefix,
                DEFAULT_IPV4_PREFIX.into(),
            ),
            ipv6_prefix: number_or_default(
                "ipv6-prefix",
                self.ipv6_prefix,
                DEFAULT_IPV6_PREFIX.into(),
            ),
            cache_database: match self.cache_database {
                Some(path) if !path.as_os_str().is_empty() => path,
                _ => {
                    tracing::debug!(
                        option = "cache-database",
                        default = DEFAULT_CACHE_DATABASE,
                        "Using default"
                    );
                    PathBuf::from(DEFAULT_CACHE_DATABASE)
                }
            },
            cookie_lifespan: lifespan_or_default("cookie-lifespan", self.cookie_lifespan),
            firewall_lifespan: lifespan_or_default("firewall-lifespan", self.firewall_lifespan),
            firewall_chain_name: text_or_default(
                "firewall-chain-name",
                self.firewall_chain_name,
                DEFAULT_FIREWALL_CHAIN_NAME,
            ),
            firewall_deny_method: text_or_default(
                "firewall-deny-method",
                self.firewall_deny_method,
                DEFAULT_FIREWALL_DENY_METHOD,
            ),
        }
    }
}

fn text_or_default(option: &str, value: Option<String>, default: &str) -> String {
    match value {
        Some(value) if !value.is_empty() => value,
        _ => {
            tracing::debug!(option, default, "Using default");
            default.to_string()
        }
    }
}

fn number_or_default<T: std::fmt::Display>(option: &str, value: Option<T>, default: T) -> T {
    value.unwrap_or_else(|| {
        tracing::debug!(option, %default, "Using default");
        default
    })
}

fn lifespan_or_default(option: &str, secs: Option<u64>) -> Duration {
    Duration::from_secs(number_or_default(option, secs, DEFAULT_LIFESPAN_SECS))
}
