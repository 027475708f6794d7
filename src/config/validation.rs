//! Configuration validation.
//!
//! Runs after defaults are applied and stops at the first violation, in
//! this order: deny method, whitelist prefixes, then each firewall rule in
//! declaration order.

use super::defaults::{DefaultedConfig, DefaultedDaemon};
use super::error::ConfigError;
use super::firewall::{DenyMethod, FirewallRule};
use super::types::{Config, DaemonSettings};

const IPV4_BITS: u32 = 32;
const IPV6_BITS: u32 = 128;

/// Validate a defaulted configuration, returning the first error found.
pub(crate) fn validate(config: DefaultedConfig) -> Result<Config, ConfigError> {
    let daemon = validate_daemon(config.daemon)?;

    let firewall = config
        .firewall
        .into_iter()
        .map(FirewallRule::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Config {
        daemon,
        firewall,
        secrets: config.secrets,
    })
}

fn validate_daemon(daemon: DefaultedDaemon) -> Result<DaemonSettings, ConfigError> {
    let firewall_deny_method: DenyMethod = daemon.firewall_deny_method.parse()?;
    let ipv4_prefix = prefix("ipv4-prefix", daemon.ipv4_prefix, IPV4_BITS)?;
    let ipv6_prefix = prefix("ipv6-prefix", daemon.ipv6_prefix, IPV6_BITS)?;

    Ok(DaemonSettings {
        listen: daemon.listen,
        verbose: daemon.verbose,
        http_path: daemon.http_path,
        client_ip: daemon.client_ip,
        ipv4_prefix,
        ipv6_prefix,
        cache_database: daemon.cache_database,
        cookie_lifespan: daemon.cookie_lifespan,
        firewall_lifespan: daemon.firewall_lifespan,
        firewall_chain_name: daemon.firewall_chain_name,
        firewall_deny_method,
    })
}

fn prefix(option: &str, value: u32, bits: u32) -> Result<u8, ConfigError> {
    if value > bits {
        return Err(ConfigError::invalid(option, value.to_string()));
    }
    u8::try_from(value).map_err(|_| ConfigError::invalid(option, value.to_string()))
}
