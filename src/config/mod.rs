//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Root config struct, daemon settings and the load pipeline
//! - [`defaults`]: Documented default values and the defaulting pass
//! - [`firewall`]: Firewall rule types (protocol, destination, ports, redirect)
//! - [`schema`]: Unknown-key detection against the known option names
//! - [`validation`]: Semantic checks turning raw values into typed ones
//! - [`handle`]: Owned handle with build-new-then-swap reload

mod defaults;
mod error;
mod firewall;
mod handle;
mod schema;
mod types;
mod validation;

pub use defaults::{
    DEFAULT_CACHE_DATABASE, DEFAULT_CLIENT_IP, DEFAULT_FIREWALL_CHAIN_NAME, DEFAULT_HTTP_PATH,
    DEFAULT_IPV4_PREFIX, DEFAULT_IPV6_PREFIX, DEFAULT_LIFESPAN_SECS, DEFAULT_LISTEN,
};
pub use error::ConfigError;
pub use firewall::{DenyMethod, Destination, FirewallRule, PortSpec, Protocol, Redirect};
pub use handle::ConfigHandle;
pub use types::{Config, DaemonSettings, Secrets};
