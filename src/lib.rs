//! portknob - port knocking daemon with web interface.
//!
//! This crate holds the configuration core shared by the daemon's HTTP
//! listener and firewall-rule manager: it loads `portknob.toml`, fills in
//! defaults, validates every constrained option and hands out an immutable
//! [`Config`] snapshot.

pub mod config;
pub mod telemetry;

pub use config::{Config, ConfigError, ConfigHandle};
