//! Integration test common infrastructure.
//!
//! Provides helpers for writing config files to temporary locations and
//! asserting on configuration errors.

pub mod files;

#[allow(unused_imports)]
pub use files::{TestConfig, assert_invalid_option};
