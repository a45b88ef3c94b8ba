//! Default values for configuration options.
//!
//! Centralized constants to avoid magic values scattered across the codebase.

/// Default output format is indented JSON.
pub const PRETTY: bool = true;

/// Default path written by `netconfig init`.
pub const CONFIG_FILE: &str = "netconfig.toml";
