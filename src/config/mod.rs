//! Configuration layer for netconfig.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! For filter patterns (`include_adapters`, `exclude_adapters`), CLI patterns **replace**
//! TOML patterns entirely (not merged). Include and exclude lists are replaced
//! independently: `--include-adapter` leaves TOML excludes in place.
//!
//! # Boolean Flag Semantics
//!
//! `--compact` uses OR semantics: if set in either CLI or TOML, output is
//! single-line. Flags only enable, never disable.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod cli_tests;
#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
