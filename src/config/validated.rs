//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::network::filter::{FilterChain, NameRegexFilter};

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Host name override. `None` means resolve the machine name.
    pub host: Option<String>,

    /// Snapshot file to read instead of the operating system.
    pub snapshot: Option<PathBuf>,

    /// Output file. `None` means stdout.
    pub output: Option<PathBuf>,

    /// Indented (true) or single-line (false) JSON.
    pub pretty: bool,

    /// Adapter name filters applied before the report is built
    pub filter: FilterChain,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path_or = |path: Option<&PathBuf>, fallback: &str| {
            path.map_or_else(|| fallback.to_string(), |p| p.display().to_string())
        };

        write!(
            f,
            "Config {{ host: {}, source: {}, output: {}, pretty: {}, filters: +{}/-{} }}",
            self.host.as_deref().unwrap_or("<resolved>"),
            path_or(self.snapshot.as_ref(), "platform"),
            path_or(self.output.as_ref(), "stdout"),
            self.pretty,
            self.filter.include_count(),
            self.filter.exclude_count(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The host override is blank
    /// - A snapshot or output path is empty
    /// - Regex patterns are invalid
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let host = Self::resolve_host(cli, toml)?;

        let snapshot = Self::resolve_path(
            field::SNAPSHOT,
            cli.snapshot.as_deref(),
            toml.and_then(|t| t.source.snapshot.as_deref()),
        )?;

        let output = Self::resolve_path(
            field::OUTPUT,
            cli.output.as_deref(),
            toml.and_then(|t| t.output.path.as_deref()),
        )?;

        // Flags only enable: compact in either source wins
        let compact = cli.compact || toml.is_some_and(|t| t.report.compact);
        let pretty = !compact && defaults::PRETTY;

        let filter = Self::build_filter(cli, toml)?;

        Ok(Self {
            host,
            snapshot,
            output,
            pretty,
            filter,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_host(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Option<String>, ConfigError> {
        let host = cli
            .host
            .as_deref()
            .or_else(|| toml.and_then(|t| t.report.host.as_deref()));

        match host {
            Some(h) if h.trim().is_empty() => {
                Err(ConfigError::invalid(field::HOST, "must not be empty"))
            }
            Some(h) => Ok(Some(h.trim().to_string())),
            None => Ok(None),
        }
    }

    fn resolve_path(
        name: &'static str,
        cli: Option<&Path>,
        toml: Option<&Path>,
    ) -> Result<Option<PathBuf>, ConfigError> {
        match cli.or(toml) {
            Some(p) if p.as_os_str().is_empty() => {
                Err(ConfigError::invalid(name, "path must not be empty"))
            }
            Some(p) => Ok(Some(p.to_path_buf())),
            None => Ok(None),
        }
    }

    fn build_filter(cli: &Cli, toml: Option<&TomlConfig>) -> Result<FilterChain, ConfigError> {
        // CLI patterns replace TOML patterns, per list
        let includes = if cli.include_adapters.is_empty() {
            toml.map_or(&[][..], |t| t.filter.include.as_slice())
        } else {
            cli.include_adapters.as_slice()
        };
        let excludes = if cli.exclude_adapters.is_empty() {
            toml.map_or(&[][..], |t| t.filter.exclude.as_slice())
        } else {
            cli.exclude_adapters.as_slice()
        };

        let mut filter = FilterChain::new();
        for pattern in includes {
            filter = filter.include(compile(pattern)?);
        }
        for pattern in excludes {
            filter = filter.exclude(compile(pattern)?);
        }

        Ok(filter)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn compile(pattern: &str) -> Result<NameRegexFilter, ConfigError> {
    NameRegexFilter::new(pattern).map_err(|e| ConfigError::InvalidRegex {
        pattern: pattern.to_string(),
        source: e,
    })
}
