//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Document content settings
    #[serde(default)]
    pub report: ReportSection,

    /// Adapter data source
    #[serde(default)]
    pub source: SourceSection,

    /// Document destination
    #[serde(default)]
    pub output: OutputSection,

    /// Network adapter filter configuration
    #[serde(default)]
    pub filter: FilterSection,
}

/// Document content section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportSection {
    /// Host name override
    pub host: Option<String>,

    /// Emit single-line JSON
    #[serde(default)]
    pub compact: bool,
}

/// Adapter data source section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSection {
    /// Snapshot file to read instead of the operating system
    pub snapshot: Option<PathBuf>,
}

/// Output section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// File to write instead of stdout
    pub path: Option<PathBuf>,
}

/// Adapter filter configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSection {
    /// Regex patterns for adapters to include
    #[serde(default)]
    pub include: Vec<String>,

    /// Regex patterns for adapters to exclude
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# netconfig Configuration File

[report]
# Host name to report (default: the machine name)
# host = "WORKSTATION-01"

# Emit single-line JSON instead of indented output
# compact = false

[source]
# Read adapters from a JSON snapshot instead of the operating system
# snapshot = "adapters.json"

[output]
# Write the document to a file instead of stdout (replaced atomically)
# path = "netconfig.json"

[filter]
# Regex patterns for adapters to include (empty = all)
# Note: CLI patterns REPLACE these entirely (not merged)
# include = ["^eth", "^Ethernet"]

# Regex patterns for adapters to exclude
# Note: CLI patterns REPLACE these entirely (not merged)
# exclude = ["^Docker", "^vEthernet"]
"#
    .to_string()
}
