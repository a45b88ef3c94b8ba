//! Tests for validated configuration.

use std::path::Path;

use crate::network::filter::AdapterFilter;
use crate::network::{AdapterKind, OperState, RawAdapter};

use super::ConfigError;
use super::cli::Cli;
use super::toml::TomlConfig;
use super::validated::{ValidatedConfig, write_default_config};

/// Helper to create CLI args from a slice
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["netconfig"];
    full_args.extend(args);
    Cli::parse_from_iter(full_args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

fn adapter(name: &str) -> RawAdapter {
    RawAdapter::new(name, name, AdapterKind::Ethernet, OperState::Up)
}

mod defaults {
    use super::*;

    #[test]
    fn no_options_gives_platform_source_and_stdout() {
        let config = ValidatedConfig::from_raw(&cli(&[]), None).unwrap();

        assert!(config.host.is_none());
        assert!(config.snapshot.is_none());
        assert!(config.output.is_none());
        assert!(config.pretty);
        assert!(config.filter.is_empty());
        assert!(!config.verbose);
    }

    #[test]
    fn verbose_comes_from_cli() {
        let config = ValidatedConfig::from_raw(&cli(&["-v"]), None).unwrap();
        assert!(config.verbose);
    }
}

mod precedence {
    use super::*;

    #[test]
    fn toml_values_apply_without_cli() {
        let t = toml(
            r#"
            [report]
            host = "toml-host"
            [source]
            snapshot = "toml.json"
            [output]
            path = "toml-out.json"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&t)).unwrap();

        assert_eq!(config.host.as_deref(), Some("toml-host"));
        assert_eq!(config.snapshot.as_deref(), Some(Path::new("toml.json")));
        assert_eq!(config.output.as_deref(), Some(Path::new("toml-out.json")));
    }

    #[test]
    fn cli_overrides_toml() {
        let t = toml(
            r#"
            [report]
            host = "toml-host"
            [source]
            snapshot = "toml.json"
            [output]
            path = "toml-out.json"
        "#,
        );
        let args = cli(&[
            "--host",
            "cli-host",
            "--snapshot",
            "cli.json",
            "--output",
            "cli-out.json",
        ]);

        let config = ValidatedConfig::from_raw(&args, Some(&t)).unwrap();

        assert_eq!(config.host.as_deref(), Some("cli-host"));
        assert_eq!(config.snapshot.as_deref(), Some(Path::new("cli.json")));
        assert_eq!(config.output.as_deref(), Some(Path::new("cli-out.json")));
    }

    #[test]
    fn compact_from_either_source() {
        let from_cli = ValidatedConfig::from_raw(&cli(&["--compact"]), None).unwrap();
        assert!(!from_cli.pretty);

        let t = toml("[report]\ncompact = true\n");
        let from_toml = ValidatedConfig::from_raw(&cli(&[]), Some(&t)).unwrap();
        assert!(!from_toml.pretty);
    }

    #[test]
    fn host_is_trimmed() {
        let config = ValidatedConfig::from_raw(&cli(&["--host", "  box  "]), None).unwrap();
        assert_eq!(config.host.as_deref(), Some("box"));
    }
}

mod validation {
    use super::*;

    #[test]
    fn blank_host_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--host", "   "]), None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "host", .. })
        ));
    }

    #[test]
    fn blank_host_in_toml_is_rejected() {
        let t = toml("[report]\nhost = \"\"\n");
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&t));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "host", .. })
        ));
    }

    #[test]
    fn empty_output_path_is_rejected() {
        let t = toml("[output]\npath = \"\"\n");
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&t));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: "output",
                ..
            })
        ));
    }

    #[test]
    fn empty_snapshot_path_is_rejected() {
        let t = toml("[source]\nsnapshot = \"\"\n");
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&t));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: "snapshot",
                ..
            })
        ));
    }

    #[test]
    fn invalid_regex_names_the_pattern() {
        let result = ValidatedConfig::from_raw(&cli(&["--include-adapter", "[unclosed"]), None);

        match result {
            Err(ConfigError::InvalidRegex { pattern, .. }) => assert_eq!(pattern, "[unclosed"),
            other => panic!("expected InvalidRegex, got {other:?}"),
        }
    }
}

mod filters {
    use super::*;

    #[test]
    fn cli_patterns_build_the_chain() {
        let args = cli(&[
            "--include-adapter",
            "^eth",
            "--include-adapter",
            "^wlan",
            "--exclude-adapter",
            "^eth9",
        ]);

        let config = ValidatedConfig::from_raw(&args, None).unwrap();

        assert_eq!(config.filter.include_count(), 2);
        assert_eq!(config.filter.exclude_count(), 1);
        assert!(config.filter.matches(&adapter("eth0")));
        assert!(config.filter.matches(&adapter("wlan0")));
        assert!(!config.filter.matches(&adapter("eth9")));
        assert!(!config.filter.matches(&adapter("docker0")));
    }

    #[test]
    fn cli_includes_replace_toml_includes_only() {
        let t = toml(
            r#"
            [filter]
            include = ["^toml-a", "^toml-b"]
            exclude = ["^toml-x"]
        "#,
        );

        let config =
            ValidatedConfig::from_raw(&cli(&["--include-adapter", "^cli"]), Some(&t)).unwrap();

        assert_eq!(config.filter.include_count(), 1);
        assert_eq!(config.filter.exclude_count(), 1);
        assert!(config.filter.matches(&adapter("cli0")));
        assert!(!config.filter.matches(&adapter("toml-a")));
    }

    #[test]
    fn toml_patterns_apply_without_cli() {
        let t = toml(
            r#"
            [filter]
            exclude = ["^Docker"]
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&t)).unwrap();

        assert!(config.filter.matches(&adapter("Ethernet")));
        assert!(!config.filter.matches(&adapter("Docker Desktop")));
    }
}

mod loading {
    use std::io::Write;

    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    #[test]
    fn load_reads_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[report]\nhost = \"from-file\"").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = ValidatedConfig::load(&cli(&["--config", &path])).unwrap();

        assert_eq!(config.host.as_deref(), Some("from-file"));
    }

    #[test]
    fn load_missing_file_fails() {
        let result = ValidatedConfig::load(&cli(&["--config", "missing_netconfig_12345.toml"]));
        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn load_without_config_uses_cli_only() {
        let config = ValidatedConfig::load(&cli(&["--compact"])).unwrap();
        assert!(!config.pretty);
    }

    #[test]
    fn written_template_loads_cleanly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("netconfig.toml");

        write_default_config(&path).unwrap();
        let config = ValidatedConfig::load(&cli(&["--config", path.to_str().unwrap()])).unwrap();

        assert!(config.host.is_none());
        assert!(config.pretty);
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no-such-dir").join("netconfig.toml");

        let result = write_default_config(&path);

        assert!(matches!(result, Err(ConfigError::FileWrite { .. })));
    }
}

mod display {
    use super::*;

    #[test]
    fn summarizes_sources() {
        let config = ValidatedConfig::from_raw(
            &cli(&["--snapshot", "snap.json", "--exclude-adapter", "^lo"]),
            None,
        )
        .unwrap();

        let text = config.to_string();

        assert!(text.contains("host: <resolved>"));
        assert!(text.contains("source: snap.json"));
        assert!(text.contains("output: stdout"));
        assert!(text.contains("filters: +0/-1"));
    }
}
