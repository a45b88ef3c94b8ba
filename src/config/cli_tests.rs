//! Tests for CLI argument parsing.

use std::path::{Path, PathBuf};

use clap::Parser;

use super::cli::{Cli, Command};

mod parsing {
    use super::*;

    #[test]
    fn no_args_gives_defaults() {
        let cli = Cli::parse_from_iter(["netconfig"]);

        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
        assert!(cli.snapshot.is_none());
        assert!(cli.host.is_none());
        assert!(cli.output.is_none());
        assert!(!cli.compact);
        assert!(!cli.verbose);
        assert!(cli.include_adapters.is_empty());
        assert!(cli.exclude_adapters.is_empty());
    }

    #[test]
    fn parse_source_and_output_options() {
        let cli = Cli::parse_from_iter([
            "netconfig",
            "--snapshot",
            "captured.json",
            "--host",
            "WORKSTATION",
            "-o",
            "out/report.json",
            "--compact",
        ]);

        assert_eq!(cli.snapshot.as_deref(), Some(Path::new("captured.json")));
        assert_eq!(cli.host.as_deref(), Some("WORKSTATION"));
        assert_eq!(cli.output, Some(PathBuf::from("out/report.json")));
        assert!(cli.compact);
    }

    #[test]
    fn parse_filter_options() {
        let cli = Cli::parse_from_iter([
            "netconfig",
            "--include-adapter",
            "^eth",
            "--include-adapter",
            "^wlan",
            "--exclude-adapter",
            "^Docker",
        ]);

        assert_eq!(cli.include_adapters, vec!["^eth", "^wlan"]);
        assert_eq!(cli.exclude_adapters, vec!["^Docker"]);
    }

    #[test]
    fn short_flags() {
        let cli = Cli::parse_from_iter(["netconfig", "-c", "netconfig.toml", "-v"]);

        assert_eq!(cli.config, Some(PathBuf::from("netconfig.toml")));
        assert!(cli.verbose);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let result = Cli::try_parse_from(["netconfig", "--poll-only"]);
        assert!(result.is_err());
    }
}

mod init_command {
    use super::*;

    #[test]
    fn default_output_path() {
        let cli = Cli::parse_from_iter(["netconfig", "init"]);

        assert!(cli.is_init());
        match cli.command {
            Some(Command::Init { output }) => assert_eq!(output, PathBuf::from("netconfig.toml")),
            None => panic!("expected init command"),
        }
    }

    #[test]
    fn custom_output_path() {
        let cli = Cli::parse_from_iter(["netconfig", "init", "--output", "custom.toml"]);

        match cli.command {
            Some(Command::Init { output }) => assert_eq!(output, PathBuf::from("custom.toml")),
            None => panic!("expected init command"),
        }
    }

    #[test]
    fn run_mode_is_not_init() {
        let cli = Cli::parse_from_iter(["netconfig", "--compact"]);
        assert!(!cli.is_init());
    }
}
