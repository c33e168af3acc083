//! Command-line interface for checkin.
//!
//! This module provides the CLI structure for the `checkin` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, GenerateCommand, InvokeCommand, ServeCommand};

/// checkin - QR badges and check-in for event registrants
///
/// Generates one QR code per registrant from a CSV roster and serves the
/// scanner and submit pages the QR codes point at.
#[derive(Debug, Parser)]
#[command(name = "checkin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate QR codes from a registrant roster
    Generate(GenerateCommand),

    /// Serve the check-in pages over HTTP
    Serve(ServeCommand),

    /// Run the check-in handler once on a JSON event
    Invoke(InvokeCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Verbosity;
    use crate::qr::ErrorCorrection;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "checkin");
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["checkin", "-q", "serve"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["checkin", "serve"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["checkin", "-v", "serve"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["checkin", "-vv", "serve"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_generate_defaults() {
        let cli = parse(&["checkin", "generate"]);
        let Command::Generate(cmd) = cli.command else {
            panic!("expected generate");
        };
        assert!(cmd.file_path.is_none());
        assert!(cmd.lambda_url.is_none());
        assert!(cmd.qr_code_dir_path.is_none());
    }

    #[test]
    fn test_parse_generate_flags() {
        let cli = parse(&[
            "checkin",
            "generate",
            "--file-path",
            "people.csv",
            "--lambda-url",
            "https://fn.example.com/",
            "--qr-code-dir-path",
            "out",
            "-e",
            "q",
        ]);
        let Command::Generate(cmd) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(cmd.file_path, Some(PathBuf::from("people.csv")));
        assert_eq!(cmd.lambda_url.as_deref(), Some("https://fn.example.com/"));
        assert_eq!(cmd.qr_code_dir_path, Some(PathBuf::from("out")));
        assert_eq!(cmd.error_correction, Some(ErrorCorrection::Q));
    }

    #[test]
    fn test_parse_generate_bad_level() {
        assert!(Cli::try_parse_from(["checkin", "generate", "-e", "x"]).is_err());
    }

    #[test]
    fn test_parse_serve() {
        let cli = parse(&["checkin", "serve", "--bind", "0.0.0.0:8080"]);
        assert!(matches!(
            cli.command,
            Command::Serve(ServeCommand { bind: Some(ref b) }) if b == "0.0.0.0:8080"
        ));
    }

    #[test]
    fn test_parse_invoke() {
        let cli = parse(&["checkin", "invoke", "--event", "event.json", "--dry-run"]);
        let Command::Invoke(cmd) = cli.command else {
            panic!("expected invoke");
        };
        assert_eq!(cmd.event, Some(PathBuf::from("event.json")));
        assert!(cmd.dry_run);
    }

    #[test]
    fn test_parse_config_show() {
        let cli = parse(&["checkin", "config", "show", "--json"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: true })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["checkin", "-c", "/custom/config.toml", "serve"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }
}
