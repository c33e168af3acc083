//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::config::Config;
use crate::qr::ErrorCorrection;

/// Generate command arguments.
///
/// Flags override the `[generator]` section of the configuration.
#[derive(Debug, Default, Args)]
pub struct GenerateCommand {
    /// Path of the CSV file containing registrant data [default: registrants.csv]
    #[arg(long, value_name = "FILE")]
    pub file_path: Option<PathBuf>,

    /// URL of the check-in handler embedded in each QR code
    #[arg(long, value_name = "URL")]
    pub lambda_url: Option<String>,

    /// Directory for storing QR codes [default: qr_codes]
    #[arg(long, value_name = "DIR")]
    pub qr_code_dir_path: Option<PathBuf>,

    /// QR error correction level
    #[arg(short, long, value_name = "LEVEL")]
    pub error_correction: Option<ErrorCorrection>,

    /// Print the run report as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl GenerateCommand {
    /// Apply the flags on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.file_path {
            config.generator.file_path.clone_from(path);
        }
        if let Some(url) = &self.lambda_url {
            config.generator.lambda_url.clone_from(url);
        }
        if let Some(dir) = &self.qr_code_dir_path {
            config.generator.qr_code_dir.clone_from(dir);
        }
        if let Some(level) = self.error_correction {
            config.generator.error_correction = level;
        }
    }
}

/// Serve command arguments.
#[derive(Debug, Default, Args)]
pub struct ServeCommand {
    /// Address to listen on [default: 127.0.0.1:3000]
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,
}

impl ServeCommand {
    /// Apply the flags on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(bind) = &self.bind {
            config.server.bind.clone_from(bind);
        }
    }
}

/// Invoke command arguments.
#[derive(Debug, Default, Args)]
pub struct InvokeCommand {
    /// JSON event file; reads stdin when omitted
    #[arg(short, long, value_name = "FILE")]
    pub event: Option<PathBuf>,

    /// Keep submissions in memory instead of writing them to storage
    #[arg(long)]
    pub dry_run: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
