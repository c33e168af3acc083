//! `checkin` - CLI for QR badge generation and the check-in handler
//!
//! `generate` writes one QR code per registrant, `serve` runs the handler
//! behind HTTP, and `invoke` runs it once on a JSON event.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use checkin::cli::{Cli, Command, ConfigCommand, GenerateCommand, InvokeCommand, ServeCommand};
use checkin::{init_logging, CheckinHandler, Config, Generator, MemoryStore, Templates};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match cli.command {
        Command::Generate(cmd) => handle_generate(load_config(cli.config)?, &cmd),
        Command::Serve(cmd) => handle_serve(load_config(cli.config)?, &cmd).await,
        Command::Invoke(cmd) => handle_invoke(&load_config(cli.config)?, &cmd).await,
        // Config subcommands report their own load errors
        Command::Config(cmd) => handle_config(cli.config, cmd),
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    Config::load_from(path).context("loading configuration")
}

fn handle_generate(mut config: Config, cmd: &GenerateCommand) -> anyhow::Result<()> {
    cmd.apply(&mut config);
    config.validate_generator()?;
    tracing::debug!("Generator configuration: {:?}", config.generator);

    let report = Generator::new(config.generator).run()?;
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Rows read:          {}", report.total_rows);
        println!("Duplicates dropped: {}", report.dropped_duplicates);
        println!("QR codes written:   {}", report.written);
        println!("Rows failed:        {}", report.failed);
        println!(
            "Files on disk:      {} ({})",
            report.files_on_disk,
            if report.is_consistent() {
                "matches roster"
            } else {
                "does not match roster"
            }
        );
    }
    Ok(())
}

async fn handle_serve(mut config: Config, cmd: &ServeCommand) -> anyhow::Result<()> {
    cmd.apply(&mut config);
    config.validate_storage()?;
    let handler = CheckinHandler::from_config(&config)?;
    checkin::server::serve(&config.server.bind, handler).await?;
    Ok(())
}

async fn handle_invoke(config: &Config, cmd: &InvokeCommand) -> anyhow::Result<()> {
    let raw = match &cmd.event {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading event {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading event from stdin")?;
            buf
        }
    };

    let handler = if cmd.dry_run {
        let store = Arc::new(MemoryStore::new());
        CheckinHandler::new(Templates::load(&config.templates)?, store)
            .with_prefix(config.submission_prefix())
    } else {
        config.validate_storage()?;
        CheckinHandler::from_config(config)?
    };

    // Malformed events come back as a 500 response, not a CLI error
    let response = handler.handle_json(&raw).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn handle_config(path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Generator]");
                println!("  Roster:             {}", config.generator.file_path.display());
                println!("  Handler URL:        {}", config.generator.lambda_url);
                println!("  QR directory:       {}", config.generator.qr_code_dir.display());
                println!("  Error correction:   {}", config.generator.error_correction);
                println!();
                println!("[Server]");
                println!("  Bind:               {}", config.server.bind);
                println!();
                println!("[Storage]");
                println!("  Backend:            {:?}", config.storage.backend);
                println!("  Root:               {}", config.storage.root.display());
                println!(
                    "  Bucket:             {}",
                    config.storage.bucket.as_deref().unwrap_or("-")
                );
                println!("  Prefix:             {}", config.submission_prefix());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.or(path).unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path))
                .and_then(|config| config.validate())
                .context("configuration is invalid")?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validate_fails_on_invalid_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\nbackend = \"http\"\n").unwrap();

        let result = handle_config(None, ConfigCommand::Validate { file: Some(path) });
        assert!(result.is_err());
    }

    #[test]
    fn test_config_validate_accepts_valid_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[generator]\nlambda_url = \"https://fn.example.com/\"\n").unwrap();

        assert!(handle_config(None, ConfigCommand::Validate { file: Some(path) }).is_ok());
    }
}
