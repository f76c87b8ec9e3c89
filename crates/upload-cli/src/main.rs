//! upload-form - Command-line front end for the upload form
//!
//! Submits a file to the upload endpoint exactly as the web form does and
//! keeps the returned identifier where the next step can pick it up.

mod commands;
mod config;
mod output;
mod storage;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use upload_client::{ClientConfig, UploadClient};

use crate::config::{Config, MergedConfig};
use crate::output::OutputContext;
use crate::storage::FileStore;

#[derive(Parser)]
#[command(name = "upload-form")]
#[command(author, version, about = "Upload a file and keep the returned identifier")]
#[command(propagate_version = true)]
struct Cli {
    /// Server URL
    #[arg(short, long, env = "UPLOAD_FORM_SERVER")]
    server: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "UPLOAD_FORM_CONFIG")]
    config: Option<PathBuf>,

    /// Identifier store path
    #[arg(long, env = "UPLOAD_FORM_STORE")]
    store: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file through the form
    Upload {
        /// File to upload
        file: Option<PathBuf>,
    },

    /// Print the identifier stored by the last successful upload
    Stored,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    let merged = config.merge_with_args(cli.server.as_deref(), cli.store.as_deref())?;
    let ctx = OutputContext::new(cli.no_color, cli.quiet);
    let store = FileStore::new(&merged.store);

    let ok = match &cli.command {
        Commands::Upload { file } => {
            let client = create_client(&merged)?;
            commands::upload(client, store, merged.form.clone(), file.as_deref(), &ctx).await?
        }

        Commands::Stored => commands::stored(&store, &merged.form, &ctx)?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Create an upload client from the merged configuration
fn create_client(merged: &MergedConfig) -> Result<UploadClient> {
    let config = ClientConfig::builder(&merged.server)
        .timeouts(merged.timeouts.clone())
        .build();
    UploadClient::from_config(config).context("Failed to create upload client")
}
