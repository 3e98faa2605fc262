use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::api::PaperlessClient;
use crate::export::export;
use crate::load_config::load_config;

/// CLI for paperless-export: tag-scoped document exports with artifacts
/// and a spreadsheet report.
#[derive(Parser)]
#[clap(
    name = "paperless-export",
    version,
    about = "Export paperless-ngx documents for one tag: PDFs, metadata JSON and a styled spreadsheet"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export all documents carrying the configured tag
    Export {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Override the target tag from the config file
        #[clap(long)]
        tag: Option<String>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Export { config, tag } => {
            let config = load_config(config, tag)?;
            let client = PaperlessClient::new(&config.base_url, &config.token, config.page_size);
            println!("Export starting...");
            match export(&client, &config).await {
                Ok(report) => {
                    println!("Export complete.\nReport:");
                    println!("{:#?}", report);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Export failed: {}", e);
                    Err(e.into())
                }
            }
        }
    }
}
