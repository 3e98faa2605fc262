use anyhow::Result;
use clap::Parser;

use paperless_export::cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment before anything reads PAPERLESS_TOKEN.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let result = run(cli).await;
    match &result {
        Ok(_) => tracing::info!("Export completed successfully"),
        Err(e) => tracing::error!(error = %e, "Export exited with error"),
    }
    result
}
