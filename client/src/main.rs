//! # Cotacao Client
//!
//! Asks the quote server for the current USD→BRL bid and records it locally.
//!
//! ## Flow
//! ```text
//! 1. GET SERVER_URL (300ms deadline)
//! 2. Decode {"bid": "..."}  → f64
//! 3. Write "Dólar: R$ 5.43" → OUTPUT_PATH
//! ```
//!
//! Any failure aborts the run before the output file is touched.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod error;
mod quote;
mod report;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env()
            .add_directive("cotacao_client=info".parse()?)
            .add_directive("reqwest=warn".parse()?))
        .init();

    let config = Config::from_env().context("Failed to load config")?;
    let client = reqwest::Client::new();

    info!(
        server  = %config.server_url,
        timeout = ?config.request_timeout,
        "Requesting current quote"
    );

    let quote = quote::request_quote(&client, &config).await
        .context("Failed to obtain the current quote")?;

    let line = report::render(&quote.bid)
        .context("Failed to render the bid")?;

    let bytes = report::write_report(&config.output_path, &line).await
        .with_context(|| format!("Failed to write {}", config.output_path.display()))?;

    println!(
        "New value of USD quotation was updated successfully!\nFile {} generated with {bytes} bytes.",
        config.output_path.display()
    );

    Ok(())
}
