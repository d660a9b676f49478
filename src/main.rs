//! # Cotacao — USD→BRL Quote Server
//!
//! ## Architecture Overview
//!
//! ```text
//!  ┌──────────────┐  GET /cotacao   ┌───────────────────────────────┐
//!  │  cotacao-    │ ───────────────▶│  get_quote                    │
//!  │  client      │     300ms       │   1. QuoteFetcher ──────────────▶ awesomeapi (200ms)
//!  └──────────────┘ ◀───────────────│   2. QuoteStore   ──────────────▶ SQLite     (10ms)
//!                   {"bid": ...}    │   3. JSON body / ErrorResponse│
//!                                   └───────────────────────────────┘
//! ```
//!
//! ## Environment Variables
//!
//! | Variable           | Default                  | Description                          |
//! |--------------------|--------------------------|--------------------------------------|
//! | `BIND_ADDR`        | `0.0.0.0:8080`           | Address Axum listens on              |
//! | `UPSTREAM_URL`     | awesomeapi `USD-BRL`     | Quote provider endpoint              |
//! | `DATABASE_URL`     | `sqlite://cotacao.db`    | SQLite database file                 |
//! | `FETCH_TIMEOUT_MS` | `200`                    | Deadline for the provider call       |
//! | `STORE_TIMEOUT_MS` | `10`                     | Deadline for the insert              |
//! | `RESPONSE_SHAPE`   | `minimal`                | `minimal` or `full` success body     |
//! | `ROUTE_SET`        | `quote-only`             | `quote-only` or `quote-plus-redirect`|
//! | `RUST_LOG`         | `cotacao=debug`          | Tracing filter                       |

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod engine;
mod error;
mod models;
mod routes;
mod state;

use config::Config;
use state::build_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env ──────────────────────────────────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging ─────────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("cotacao=debug".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    info!(r#"

  ╔═══════════════════════════════════════════════╗
  ║        COTACAO — USD/BRL Quote Server         ║
  ║        fetch 200ms · store 10ms · serve       ║
  ╚═══════════════════════════════════════════════╝"#);

    // ── 3. Config & state ─────────────────────────────────────────────────────
    let config = Config::from_env().context("Failed to load config")?;
    let state = build_state(&config).context("Failed to build application state")?;

    state.store.migrate().await?;

    info!(
        upstream = %config.upstream_url,
        fetch    = ?config.fetch_timeout,
        store    = ?config.store_timeout,
        shape    = ?config.response_shape,
        routes   = ?config.route_set,
        "Pipeline configured"
    );

    // ── 4. Router ─────────────────────────────────────────────────────────────
    let app = routes::router(state, config.route_set);

    // ── 5. Bind & Serve ───────────────────────────────────────────────────────
    info!(addr = ?config.bind_addr, "🚀 Cotacao server starting");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
