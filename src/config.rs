//! # config — server settings read from environment variables

use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{bail, Context};

pub const DEFAULT_UPSTREAM_URL: &str = "https://economia.awesomeapi.com.br/json/last/USD-BRL";

/// Budget for the call to the quote provider.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(200);

/// Budget for the insert; must stay below [`DEFAULT_FETCH_TIMEOUT`].
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(10);

/// Body sent on a successful `/cotacao` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{"bid": "..."}` only.
    Minimal,
    /// The whole persisted quote, `id` included.
    Full,
}

impl FromStr for ResponseShape {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "minimal" => Ok(ResponseShape::Minimal),
            "full" => Ok(ResponseShape::Full),
            other => bail!("Unknown RESPONSE_SHAPE: '{other}'. Use 'minimal' or 'full'"),
        }
    }
}

/// Routes mounted on the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSet {
    /// `GET /cotacao` only.
    QuoteOnly,
    /// `GET /cotacao` plus `GET /` redirecting to it.
    QuotePlusRedirect,
}

impl FromStr for RouteSet {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "quote-only" => Ok(RouteSet::QuoteOnly),
            "quote-plus-redirect" => Ok(RouteSet::QuotePlusRedirect),
            other => bail!(
                "Unknown ROUTE_SET: '{other}'. Use 'quote-only' or 'quote-plus-redirect'"
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Address Axum listens on
    pub bind_addr:      SocketAddr,
    /// Quote provider endpoint
    pub upstream_url:   String,
    /// SQLite database, e.g. `sqlite://cotacao.db`
    pub database_url:   String,
    pub fetch_timeout:  Duration,
    pub store_timeout:  Duration,
    pub response_shape: ResponseShape,
    pub route_set:      RouteSet,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; unset keys fall back to defaults.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        let fetch_timeout = match var("FETCH_TIMEOUT_MS") {
            Some(ms) => Duration::from_millis(
                ms.parse().context("FETCH_TIMEOUT_MS must be a number")?,
            ),
            None => DEFAULT_FETCH_TIMEOUT,
        };

        let store_timeout = match var("STORE_TIMEOUT_MS") {
            Some(ms) => Duration::from_millis(
                ms.parse().context("STORE_TIMEOUT_MS must be a number")?,
            ),
            None => DEFAULT_STORE_TIMEOUT,
        };

        if store_timeout >= fetch_timeout {
            tracing::warn!(
                ?fetch_timeout,
                ?store_timeout,
                "Store deadline is not shorter than the fetch deadline"
            );
        }

        Ok(Self {
            bind_addr,
            upstream_url:   var("UPSTREAM_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
            database_url:   var("DATABASE_URL").unwrap_or_else(|| "sqlite://cotacao.db".to_string()),
            fetch_timeout,
            store_timeout,
            response_shape: var("RESPONSE_SHAPE").as_deref().unwrap_or("minimal").parse()?,
            route_set:      var("ROUTE_SET").as_deref().unwrap_or("quote-only").parse()?,
        })
    }
}
