//! # config — client settings read from environment variables

use std::{path::PathBuf, time::Duration};

use anyhow::Context;

/// Budget for the whole call to the quote server.
///
/// Must exceed the server's own fetch (200ms) plus store (10ms) budgets, so
/// that under normal conditions the server, not the client, reports failures.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct Config {
    /// Full URL of the quote endpoint
    pub server_url:      String,
    pub request_timeout: Duration,
    /// Where the rendered bid is written
    pub output_path:     PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; unset keys fall back to defaults.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let request_timeout = match var("CLIENT_TIMEOUT_MS") {
            Some(ms) => Duration::from_millis(
                ms.parse().context("CLIENT_TIMEOUT_MS must be a number")?,
            ),
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            server_url:  var("SERVER_URL").unwrap_or_else(|| "http://localhost:8080/cotacao".to_string()),
            request_timeout,
            output_path: var("OUTPUT_PATH").unwrap_or_else(|| "cotacao.txt".to_string()).into(),
        })
    }
}
