//! # engine::fetcher
//!
//! The **Quote Fetcher** — one bounded GET against the upstream provider.
//!
//! The whole exchange (connect, headers, body) is raced against the fetch
//! deadline.  When the timer wins, the request future is dropped, which closes
//! the in-flight connection before the error is returned.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::FetchError;
use crate::models::{Envelope, Quote};

pub struct QuoteFetcher {
    client: reqwest::Client,
    url: String,
    deadline: Duration,
}

impl QuoteFetcher {
    pub fn new(client: reqwest::Client, url: impl Into<String>, deadline: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            deadline,
        }
    }

    /// Retrieve the current USD→BRL quote within the fetch deadline.
    pub async fn fetch(&self) -> Result<Quote, FetchError> {
        let started = Instant::now();

        let body = tokio::time::timeout(self.deadline, self.download())
            .await
            .map_err(|_| FetchError::Timeout(self.deadline))??;

        let quote = Envelope::decode(&body)?;

        debug!(
            bid     = %quote.bid,
            elapsed = ?started.elapsed(),
            "Quote received from provider"
        );
        Ok(quote)
    }

    async fn download(&self) -> Result<Vec<u8>, reqwest::Error> {
        let response = self.client.get(&self.url).send().await?;
        Ok(response.bytes().await?.to_vec())
    }
}
