//! # quote — one bounded GET against the quote server

use serde::Deserialize;
use tracing::debug;

use crate::{config::Config, error::ClientError};

/// The only part of the server's answer the client cares about.
///
/// Both the minimal and the full response shapes carry a top-level `bid`.
#[derive(Debug, Clone, Deserialize)]
pub struct BidQuote {
    pub bid: String,
}

/// Failure body sent by the server alongside a non-2xx status.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    reason:  String,
}

/// Ask the server for the current bid, bounded by `config.request_timeout`.
pub async fn request_quote(
    client: &reqwest::Client,
    config: &Config,
) -> Result<BidQuote, ClientError> {
    let (status, body) = tokio::time::timeout(
        config.request_timeout,
        download(client, &config.server_url),
    )
    .await
    .map_err(|_| ClientError::Timeout(config.request_timeout))??;

    if !status.is_success() {
        let (message, reason) = match serde_json::from_slice::<ErrorBody>(&body) {
            Ok(err) => (err.message, err.reason),
            Err(_) => (
                "unexpected response".to_string(),
                String::from_utf8_lossy(&body).into_owned(),
            ),
        };
        return Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
            reason,
        });
    }

    let quote: BidQuote = serde_json::from_slice(&body)?;
    debug!(bid = %quote.bid, "Quote received from server");
    Ok(quote)
}

async fn download(
    client: &reqwest::Client,
    url: &str,
) -> Result<(reqwest::StatusCode, Vec<u8>), reqwest::Error> {
    let response = client.get(url).send().await?;
    let status = response.status();
    Ok((status, response.bytes().await?.to_vec()))
}
