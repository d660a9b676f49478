//! # error — every way a client run can fail

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("deadline exceeded: quote server did not answer within {0:?}")]
    Timeout(Duration),

    #[error("quote server unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("quote server response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("bid '{bid}' is not a usable number: {reason}")]
    Parse { bid: String, reason: String },

    /// The server answered with its own `{message, reason, status}` body.
    #[error("quote server returned {status}: {message} ({reason})")]
    Rejected {
        status: u16,
        message: String,
        reason: String,
    },

    #[error("could not write report: {0}")]
    Output(#[from] std::io::Error),
}
