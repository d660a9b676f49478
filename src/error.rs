//! # error
//!
//! Centralised error types for the quote pipeline.
//!
//! Each bounded component owns its failure enum ([`FetchError`],
//! [`StoreError`]).  The handler wraps them in [`AppError`], whose
//! `IntoResponse` impl turns every failure into an [`ErrorResponse`] body so
//! the caller always receives a complete JSON answer.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

// ─── Component Errors ─────────────────────────────────────────────────────────

/// Failure of the outbound call to the quote provider.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("deadline exceeded: quote provider did not answer within {0:?}")]
    Timeout(Duration),

    #[error("quote provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("quote provider payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure of the bounded insert into SQLite.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("deadline exceeded: quote was not persisted within {0:?}")]
    Timeout(Duration),

    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

// ─── AppError ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Upstream(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("response could not be encoded: {0}")]
    ResponseEncode(#[source] serde_json::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Upstream(FetchError::Timeout(_)) => StatusCode::REQUEST_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human-readable summary shown to the caller.
    pub fn message(&self) -> &'static str {
        match self {
            AppError::Upstream(_) => "There was an error while retrieving the current quotation.",
            AppError::Store(_) => "There was an error while persisting this quotation into the DB.",
            AppError::ResponseEncode(_) => "Unable to marshal json data.",
        }
    }
}

// ─── ErrorResponse ────────────────────────────────────────────────────────────

/// JSON body sent for every failed `/cotacao` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub reason: String,
    pub status: u16,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            message: err.message().to_string(),
            reason: err.to_string(),
            status: err.status().as_u16(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::from(&self);
        error!(status = body.status, reason = %body.reason, "❌ {}", body.message);
        (self.status(), Json(body)).into_response()
    }
}
