//! # models::quote
//!
//! Defines [`Quote`], the USD→BRL record published by the upstream provider,
//! together with the [`Envelope`] it arrives in and the [`QuoteResponse`] body
//! the `/cotacao` endpoint sends back.
//!
//! Every decimal value stays a `String` end to end.  The provider emits them as
//! strings and nothing on the server needs them as numbers, so they are stored
//! and returned exactly as received.

use serde::{Deserialize, Serialize};

/// A single USD→BRL quote.
///
/// `id` is zero until the quote has been written by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Row identifier assigned by SQLite on insert.
    #[serde(default)]
    pub id: i64,

    /// Base currency, e.g. `"USD"`.
    #[serde(default)]
    pub code: String,

    /// Quote currency, e.g. `"BRL"`.
    #[serde(default)]
    pub codein: String,

    /// Human-readable pair label, e.g. `"Dólar Americano/Real Brasileiro"`.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub high: String,

    #[serde(default)]
    pub low: String,

    #[serde(default, rename = "varBid")]
    pub var_bid: String,

    #[serde(default, rename = "pctChange")]
    pub pct_change: String,

    /// Purchase price of one USD in BRL.  The only field the client reads.
    pub bid: String,

    #[serde(default)]
    pub ask: String,

    /// Epoch seconds, as supplied by the provider.
    #[serde(default)]
    pub timestamp: String,

    #[serde(default)]
    pub create_date: String,
}

/// Upstream payload: the quote keyed under the currency pair.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(rename = "USDBRL")]
    pub usdbrl: Quote,
}

impl Envelope {
    /// Decode a raw provider body and unwrap the single quote inside it.
    pub fn decode(body: &[u8]) -> Result<Quote, serde_json::Error> {
        serde_json::from_slice::<Envelope>(body).map(|envelope| envelope.usdbrl)
    }
}

/// Success body of `GET /cotacao`.
///
/// Both shapes expose a top-level `bid`, so the client reads them the same way.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QuoteResponse {
    /// `{"bid": "5.4321"}`
    Minimal { bid: String },
    /// The persisted quote, `id` included.
    Full(Quote),
}
