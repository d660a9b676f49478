//! # state
//!
//! Shared application state handed to every Axum handler.
//!
//! Nothing in here is mutable: each request gets its own task, its own
//! upstream exchange and its own SQLite connection, so concurrent handlers
//! never contend on a lock.

use std::sync::Arc;

use crate::{
    config::{Config, ResponseShape},
    engine::{QuoteFetcher, QuoteStore},
};

pub struct AppState {
    pub fetcher: QuoteFetcher,
    pub store: QuoteStore,
    pub response_shape: ResponseShape,
}

pub type SharedState = Arc<AppState>;

/// Wire the pipeline stages from `config` and wrap them for the router.
pub fn build_state(config: &Config) -> anyhow::Result<SharedState> {
    let fetcher = QuoteFetcher::new(
        reqwest::Client::new(),
        config.upstream_url.clone(),
        config.fetch_timeout,
    );
    let store = QuoteStore::from_url(&config.database_url, config.store_timeout)?;

    Ok(Arc::new(AppState {
        fetcher,
        store,
        response_shape: config.response_shape,
    }))
}
