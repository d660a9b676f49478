//! # routes::cotacao
//!
//! The quote endpoint.
//!
//! ## Endpoints
//!
//! | Method | Path        | Description                                         |
//! |--------|-------------|-----------------------------------------------------|
//! | GET    | `/cotacao`  | Fetch, persist and return the current USD→BRL quote |
//! | GET    | `/`         | Redirect to `/cotacao` (`quote-plus-redirect` only) |

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Redirect},
};
use tracing::info;

use crate::{
    config::ResponseShape,
    error::AppError,
    models::QuoteResponse,
    state::SharedState,
};

// ─── GET /cotacao ─────────────────────────────────────────────────────────────

/// Runs the pipeline for one request: fetch, then persist, then respond.
///
/// A quote that was fetched but not persisted is never returned.
///
/// ### Response
/// * `200 OK` with `{"bid": "5.4321"}` or the full quote, per [`ResponseShape`]
/// * `408` when the provider misses its deadline, `500` for every other
///   failure, both with an [`ErrorResponse`](crate::error::ErrorResponse) body
pub async fn get_quote(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    // ── Step 1: Bounded upstream fetch ────────────────────────────────────────
    let mut quote = state.fetcher.fetch().await?;

    // ── Step 2: Bounded insert ────────────────────────────────────────────────
    let id = state.store.persist(&mut quote).await?;

    info!(id, bid = %quote.bid, "💱 Quote fetched and recorded");

    // ── Step 3: Render the configured body ───────────────────────────────────
    let body = match state.response_shape {
        ResponseShape::Minimal => QuoteResponse::Minimal { bid: quote.bid },
        ResponseShape::Full => QuoteResponse::Full(quote),
    };
    let bytes = serde_json::to_vec(&body).map_err(AppError::ResponseEncode)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        bytes,
    ))
}

// ─── GET / ────────────────────────────────────────────────────────────────────

pub async fn redirect_to_quote() -> Redirect {
    Redirect::temporary("/cotacao")
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use axum::{
        body::{to_bytes, Body},
        http::{HeaderMap, Request},
        Router,
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::{
        config::RouteSet,
        engine::{store::testing::*, QuoteFetcher, QuoteStore},
        routes::router,
        state::AppState,
    };

    const PROVIDER_PATH: &str = "/json/last/USD-BRL";
    const PAYLOAD: &str = r#"{"USDBRL":{"code":"USD","codein":"BRL","name":"Dólar Americano/Real Brasileiro","high":"5.45","low":"5.41","varBid":"0.01","pctChange":"0.2","bid":"5.4321","ask":"5.4331","timestamp":"1700000000","create_date":"2023-11-14 19:13:20"}}"#;

    async fn create_mock_provider(response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PROVIDER_PATH))
            .respond_with(response)
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn app(provider: &MockServer, store: QuoteStore, shape: ResponseShape, routes: RouteSet) -> Router {
        let fetcher = QuoteFetcher::new(
            reqwest::Client::new(),
            format!("{}{PROVIDER_PATH}", provider.uri()),
            Duration::from_millis(200),
        );
        let state = Arc::new(AppState {
            fetcher,
            store,
            response_shape: shape,
        });
        router(state, routes)
    }

    async fn call(app: &Router, uri: &str) -> (StatusCode, HeaderMap, Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, body)
    }

    fn reader(dir: &TempDir) -> QuoteStore {
        reopen(dir, Duration::from_secs(2))
    }

    #[tokio::test]
    async fn test_success_returns_bid_and_records_one_row() {
        let provider = create_mock_provider(ResponseTemplate::new(200).set_body_string(PAYLOAD)).await;
        let (dir, store) = temp_store(Duration::from_secs(2)).await;
        let app = app(&provider, store, ResponseShape::Minimal, RouteSet::QuoteOnly);

        let (status, headers, body) = call(&app, "/cotacao").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(body, json!({ "bid": "5.4321" }));

        let reader = reader(&dir);
        assert_eq!(row_count(&reader).await, 1);
        assert_eq!(stored_bid(&reader, 1).await, "5.4321");
    }

    #[tokio::test]
    async fn test_full_shape_returns_the_stored_id() {
        let provider = create_mock_provider(ResponseTemplate::new(200).set_body_string(PAYLOAD)).await;
        let (dir, store) = temp_store(Duration::from_secs(2)).await;
        let app = app(&provider, store, ResponseShape::Full, RouteSet::QuoteOnly);

        let (status, _, first) = call(&app, "/cotacao").await;
        let (_, _, second) = call(&app, "/cotacao").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["bid"], "5.4321");
        assert_eq!(first["code"], "USD");
        assert_eq!(first["varBid"], "0.01");

        let first_id = first["id"].as_i64().unwrap();
        let second_id = second["id"].as_i64().unwrap();
        assert!(first_id > 0);
        assert!(second_id > first_id);

        let reader = reader(&dir);
        assert_eq!(row_count(&reader).await, 2);
        assert_eq!(stored_bid(&reader, second_id).await, "5.4321");
    }

    #[tokio::test]
    async fn test_slow_provider_answers_408_without_a_row() {
        let provider = create_mock_provider(
            ResponseTemplate::new(200)
                .set_body_string(PAYLOAD)
                .set_delay(Duration::from_millis(600)),
        )
        .await;
        let (dir, store) = temp_store(Duration::from_secs(2)).await;
        let app = app(&provider, store, ResponseShape::Minimal, RouteSet::QuoteOnly);

        let (status, _, body) = call(&app, "/cotacao").await;

        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body["status"], 408);
        assert!(body["reason"].as_str().unwrap().contains("deadline exceeded"));
        assert_eq!(
            body["message"],
            "There was an error while retrieving the current quotation."
        );
        assert_eq!(row_count(&reader(&dir)).await, 0);
    }

    #[tokio::test]
    async fn test_blocked_store_answers_500_without_a_row() {
        let provider = create_mock_provider(ResponseTemplate::new(200).set_body_string(PAYLOAD)).await;
        let (dir, store) = temp_store(Duration::from_millis(50)).await;
        let lock = hold_write_lock(&store).await;
        let app = app(&provider, store, ResponseShape::Minimal, RouteSet::QuoteOnly);

        let (status, _, body) = call(&app, "/cotacao").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], 500);
        assert!(body["reason"].as_str().unwrap().contains("not persisted"));
        assert!(body.get("bid").is_none());

        release_write_lock(lock).await;
        assert_eq!(row_count(&reader(&dir)).await, 0);
    }

    #[tokio::test]
    async fn test_malformed_payload_answers_500() {
        let provider =
            create_mock_provider(ResponseTemplate::new(200).set_body_string("not json")).await;
        let (dir, store) = temp_store(Duration::from_secs(2)).await;
        let app = app(&provider, store, ResponseShape::Minimal, RouteSet::QuoteOnly);

        let (status, _, body) = call(&app, "/cotacao").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], 500);
        assert!(body["reason"].as_str().unwrap().contains("could not be decoded"));
        assert_eq!(row_count(&reader(&dir)).await, 0);
    }

    #[tokio::test]
    async fn test_root_redirects_only_when_enabled() {
        let provider = create_mock_provider(ResponseTemplate::new(200).set_body_string(PAYLOAD)).await;

        let (_dir, store) = temp_store(Duration::from_secs(2)).await;
        let with_redirect = app(&provider, store, ResponseShape::Minimal, RouteSet::QuotePlusRedirect);
        let (status, headers, _) = call(&with_redirect, "/").await;
        assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(headers[header::LOCATION], "/cotacao");

        let (_dir, store) = temp_store(Duration::from_secs(2)).await;
        let quote_only = app(&provider, store, ResponseShape::Minimal, RouteSet::QuoteOnly);
        let (status, _, _) = call(&quote_only, "/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
