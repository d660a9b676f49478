//! HTTP surface of the quote server.

pub mod cotacao;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{config::RouteSet, state::SharedState};
use cotacao::{get_quote, redirect_to_quote};

/// Build the Axum router for the configured [`RouteSet`].
pub fn router(state: SharedState, routes: RouteSet) -> Router {
    let mut app = Router::new()
        .route("/cotacao", get(get_quote));

    if routes == RouteSet::QuotePlusRedirect {
        app = app.route("/", get(redirect_to_quote));
    }

    app.layer(TraceLayer::new_for_http())
        .with_state(state)
}
