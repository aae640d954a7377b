//! Application router configuration.

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;

use crate::{
    AppState, endpoints,
    not_found::get_404_not_found,
    summary::get_summary_endpoint,
    transaction::{create_transaction_endpoint, list_transactions_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::SUMMARY_API, get(get_summary_endpoint))
        .fallback(get_404_not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
