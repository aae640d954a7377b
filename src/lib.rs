//! Spendly is a personal finance tracker.
//!
//! This library provides a JSON REST API for recording income and expense
//! transactions and reporting their totals, backed by a single SQLite file.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod database_id;
mod db;
mod endpoints;
mod error;
mod logging;
mod not_found;
mod routing;
mod summary;
#[cfg(test)]
mod test_utils;
mod transaction;

pub use app_state::AppState;
pub use database_id::TransactionId;
pub use db::{Storage, initialize as initialize_db};
pub use error::{Error, FieldError, ValidationErrors};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use summary::{Summary, get_summary};
pub use transaction::{
    NewTransaction, RawAmount, Transaction, TransactionForm, TransactionKind, count_transactions,
    create_transaction, list_transactions, sum_by_kind,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
