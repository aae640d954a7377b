//! Defines the endpoint for listing transactions.

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    db::Storage,
    transaction::{Transaction, TransactionKind, core::list_transactions},
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database that transactions are read from.
    pub storage: Storage,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            storage: state.storage.clone(),
        }
    }
}

/// The query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsQuery {
    /// Only list transactions of this kind. An empty string means no filter.
    pub kind: Option<String>,
}

/// A route handler that responds with the transactions, newest first.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    query: Result<Query<ListTransactionsQuery>, QueryRejection>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let Query(query) = query.map_err(|rejection| Error::InvalidKind(rejection.body_text()))?;
    let kind = match query.kind.as_deref() {
        None | Some("") => None,
        Some(kind) => Some(kind.parse::<TransactionKind>()?),
    };

    let connection = state.storage.open_connection()?;
    let transactions = list_transactions(kind, &connection)?;

    Ok(Json(transactions))
}
