//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    AppState, Error,
    db::Storage,
    transaction::{Transaction, TransactionForm, core::create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database that transactions are saved to.
    pub storage: Storage,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            storage: state.storage.clone(),
        }
    }
}

/// A route handler for creating a new transaction, responds with the saved
/// transaction and the status code 201.
///
/// The payload is validated before the database is opened, so an invalid
/// payload never touches the database.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    payload: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let Json(form) = payload.map_err(|rejection| Error::InvalidPayload(rejection.body_text()))?;
    let new_transaction = form.validate()?;

    let connection = state.storage.open_connection()?;
    let transaction = create_transaction(new_transaction, &connection)?;

    tracing::debug!(
        "Created {} transaction {} for {}",
        transaction.kind,
        transaction.id,
        transaction.amount
    );

    Ok((StatusCode::CREATED, Json(transaction)))
}
