//! The aggregate totals of all transactions.

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    db::Storage,
    transaction::{TransactionKind, sum_by_kind},
};

/// Total income, total expenses and the difference between them.
///
/// The values are exact to the cent and are serialized as JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The sum of all income transactions.
    #[serde(with = "rust_decimal::serde::float")]
    pub income_total: Decimal,
    /// The sum of all expense transactions.
    #[serde(with = "rust_decimal::serde::float")]
    pub expense_total: Decimal,
    /// Income minus expenses, may be negative.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// Calculate the [Summary] of all transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_summary(connection: &Connection) -> Result<Summary, Error> {
    let income_total = sum_by_kind(TransactionKind::Income, connection)?;
    let expense_total = sum_by_kind(TransactionKind::Expense, connection)?;

    Ok(Summary {
        income_total,
        expense_total,
        balance: income_total - expense_total,
    })
}

/// The state needed to summarize transactions.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The database that transactions are read from.
    pub storage: Storage,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            storage: state.storage.clone(),
        }
    }
}

/// A route handler that responds with the [Summary] of all transactions.
pub async fn get_summary_endpoint(
    State(state): State<SummaryState>,
) -> Result<Json<Summary>, Error> {
    let connection = state.storage.open_connection()?;
    let summary = get_summary(&connection)?;

    Ok(Json(summary))
}
