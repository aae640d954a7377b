//! Defines the app level error type and its conversion to JSON error responses.

use std::fmt::Display;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::not_found::get_404_not_found_response;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The transaction kind used to filter transactions was neither "income"
    /// nor "expense".
    #[error("invalid transaction kind \"{0}\"")]
    InvalidKind(String),

    /// One or more fields of a new transaction failed validation.
    #[error("invalid transaction: {0}")]
    Validation(ValidationErrors),

    /// The request body could not be decoded as a transaction.
    #[error("could not decode request body: {0}")]
    InvalidPayload(String),

    /// The database directory or file could not be created or opened.
    ///
    /// The string describes the underlying IO or SQLite error and should only
    /// be logged on the server.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A transaction was inserted but could not be read back by its new ID.
    #[error("the newly created transaction could not be found")]
    CreatedTransactionMissing,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidKind(_) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "detail": "Invalid kind" }))).into_response()
            }
            Error::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": errors.0 })),
            )
                .into_response(),
            Error::InvalidPayload(reason) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": reason })),
            )
                .into_response(),
            Error::NotFound => get_404_not_found_response(),
            Error::StorageUnavailable(reason) => {
                tracing::error!("Could not access the database: {reason}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "detail": "Storage unavailable" })),
                )
                    .into_response()
            }
            Error::CreatedTransactionMissing => {
                tracing::error!("Inserted a transaction but could not read it back.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Failed to create transaction" })),
                )
                    .into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

/// A validation failure for a single field of a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The name of the field as it appears in the JSON payload.
    pub field: String,
    /// A human readable explanation of why the value was rejected.
    pub message: String,
}

impl FieldError {
    /// Create a field error for `field`.
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_owned(),
            message: message.into(),
        }
    }
}

/// Every field error found while validating a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    /// Record a failure for `field`.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Whether no failures have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The names of the fields that failed, in the order they were checked.
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|error| error.field.as_str()).collect()
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self
            .0
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect();

        write!(f, "{}", messages.join("; "))
    }
}
