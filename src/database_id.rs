//! Database ID type definition.

/// Alias for the integer type SQLite assigns to new transactions.
pub type TransactionId = i64;
