//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the `TransactionKind` enum
//! - Validation of incoming transaction payloads
//! - Database functions for storing, querying, and summing transactions
//! - Route handlers for listing and creating transactions

mod core;
mod create_endpoint;
mod form;
mod list_endpoint;

pub use core::{
    NewTransaction, Transaction, TransactionKind, count_transactions, create_transaction,
    create_transaction_table, list_transactions, sum_by_kind,
};
pub use create_endpoint::create_transaction_endpoint;
pub use form::{RawAmount, TransactionForm};
pub use list_endpoint::list_transactions_endpoint;

#[cfg(test)]
pub use core::get_transaction;
