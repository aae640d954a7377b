//! The API endpoints URIs.

/// The route to list and create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route for the income, expense and balance totals.
pub const SUMMARY_API: &str = "/api/summary";
