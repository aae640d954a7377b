//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, database_id::TransactionId};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money that was earned, e.g. a salary payment.
    Income,
    /// Money that was spent, e.g. groceries.
    Expense,
}

impl TransactionKind {
    /// The literal used for this kind on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    /// Parse a kind from its exact lowercase literal.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidKind] for anything other than "income" or "expense".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(Error::InvalidKind(other.to_owned())),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// The amount of money, always positive and with two decimal places.
    pub amount: Decimal,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub entry_date: Date,
}

/// A validated transaction that has not been saved yet.
///
/// Use [crate::TransactionForm::validate] to create one from a request payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// The amount of money, greater than zero with at most two decimal places.
    pub amount: Decimal,
    /// Between 1 and 200 characters describing the transaction.
    pub description: String,
    /// When the transaction happened.
    pub entry_date: Date,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Amounts are read back as whole cents so that they come out as exact decimals.
const SELECT_TRANSACTION_COLUMNS: &str = "SELECT id, kind, \
    CAST(ROUND(amount * 100) AS INTEGER) AS amount_cents, description, entry_date \
    FROM transactions";

/// Create a new transaction in the database and return it as stored.
///
/// The row is read back by its new ID after the insert.
///
/// # Errors
/// This function will return a:
/// - [Error::CreatedTransactionMissing] if the inserted row cannot be read back,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let amount = f64::try_from(new_transaction.amount).map_err(|error| {
        Error::SqlError(rusqlite::Error::ToSqlConversionFailure(Box::new(error)))
    })?;

    connection.execute(
        "INSERT INTO transactions (kind, amount, description, entry_date)
         VALUES (?1, ?2, ?3, ?4)",
        (
            new_transaction.kind,
            amount,
            &new_transaction.description,
            new_transaction.entry_date,
        ),
    )?;

    let id = connection.last_insert_rowid();

    get_transaction(id, connection).map_err(|error| match error {
        Error::NotFound => Error::CreatedTransactionMissing,
        error => error,
    })
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!("{SELECT_TRANSACTION_COLUMNS} WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get all transactions, or only those of `kind` if it is given.
///
/// Transactions are sorted newest first by entry date, with ties going to the
/// most recently created transaction.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_transactions(
    kind: Option<TransactionKind>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_TRANSACTION_COLUMNS}
             WHERE ?1 IS NULL OR kind = ?1
             ORDER BY entry_date DESC, id DESC"
        ))?
        .query_map([kind], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Get the sum of the amounts of all transactions of `kind`.
///
/// Returns zero if there are no transactions of that kind.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn sum_by_kind(kind: TransactionKind, connection: &Connection) -> Result<Decimal, Error> {
    let total_cents: i64 = connection.query_row(
        "SELECT COALESCE(SUM(CAST(ROUND(amount * 100) AS INTEGER)), 0)
         FROM transactions WHERE kind = ?1",
        [kind],
        |row| row.get(0),
    )?;

    Ok(Decimal::new(total_cents, 2))
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM transactions;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the transaction table in the database if it does not exist.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                amount REAL NOT NULL,
                description TEXT NOT NULL,
                entry_date TEXT NOT NULL
                )",
        (),
    )?;

    // Matches the sort order of the transaction list.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_entry_date
         ON transactions(entry_date DESC, id DESC);",
        (),
    )?;

    Ok(())
}

/// Map a database row selected with the transaction columns to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let amount_cents: i64 = row.get("amount_cents")?;

    Ok(Transaction {
        id: row.get("id")?,
        kind: row.get("kind")?,
        amount: Decimal::new(amount_cents, 2),
        description: row.get("description")?,
        entry_date: row.get("entry_date")?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{Date, macros::date};

    use crate::{
        Error,
        db::initialize,
        transaction::{
            NewTransaction, TransactionKind, count_transactions, create_transaction,
            get_transaction, list_transactions, sum_by_kind,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn new_transaction(
        kind: TransactionKind,
        amount: Decimal,
        description: &str,
        entry_date: Date,
    ) -> NewTransaction {
        NewTransaction {
            kind,
            amount,
            description: description.to_owned(),
            entry_date,
        }
    }

    #[test]
    fn create_returns_stored_transaction() {
        let conn = get_test_connection();
        let want = new_transaction(
            TransactionKind::Income,
            dec!(100.00),
            "Salary",
            date!(2024 - 01 - 01),
        );

        let got = create_transaction(want.clone(), &conn).unwrap();

        assert_eq!(got.id, 1);
        assert_eq!(got.kind, want.kind);
        assert_eq!(got.amount, want.amount);
        assert_eq!(got.description, want.description);
        assert_eq!(got.entry_date, want.entry_date);
    }

    #[test]
    fn ids_strictly_increase() {
        let conn = get_test_connection();
        let mut last_id = 0;

        for i in 1..=5 {
            let transaction = create_transaction(
                new_transaction(
                    TransactionKind::Expense,
                    Decimal::new(i * 100, 2),
                    "Coffee",
                    date!(2024 - 03 - 01),
                ),
                &conn,
            )
            .unwrap();

            assert!(
                transaction.id > last_id,
                "got id {} after id {last_id}",
                transaction.id
            );
            last_id = transaction.id;
        }

        assert_eq!(count_transactions(&conn).unwrap(), 5);
    }

    #[test]
    fn amounts_are_returned_with_two_decimal_places() {
        let conn = get_test_connection();

        let transaction = create_transaction(
            new_transaction(
                TransactionKind::Expense,
                dec!(40),
                "Groceries",
                date!(2024 - 01 - 02),
            ),
            &conn,
        )
        .unwrap();

        assert_eq!(transaction.amount.to_string(), "40.00");
    }

    #[test]
    fn largest_amount_is_stored_exactly() {
        let conn = get_test_connection();

        let transaction = create_transaction(
            new_transaction(
                TransactionKind::Income,
                dec!(9999999999.99),
                "Lottery",
                date!(2024 - 01 - 02),
            ),
            &conn,
        )
        .unwrap();

        assert_eq!(transaction.amount, dec!(9999999999.99));
        assert_eq!(
            sum_by_kind(TransactionKind::Income, &conn).unwrap(),
            dec!(9999999999.99)
        );
    }

    #[test]
    fn get_missing_transaction_returns_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_transaction(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn list_is_sorted_by_date_then_id_descending() {
        let conn = get_test_connection();
        let dates = [
            date!(2024 - 01 - 02),
            date!(2024 - 01 - 01),
            date!(2024 - 01 - 03),
            date!(2024 - 01 - 02),
            date!(2024 - 01 - 01),
        ];
        for entry_date in dates {
            create_transaction(
                new_transaction(TransactionKind::Income, dec!(1.00), "Pay", entry_date),
                &conn,
            )
            .unwrap();
        }

        let transactions = list_transactions(None, &conn).unwrap();

        let got: Vec<(Date, i64)> = transactions
            .iter()
            .map(|transaction| (transaction.entry_date, transaction.id))
            .collect();
        let want = vec![
            (date!(2024 - 01 - 03), 3),
            (date!(2024 - 01 - 02), 4),
            (date!(2024 - 01 - 02), 1),
            (date!(2024 - 01 - 01), 5),
            (date!(2024 - 01 - 01), 2),
        ];
        assert_eq!(got, want);
    }

    #[test]
    fn list_filters_by_kind() {
        let conn = get_test_connection();
        let salary = create_transaction(
            new_transaction(
                TransactionKind::Income,
                dec!(100.00),
                "Salary",
                date!(2024 - 01 - 01),
            ),
            &conn,
        )
        .unwrap();
        let groceries = create_transaction(
            new_transaction(
                TransactionKind::Expense,
                dec!(40.00),
                "Groceries",
                date!(2024 - 01 - 02),
            ),
            &conn,
        )
        .unwrap();

        assert_eq!(
            list_transactions(Some(TransactionKind::Income), &conn).unwrap(),
            vec![salary.clone()]
        );
        assert_eq!(
            list_transactions(Some(TransactionKind::Expense), &conn).unwrap(),
            vec![groceries.clone()]
        );
        assert_eq!(
            list_transactions(None, &conn).unwrap(),
            vec![groceries, salary]
        );
    }

    #[test]
    fn list_empty_database() {
        let conn = get_test_connection();

        assert_eq!(list_transactions(None, &conn).unwrap(), vec![]);
    }

    #[test]
    fn sum_is_zero_without_transactions() {
        let conn = get_test_connection();

        assert_eq!(
            sum_by_kind(TransactionKind::Income, &conn).unwrap(),
            Decimal::ZERO
        );
        assert_eq!(
            sum_by_kind(TransactionKind::Expense, &conn).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn sum_is_exact_for_cent_amounts() {
        let conn = get_test_connection();
        // 0.1 + 0.2 drifts in floating point arithmetic.
        for amount in [dec!(0.10), dec!(0.20), dec!(0.01)] {
            create_transaction(
                new_transaction(
                    TransactionKind::Expense,
                    amount,
                    "Gum",
                    date!(2024 - 02 - 01),
                ),
                &conn,
            )
            .unwrap();
        }
        create_transaction(
            new_transaction(
                TransactionKind::Income,
                dec!(9999999999.99),
                "Lottery",
                date!(2024 - 02 - 01),
            ),
            &conn,
        )
        .unwrap();

        assert_eq!(
            sum_by_kind(TransactionKind::Expense, &conn).unwrap(),
            dec!(0.31)
        );
        assert_eq!(
            sum_by_kind(TransactionKind::Income, &conn).unwrap(),
            dec!(9999999999.99)
        );
    }

    #[test]
    fn check_constraint_rejects_unknown_kind() {
        let conn = get_test_connection();

        let result = conn.execute(
            "INSERT INTO transactions (kind, amount, description, entry_date)
             VALUES ('bogus', 1.0, 'foo', '2024-01-01')",
            (),
        );

        assert!(result.is_err(), "want constraint error, got {result:?}");
        assert_eq!(count_transactions(&conn).unwrap(), 0);
    }

    #[test]
    fn entry_date_is_stored_as_iso_string() {
        let conn = get_test_connection();
        create_transaction(
            new_transaction(
                TransactionKind::Income,
                dec!(1.00),
                "Pay",
                date!(2024 - 07 - 09),
            ),
            &conn,
        )
        .unwrap();

        let stored: String = conn
            .query_row("SELECT entry_date FROM transactions", [], |row| row.get(0))
            .unwrap();

        assert_eq!(stored, "2024-07-09");
    }
}
