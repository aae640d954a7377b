//! Access to the application's SQLite database file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rusqlite::Connection;

use crate::{Error, transaction::create_transaction_table};

/// The location of the application database.
///
/// A connection is opened for each operation and closed when it is dropped,
/// so no connection outlives the call that opened it.
#[derive(Debug, Clone, PartialEq)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    /// Create a storage handle for the SQLite file at `path`.
    ///
    /// Nothing is touched on disk until a connection is opened.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path to the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a new connection to the database, creating the parent directory
    /// and the database file if they do not exist.
    ///
    /// # Errors
    /// Returns an [Error::StorageUnavailable] if the directory cannot be
    /// created or the file cannot be opened.
    pub fn open_connection(&self) -> Result<Connection, Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|error| {
                Error::StorageUnavailable(format!(
                    "could not create the directory {}: {error}",
                    parent.display()
                ))
            })?;
        }

        Connection::open(&self.path).map_err(|error| {
            Error::StorageUnavailable(format!(
                "could not open the database {}: {error}",
                self.path.display()
            ))
        })
    }

    /// Create the application tables if they do not already exist.
    ///
    /// Safe to call more than once.
    ///
    /// # Errors
    /// Returns an error if a connection cannot be opened or there is an SQL error.
    pub fn initialize_schema(&self) -> Result<(), Error> {
        let connection = self.open_connection()?;
        initialize(&connection)?;
        tracing::debug!("Initialized database schema at {}", self.path.display());

        Ok(())
    }
}

/// Create the tables for the domain models on an open connection.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_transaction_table(connection)
}
