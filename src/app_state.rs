//! Implements a struct that holds the state of the REST server.

use crate::{Error, db::Storage};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Where the application database lives.
    pub storage: Storage,
}

impl AppState {
    /// Create a new [AppState] backed by the SQLite database in `storage`.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new(storage: Storage) -> Result<Self, Error> {
        storage.initialize_schema()?;

        Ok(Self { storage })
    }
}
