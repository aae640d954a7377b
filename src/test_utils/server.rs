use axum_test::{TestResponse, TestServer};
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::{AppState, Storage, build_router, endpoints};

/// Create a test server backed by a fresh database in a temporary directory.
///
/// The [TempDir] must be kept alive for as long as the server is used.
pub(crate) fn get_test_server() -> (TestServer, AppState, TempDir) {
    let temp_dir = TempDir::new().expect("Could not create temporary directory.");
    let storage = Storage::new(temp_dir.path().join("spendly.db"));
    let state = AppState::new(storage).expect("Could not initialize database.");
    let server =
        TestServer::new(build_router(state.clone()));

    (server, state, temp_dir)
}

pub(crate) async fn post_transaction(
    server: &TestServer,
    kind: &str,
    amount: Value,
    description: &str,
    entry_date: &str,
) -> TestResponse {
    server
        .post(endpoints::TRANSACTIONS_API)
        .json(&json!({
            "kind": kind,
            "amount": amount,
            "description": description,
            "entry_date": entry_date,
        }))
        .await
}
