//! Shared application state for handlers.

use fiado_db::Database;

/// State injected into every handler. Cloning is cheap: the database handle
/// wraps a reference-counted pool.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
