//! Shared application state.

use crate::error::AppError;
use log::warn;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, PoisonError};

/// State shared by every handler.
///
/// SQLite work runs on the blocking pool while holding the connection lock,
/// so one request's check-then-write sequence never interleaves with
/// another's.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `f` with exclusive access to the connection on the blocking pool.
    pub async fn run<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Connection) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            // SQLite rolls back partial work itself, so a panicked holder
            // leaves the connection usable.
            let conn = db.lock().unwrap_or_else(|poisoned| {
                warn!("event=db_lock module=web status=recovered");
                PoisonError::into_inner(poisoned)
            });
            f(&conn)
        })
        .await
        .map_err(|err| AppError::Internal(format!("blocking task failed: {err}")))?
    }
}
