//! SQLite storage primitives.
//!
//! Each [`Database`] owns a single connection guarded by a mutex. Queries run on
//! the blocking thread pool via [`Database::call`] so request handlers never
//! block the async executor.

pub mod error;
pub mod schema;

#[cfg(test)]
mod tests;

pub use error::StoreError;
pub use schema::Schema;

use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Shared handle to one SQLite database file.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    schema: Schema,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("schema", &self.schema)
            .finish()
    }
}

impl Database {
    /// Opens (or creates) the database at `path` and applies `schema`.
    pub fn open(path: &Path, schema: Schema) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        info!(path = %path.display(), ?schema, "Opened SQLite database");
        Self::with_connection(conn, schema)
    }

    /// Opens a private in-memory database with `schema` applied.
    pub fn open_in_memory(schema: Schema) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?, schema)
    }

    fn with_connection(conn: Connection, schema: Schema) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        schema.apply(&conn)?;
        debug!(?schema, "Schema applied");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            schema,
        })
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    /// Runs `f` against the connection on the blocking pool.
    pub async fn call<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock();
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::TaskFailed(e.to_string()))?
    }
}

/// Current local time in the stored timestamp format.
pub fn now_timestamp() -> String {
    chrono::Local::now()
        .format(crate::constants::TIMESTAMP_FORMAT)
        .to_string()
}
