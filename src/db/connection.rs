use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use crate::errors::SiteError;

/// Durable client-side key/value storage backed by SQLite.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the store at `path`, creating parent directories.
    pub fn new(path: &str) -> Result<Self, SiteError> {
        if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)
            .map_err(|e| SiteError::Database(format!("Failed to open client storage at {}: {}", path, e)))?;
        Self::with_connection(conn, true)
    }

    pub fn in_memory() -> Result<Self, SiteError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SiteError::Database(format!("Failed to open in-memory client storage: {}", e)))?;
        Self::with_connection(conn, false)
    }

    fn with_connection(conn: Connection, wal: bool) -> Result<Self, SiteError> {
        if wal {
            conn.pragma_update(None, "journal_mode", "WAL")
                .map_err(|e| SiteError::Database(format!("Failed to enable WAL: {}", e)))?;
        }
        conn.execute_batch(super::schema::CREATE_TABLES)
            .map_err(|e| SiteError::Database(format!("Failed to create client storage table: {}", e)))?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// A poisoned lock means a writer panicked mid-update; callers treat it
    /// like any other unavailable storage.
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, SiteError> {
        self.conn
            .lock()
            .map_err(|_| SiteError::Storage("client storage lock poisoned".into()))
    }
}
