use chrono::Utc;
use crate::errors::SiteError;
use super::Database;

impl Database {
    pub fn get_item(&self, key: &str) -> Result<Option<String>, SiteError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT value FROM client_storage WHERE key = ?1")
            .map_err(|e| SiteError::Database(format!("Query failed: {}", e)))?;

        match stmt.query_row(rusqlite::params![key], |row: &rusqlite::Row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(SiteError::Database(format!("Query error: {}", e))),
        }
    }

    /// Upsert. Entries are only ever overwritten, never deleted.
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), SiteError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO client_storage (key, value, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, value, Utc::now().to_rfc3339()],
        ).map_err(|e| SiteError::Database(format!("Insert failed: {}", e)))?;
        Ok(())
    }

}
