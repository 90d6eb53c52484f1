/// Durable key/value storage standing in for the browser's local storage.
pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS client_storage (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";
