use std::collections::HashMap;
use std::sync::Mutex;
use crate::db::Database;
use crate::errors::SiteError;

/// Durable string storage keyed by name, modelled on browser local storage.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SiteError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SiteError>;
}

impl KeyValueStorage for Database {
    fn get(&self, key: &str) -> Result<Option<String>, SiteError> {
        self.get_item(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SiteError> {
        self.set_item(key, value)
    }
}

/// Process-local storage, used by tests and when no database path is usable.
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SiteError> {
        let items = self.items.lock()
            .map_err(|_| SiteError::Storage("Storage mutex poisoned".into()))?;
        Ok(items.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SiteError> {
        let mut items = self.items.lock()
            .map_err(|_| SiteError::Storage("Storage mutex poisoned".into()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
