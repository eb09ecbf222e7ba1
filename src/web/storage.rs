use web_sys::Storage;

use crate::config::KeyValueStorage;
use crate::error::{CursorsError, CursorsResult, OptionExt, ResultExt};

/// `window.localStorage`.
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    pub fn new() -> CursorsResult<Self> {
        let window = web_sys::window().context("No window")?;
        let storage = window
            .local_storage()
            .context("Failed to access localStorage")?
            .ok_or_else(|| CursorsError::StorageError("localStorage unavailable".into()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStorage for LocalStorage {
    fn get_item(&self, key: &str) -> CursorsResult<Option<String>> {
        self.storage
            .get_item(key)
            .with_context(|| format!("Failed to read {:?} from localStorage", key))
    }

    fn set_item(&self, key: &str, value: &str) -> CursorsResult<()> {
        self.storage
            .set_item(key, value)
            .with_context(|| format!("Failed to write {:?} to localStorage", key))
    }
}
