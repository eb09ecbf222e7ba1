//! Values persisted across page loads.
//!
//! A `StickyState` reads its value from storage once (falling back to a
//! default), writes it back immediately, and rewrites it on every change.
//! Values are stored as JSON so `"#ff0000"` round-trips as a string.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CursorsResult;

/// Storage key of the user's chosen colour.
pub const COLOR_KEY: &str = "color";

/// String key/value storage (browser `localStorage`, or memory).
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> CursorsResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> CursorsResult<()>;
}

/// In-memory storage; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> CursorsResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> CursorsResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct StickyState<T, K> {
    key: String,
    value: T,
    storage: K,
}

impl<T, K> StickyState<T, K>
where
    T: Serialize + DeserializeOwned,
    K: KeyValueStorage,
{
    /// Load `key`, or `default()` if it is missing or unreadable.
    pub fn load(storage: K, key: &str, default: impl FnOnce() -> T) -> CursorsResult<Self> {
        let stored = storage.get_item(key)?;
        let value = match stored.as_deref().map(serde_json::from_str::<T>) {
            Some(Ok(value)) => value,
            Some(Err(e)) => {
                log::warn!("[STICKY] ignoring unreadable {:?}: {}", key, e);
                default()
            }
            None => default(),
        };

        let state = Self {
            key: key.to_string(),
            value,
            storage,
        };
        state.persist()?;
        Ok(state)
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) -> CursorsResult<()> {
        self.value = value;
        self.persist()
    }

    fn persist(&self) -> CursorsResult<()> {
        let json = serde_json::to_string(&self.value)?;
        self.storage.set_item(&self.key, &json)
    }
}
