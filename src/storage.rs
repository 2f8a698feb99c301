//! Web Storage capability (`sessionStorage` / `localStorage`) and a named
//! slot helper for JSON records stored under a single key.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// The `Storage` interface, reduced to what page scripts use.
pub trait KeyValueStore: fmt::Debug {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove_item(&mut self, key: &str);

    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory storage area. Keys keep insertion order, like browsers report
/// them through `Storage.key(n)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: Vec<(String, String)>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes once keys plus values exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Vec::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn key(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(key, _)| key.as_str())
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(existing, _)| existing != key)
            .map(|(existing, value)| existing.len() + value.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.clone())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota_bytes {
            if self.used_bytes_without(key) + key.len() + value.len() > quota {
                return Err(Error::QuotaExceeded { key: key.into() });
            }
        }
        match self.entries.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn remove_item(&mut self, key: &str) {
        self.entries.retain(|(existing, _)| existing != key);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Shared handle to a storage area. Every page loaded in the same tab holds a
/// clone of the same session handle.
#[derive(Clone)]
pub struct StorageHandle(Rc<RefCell<Box<dyn KeyValueStore>>>);

impl StorageHandle {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self(Rc::new(RefCell::new(Box::new(store))))
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }
}

impl fmt::Debug for StorageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StorageHandle").field(&self.0.borrow()).finish()
    }
}

impl KeyValueStore for StorageHandle {
    fn get_item(&self, key: &str) -> Option<String> {
        self.0.borrow().get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.0.borrow_mut().set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) {
        self.0.borrow_mut().remove_item(key);
    }

    fn clear(&mut self) {
        self.0.borrow_mut().clear();
    }

    fn len(&self) -> usize {
        self.0.borrow().len()
    }
}

/// One named key in a storage area holding a JSON-encoded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSlot {
    key: String,
}

impl StorageSlot {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn read_raw(&self, store: &dyn KeyValueStore) -> Option<String> {
        store.get_item(&self.key)
    }

    /// `None` when the slot is empty; `Some(Err(_))` when it holds something
    /// that does not decode as `T`.
    pub fn read_json<T: DeserializeOwned>(
        &self,
        store: &dyn KeyValueStore,
    ) -> Option<serde_json::Result<T>> {
        self.read_raw(store).map(|raw| serde_json::from_str(&raw))
    }

    /// Replaces the slot with the JSON encoding of `value`.
    pub fn write_json<T: Serialize>(&self, store: &mut dyn KeyValueStore, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)
            .map_err(|err| Error::ScriptRuntime(format!("cannot encode {}: {err}", self.key)))?;
        store.set_item(&self.key, &raw)
    }

    pub fn clear(&self, store: &mut dyn KeyValueStore) {
        store.remove_item(&self.key);
    }
}
