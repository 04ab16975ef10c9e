//! Backing stores: the key/value containers behind every model.
//!
//! Models never hold typed fields. Every property lives in a
//! [`BackingStore`] keyed by its wire name, which lets a store track which
//! properties changed after a model was decoded and notify subscribers on
//! every write.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::trace;
use uuid::Uuid;

use crate::error::StoreError;
use crate::value::StoreValue;

/// Callback invoked on every write with `(key, old value, new value)`.
pub type SubscriptionCallback =
    Arc<dyn Fn(&str, Option<&StoreValue>, Option<&StoreValue>) + Send + Sync>;

/// A key/value container standing in for typed struct fields.
///
/// Implementations must be object safe and cloneable so models can derive
/// `Clone` over a `Box<dyn BackingStore>`.
pub trait BackingStore: fmt::Debug + Send + Sync {
    /// Returns the value stored under `key`.
    ///
    /// When [`return_only_changed_values`](Self::return_only_changed_values)
    /// is set, unchanged keys read as `None`.
    fn get(&self, key: &str) -> Result<Option<&StoreValue>, StoreError>;

    /// Stores `value` under `key` and notifies subscribers.
    fn set(&mut self, key: &str, value: StoreValue) -> Result<(), StoreError>;

    /// Returns every visible `(key, value)` pair in key order.
    fn enumerate(&self) -> Vec<(&str, &StoreValue)>;

    /// Returns the keys that were changed to `Null`.
    fn keys_changed_to_null(&self) -> Vec<&str>;

    /// Registers a callback and returns its generated id.
    fn subscribe(&mut self, callback: SubscriptionCallback) -> String;

    /// Registers (or replaces) a callback under a caller-chosen id.
    fn subscribe_with_id(&mut self, id: &str, callback: SubscriptionCallback);

    /// Removes a callback. Returns `false` if the id was unknown.
    fn unsubscribe(&mut self, id: &str) -> bool;

    /// Removes every stored value.
    fn clear(&mut self);

    fn initialization_completed(&self) -> bool;

    /// Marks the end (or restart) of initialization.
    ///
    /// Every stored key's changed flag is reset to `!completed`.
    fn set_initialization_completed(&mut self, completed: bool);

    fn return_only_changed_values(&self) -> bool;

    fn set_return_only_changed_values(&mut self, only_changed: bool);

    fn clone_box(&self) -> Box<dyn BackingStore>;
}

impl Clone for Box<dyn BackingStore> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Returns the store every model constructor uses.
pub fn default_backing_store() -> Box<dyn BackingStore> {
    Box::new(InMemoryBackingStore::new())
}

#[derive(Debug, Clone)]
struct Entry {
    changed: bool,
    value: StoreValue,
}

/// The default [`BackingStore`]: a sorted map with change tracking.
///
/// A new store starts with initialization completed, so values set by
/// hand count as changes. Decoders switch initialization off while they
/// fill a model and back on when they are done.
#[derive(Clone)]
pub struct InMemoryBackingStore {
    entries: BTreeMap<String, Entry>,
    subscribers: BTreeMap<String, SubscriptionCallback>,
    initialization_completed: bool,
    return_only_changed_values: bool,
}

impl Default for InMemoryBackingStore {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            subscribers: BTreeMap::new(),
            initialization_completed: true,
            return_only_changed_values: false,
        }
    }
}

impl InMemoryBackingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `key` has been written since initialization
    /// completed.
    pub fn is_changed(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|e| e.changed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn visible(&self, entry: &Entry) -> bool {
        !self.return_only_changed_values || entry.changed
    }
}

impl fmt::Debug for InMemoryBackingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryBackingStore")
            .field("entries", &self.entries)
            .field("subscribers", &self.subscribers.keys().collect::<Vec<_>>())
            .field("initialization_completed", &self.initialization_completed)
            .field("return_only_changed_values", &self.return_only_changed_values)
            .finish()
    }
}

impl BackingStore for InMemoryBackingStore {
    fn get(&self, key: &str) -> Result<Option<&StoreValue>, StoreError> {
        Ok(self
            .entries
            .get(key)
            .filter(|e| self.visible(e))
            .map(|e| &e.value))
    }

    fn set(&mut self, key: &str, value: StoreValue) -> Result<(), StoreError> {
        let entry = Entry {
            changed: self.initialization_completed,
            value,
        };
        let old = self.entries.insert(key.to_owned(), entry);
        trace!(key, changed = self.initialization_completed, "store set");

        if !self.subscribers.is_empty() {
            let new = self.entries.get(key).map(|e| &e.value);
            let old = old.as_ref().map(|e| &e.value);
            for callback in self.subscribers.values() {
                callback(key, old, new);
            }
        }
        Ok(())
    }

    fn enumerate(&self) -> Vec<(&str, &StoreValue)> {
        self.entries
            .iter()
            .filter(|(_, e)| self.visible(e))
            .map(|(k, e)| (k.as_str(), &e.value))
            .collect()
    }

    fn keys_changed_to_null(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, e)| e.changed && e.value.is_null())
            .map(|(k, _)| k.as_str())
            .collect()
    }

    fn subscribe(&mut self, callback: SubscriptionCallback) -> String {
        let id = Uuid::new_v4().to_string();
        self.subscribers.insert(id.clone(), callback);
        id
    }

    fn subscribe_with_id(&mut self, id: &str, callback: SubscriptionCallback) {
        self.subscribers.insert(id.to_owned(), callback);
    }

    fn unsubscribe(&mut self, id: &str) -> bool {
        self.subscribers.remove(id).is_some()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn initialization_completed(&self) -> bool {
        self.initialization_completed
    }

    fn set_initialization_completed(&mut self, completed: bool) {
        self.initialization_completed = completed;
        for entry in self.entries.values_mut() {
            entry.changed = !completed;
        }
    }

    fn return_only_changed_values(&self) -> bool {
        self.return_only_changed_values
    }

    fn set_return_only_changed_values(&mut self, only_changed: bool) {
        self.return_only_changed_values = only_changed;
    }

    fn clone_box(&self) -> Box<dyn BackingStore> {
        Box::new(self.clone())
    }
}
