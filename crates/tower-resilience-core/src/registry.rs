//! Process-wide named-instance registry.
//!
//! Several resilience patterns (the adaptive throttle, the bulkhead breaker) are
//! addressed by name rather than by value: the first caller for a given name creates
//! the instance, later callers for the same name share it. [`Registry`] implements
//! that once, generically, so individual crates don't each reinvent the
//! double-checked-locking dance.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A process-wide map from name to shared instance, with double-checked insertion.
///
/// Readers take a shared lock for the common case (instance already exists).
/// Only the thread that observes a miss takes the exclusive lock, and it re-checks
/// before inserting in case another thread won the race in between.
pub struct Registry<T> {
    entries: RwLock<HashMap<String, Arc<T>>>,
}

impl<T> Registry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the instance registered under `name`, creating it with `make` if absent.
    ///
    /// `make` may run more than zero times only if it never runs concurrently with
    /// itself for the same name winning the race; at most one value per name is ever
    /// observable by callers.
    pub fn get_or_insert<F>(&self, name: &str, make: F) -> Arc<T>
    where
        F: FnOnce() -> T,
    {
        if let Some(existing) = self.entries.read().unwrap().get(name) {
            return Arc::clone(existing);
        }

        let mut entries = self.entries.write().unwrap();
        if let Some(existing) = entries.get(name) {
            return Arc::clone(existing);
        }

        let created = Arc::new(make());
        entries.insert(name.to_string(), Arc::clone(&created));
        created
    }

    /// Returns the instance registered under `name`, if any, without creating one.
    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        self.entries.read().unwrap().get(name).cloned()
    }

    /// Removes a single named instance, returning it if present.
    pub fn remove(&self, name: &str) -> Option<Arc<T>> {
        self.entries.write().unwrap().remove(name)
    }

    /// Removes every registered instance.
    pub fn flush(&self) {
        self.entries.write().unwrap().clear();
    }

    /// Returns the number of currently registered instances.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Returns true if the registry holds no instances.
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
