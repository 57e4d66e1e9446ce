//! Injected per-request session storage.
//!
//! The session is a key-value store owned by the hosting environment and
//! handed to the request at construction time. The routing layer never
//! creates or persists sessions on its own; it only reads and writes
//! through the [`SessionStore`] contract.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use serde_json::Value;

/// Contract for the externally-owned session store.
///
/// Values are [`serde_json::Value`]s so stores can hold heterogeneous data.
/// Methods take `&self`: implementations are expected to use interior
/// mutability, since sessions are mutated behind a shared request view.
pub trait SessionStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value);

    /// Removes the value stored under `key`. Removing an absent key is a no-op.
    fn delete(&self, key: &str);
}

/// In-memory [`SessionStore`] used when the hosting environment does not
/// inject its own.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.lock().expect("session store lock poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.values.lock().expect("session store lock poisoned").insert(key.to_string(), value);
    }

    fn delete(&self, key: &str) {
        self.values.lock().expect("session store lock poisoned").remove(key);
    }
}

/// Session handle exposed by the request. Delegates to the injected store.
pub struct Session {
    store: Box<dyn SessionStore>,
}

impl Session {
    pub(crate) fn new(store: Box<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Returns the session value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.store.get(key)
    }

    /// Stores `value` under `key` in the session.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        self.store.set(key, value.into());
    }

    /// Removes the session value stored under `key`.
    pub fn delete(&self, key: &str) {
        self.store.delete(key);
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_then_get_round_trips() {
        let session = Session::new(Box::new(MemoryStore::new()));
        session.set("user_id", json!(42));
        assert_eq!(session.get("user_id"), Some(json!(42)));
    }

    #[test]
    fn get_missing_key_is_none() {
        let session = Session::new(Box::new(MemoryStore::new()));
        assert_eq!(session.get("missing"), None);
    }

    #[test]
    fn delete_removes_value() {
        let session = Session::new(Box::new(MemoryStore::new()));
        session.set("token", "abc");
        session.delete("token");
        assert_eq!(session.get("token"), None);

        // deleting again must not panic
        session.delete("token");
    }

    #[test]
    fn set_overwrites_previous_value() {
        let session = Session::new(Box::new(MemoryStore::new()));
        session.set("lang", "en");
        session.set("lang", "it");
        assert_eq!(session.get("lang"), Some(json!("it")));
    }
}
