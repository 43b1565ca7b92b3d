use std::{collections::HashMap, sync::RwLock};

use crate::errors::Result;

use super::SnapshotStore;

/// In-memory snapshot store. Used by tests and by sessions that opt out
/// of persistence; contents vanish with the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().expect("MemoryStore lock poisoned");
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, payload: &str) -> Result<()> {
        let mut entries = self.entries.write().expect("MemoryStore lock poisoned");
        entries.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_back_what_was_written() {
        let store = MemoryStore::new();
        store.write("transactions", "[]").expect("write");
        assert_eq!(
            store.read("transactions").expect("read").as_deref(),
            Some("[]")
        );
        assert!(store.read("subscriptions").expect("read").is_none());
    }
}
