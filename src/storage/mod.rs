pub mod json_store;
pub mod memory;

use crate::errors::Result;

/// Snapshot key holding the serialized transaction collection.
pub const TRANSACTIONS_KEY: &str = "transactions";
/// Snapshot key holding the serialized subscription collection.
pub const SUBSCRIPTIONS_KEY: &str = "subscriptions";

/// Abstraction over snapshot persistence backends: a key-value surface
/// where each key holds one serialized collection.
pub trait SnapshotStore: Send + Sync {
    /// Returns the payload stored under `key`, or `None` when the key has
    /// never been written.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the payload stored under `key`.
    fn write(&self, key: &str, payload: &str) -> Result<()>;
}

pub use json_store::JsonFileStore;
pub use memory::MemoryStore;
