//! Durable string key/value storage backing the progress ledger.
//!
//! Synchronous, last-write-wins per key, scoped to this machine.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::utils::{AppError, Result};

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

fn poisoned<T>(_: T) -> AppError {
    AppError::Storage("store lock poisoned".to_string())
}
