//! Key/value persistence port.
//!
//! Watchlist and credential state go through [`Storage`] so they can be
//! backed by a JSON file in the CLI and by memory in tests.

pub mod file;
pub mod memory;

use anyhow::Result;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    /// All keys currently stored, sorted.
    fn list(&self) -> Result<Vec<String>>;
    fn remove(&mut self, key: &str) -> Result<Option<String>>;
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn list(&self) -> Result<Vec<String>> {
        (**self).list()
    }

    fn remove(&mut self, key: &str) -> Result<Option<String>> {
        (**self).remove(key)
    }
}
