//! Key-value storage port and its adapters.
//!
//! The session treats storage as an opaque string-keyed store with
//! `get`/`set`/`remove`; everything else (file layout, formats) is an
//! adapter concern.

mod json_file;
mod memory;

pub use json_file::*;
pub use memory::*;

use crate::error::StorageError;

/// Outbound port for the external key-value store.
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key; removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}
