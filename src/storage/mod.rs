pub mod json_backend;
pub mod memory;

use crate::errors::Result;

/// Abstraction over key-value stores holding integer preferences.
///
/// Keys are the canonical currency keys plus the reserved initial-grant
/// flag; no other namespace is used. `set_int` may buffer in memory, and
/// `flush` makes pending writes durable.
pub trait PrefStore {
    fn get_int(&self, key: &str) -> Option<i64>;
    fn set_int(&mut self, key: &str, value: i64);
    fn has_key(&self, key: &str) -> bool;
    fn flush(&mut self) -> Result<()>;
}

pub use json_backend::JsonPrefStore;
pub use memory::MemoryPrefStore;
