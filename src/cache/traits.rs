//! Storage trait for the persistent key-value store.

use color_eyre::Result;

/// Trait for string key-value storage backends.
///
/// The cache layer and the favorites set both receive a shared store at
/// construction; nothing in the crate reaches storage through a global.
/// Backends promise nothing across calls: concurrent writers to the same key
/// are last-write-wins.
pub trait Store: Send + Sync {
  /// Read the value stored under `key`, if any.
  fn get(&self, key: &str) -> Result<Option<String>>;

  /// Write `value` under `key`, replacing any previous value.
  ///
  /// May fail when the backend is out of space. Callers that write
  /// opportunistically treat that as degradation, not as an error to
  /// propagate.
  fn set(&self, key: &str, value: &str) -> Result<()>;

  /// Remove the entry under `key`. Removing a missing key is not an error.
  fn remove(&self, key: &str) -> Result<()>;

  /// List every key currently present.
  fn keys(&self) -> Result<Vec<String>>;
}
