//! Client-side favorites, persisted through the shared store.

use std::sync::Arc;
use tracing::warn;

use crate::cache::Store;

/// Store key for the favorites set. Deliberately outside every cache prefix
/// so expiry sweeps can never remove it.
pub const FAVORITES_KEY: &str = "favorites";

/// Set of favorite entity ids, persisted as a JSON integer array.
///
/// Shares the injected store with the cache; writes are best-effort and
/// last-write-wins, the same contract as the cache layer.
#[derive(Clone)]
pub struct Favorites {
  store: Arc<dyn Store>,
}

impl Favorites {
  pub fn new(store: Arc<dyn Store>) -> Self {
    Self { store }
  }

  /// Current favorite ids, in insertion order.
  ///
  /// A missing or unreadable entry reads as empty. Duplicates an external
  /// writer may have introduced are dropped, first occurrence wins.
  pub fn ids(&self) -> Vec<u32> {
    let raw = match self.store.get(FAVORITES_KEY) {
      Ok(Some(raw)) => raw,
      _ => return Vec::new(),
    };

    let parsed: Vec<u32> = match serde_json::from_str(&raw) {
      Ok(ids) => ids,
      Err(e) => {
        warn!("favorites entry is unreadable, starting empty: {}", e);
        return Vec::new();
      }
    };

    let mut ids = Vec::with_capacity(parsed.len());
    for id in parsed {
      if !ids.contains(&id) {
        ids.push(id);
      }
    }
    ids
  }

  /// Whether `id` is currently a favorite.
  pub fn contains(&self, id: u32) -> bool {
    self.ids().contains(&id)
  }

  /// Flip membership for `id`. Returns whether it is now a favorite.
  ///
  /// Toggling twice restores the original membership, and the persisted
  /// array never accumulates duplicates.
  pub fn toggle(&self, id: u32) -> bool {
    let mut ids = self.ids();

    let now_favorite = if let Some(pos) = ids.iter().position(|&existing| existing == id) {
      ids.remove(pos);
      false
    } else {
      ids.push(id);
      true
    };

    self.save(&ids);
    now_favorite
  }

  fn save(&self, ids: &[u32]) {
    let json = match serde_json::to_string(ids) {
      Ok(json) => json,
      Err(e) => {
        warn!("could not serialize favorites: {}", e);
        return;
      }
    };

    if let Err(e) = self.store.set(FAVORITES_KEY, &json) {
      warn!("could not persist favorites: {}", e);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::MemoryStore;

  fn favorites_over(store: Arc<dyn Store>) -> Favorites {
    Favorites::new(store)
  }

  #[test]
  fn starts_empty() {
    let favorites = favorites_over(Arc::new(MemoryStore::new()));

    assert!(favorites.ids().is_empty());
    assert!(!favorites.contains(25));
  }

  #[test]
  fn toggle_adds_then_removes() {
    let favorites = favorites_over(Arc::new(MemoryStore::new()));

    assert!(favorites.toggle(25));
    assert!(favorites.contains(25));

    assert!(!favorites.toggle(25));
    assert!(!favorites.contains(25));
  }

  #[test]
  fn double_toggle_restores_original_membership() {
    let favorites = favorites_over(Arc::new(MemoryStore::new()));
    favorites.toggle(1);
    favorites.toggle(25);

    favorites.toggle(25);
    favorites.toggle(25);

    assert_eq!(favorites.ids(), vec![1, 25]);
  }

  #[test]
  fn persisted_array_never_contains_duplicates() {
    let store = Arc::new(MemoryStore::new());
    // An external writer left duplicates behind.
    store.set(FAVORITES_KEY, "[25, 1, 25, 25]").unwrap();

    let favorites = favorites_over(store.clone());
    assert_eq!(favorites.ids(), vec![25, 1]);

    favorites.toggle(4);

    let raw = store.get(FAVORITES_KEY).unwrap().unwrap();
    let persisted: Vec<u32> = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted, vec![25, 1, 4]);
  }

  #[test]
  fn corrupt_entry_reads_as_empty() {
    let store = Arc::new(MemoryStore::new());
    store.set(FAVORITES_KEY, "not a json array").unwrap();

    let favorites = favorites_over(store);
    assert!(favorites.ids().is_empty());
  }

  #[test]
  fn insertion_order_is_preserved() {
    let favorites = favorites_over(Arc::new(MemoryStore::new()));
    favorites.toggle(6);
    favorites.toggle(3);
    favorites.toggle(9);

    assert_eq!(favorites.ids(), vec![6, 3, 9]);
  }
}
