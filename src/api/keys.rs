//! Cache key construction for API requests.

use url::Url;

/// Key prefixes the expiry sweep recognizes as cache-owned. Everything else
/// in the store (notably the favorites set) is off limits to the sweep.
pub const CACHE_PREFIXES: &[&str] = &["pokemon_", "evolution_chain_"];

/// Deterministic cache key for each read operation.
///
/// Distinct parameter tuples map to distinct keys. The `pokemon_species_`
/// prefix keeps the species id space apart from the entity id space; that
/// separation is deliberate, not a formatting accident.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestKey {
  /// One page of the entity listing.
  List { limit: u32, offset: u32 },
  /// A single entity by numeric id or exact name.
  Pokemon { id_or_name: String },
  /// Species metadata by numeric id or exact name.
  Species { id_or_name: String },
  /// An evolution chain by its extracted identifier.
  EvolutionChain { id: String },
}

impl RequestKey {
  pub fn cache_key(&self) -> String {
    match self {
      Self::List { limit, offset } => format!("pokemon_list_{}_{}", limit, offset),
      Self::Pokemon { id_or_name } => format!("pokemon_{}", id_or_name),
      Self::Species { id_or_name } => format!("pokemon_species_{}", id_or_name),
      Self::EvolutionChain { id } => format!("evolution_chain_{}", id),
    }
  }
}

/// Extract the stable identifier from an evolution chain URL: the final
/// non-empty path segment.
pub fn evolution_chain_id(url: &str) -> Option<String> {
  let parsed = Url::parse(url).ok()?;
  parsed
    .path_segments()?
    .filter(|segment| !segment.is_empty())
    .next_back()
    .map(String::from)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn distinct_requests_get_distinct_keys() {
    let keys = [
      RequestKey::List {
        limit: 20,
        offset: 0,
      }
      .cache_key(),
      RequestKey::List {
        limit: 20,
        offset: 20,
      }
      .cache_key(),
      RequestKey::Pokemon {
        id_or_name: "25".to_string(),
      }
      .cache_key(),
      RequestKey::Species {
        id_or_name: "25".to_string(),
      }
      .cache_key(),
      RequestKey::EvolutionChain {
        id: "10".to_string(),
      }
      .cache_key(),
    ];

    for (i, a) in keys.iter().enumerate() {
      for b in keys.iter().skip(i + 1) {
        assert_ne!(a, b);
      }
    }
  }

  #[test]
  fn species_and_entity_id_spaces_do_not_collide() {
    let entity = RequestKey::Pokemon {
      id_or_name: "25".to_string(),
    };
    let species = RequestKey::Species {
      id_or_name: "25".to_string(),
    };

    assert_eq!(entity.cache_key(), "pokemon_25");
    assert_eq!(species.cache_key(), "pokemon_species_25");
  }

  #[test]
  fn every_key_is_under_a_recognized_prefix() {
    let keys = [
      RequestKey::List {
        limit: 151,
        offset: 0,
      }
      .cache_key(),
      RequestKey::Pokemon {
        id_or_name: "pikachu".to_string(),
      }
      .cache_key(),
      RequestKey::Species {
        id_or_name: "pikachu".to_string(),
      }
      .cache_key(),
      RequestKey::EvolutionChain {
        id: "10".to_string(),
      }
      .cache_key(),
    ];

    for key in keys {
      assert!(
        CACHE_PREFIXES.iter().any(|p| key.starts_with(p)),
        "{} has no recognized prefix",
        key
      );
    }
  }

  #[test]
  fn chain_id_is_last_nonempty_segment() {
    assert_eq!(
      evolution_chain_id("https://pokeapi.co/api/v2/evolution-chain/10/").as_deref(),
      Some("10")
    );
    assert_eq!(
      evolution_chain_id("https://pokeapi.co/api/v2/evolution-chain/10").as_deref(),
      Some("10")
    );
  }

  #[test]
  fn unparsable_chain_url_yields_none() {
    assert_eq!(evolution_chain_id("not a url"), None);
  }
}
