//! Serde types matching PokeAPI responses.
//!
//! The cache persists responses verbatim, so the same types serve as both
//! wire and domain shapes; everything here derives `Serialize` and
//! `Deserialize`.

use serde::{Deserialize, Serialize};

/// A name plus the canonical URL of the resource it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
  pub name: String,
  pub url: String,
}

/// An unnamed resource reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
  pub url: String,
}

/// One page of the entity listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonList {
  pub count: u32,
  /// URL of the next page, if one exists.
  pub next: Option<String>,
  pub previous: Option<String>,
  pub results: Vec<NamedResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSlot {
  pub slot: u8,
  #[serde(rename = "type")]
  pub kind: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatSlot {
  pub base_stat: u32,
  pub stat: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitySlot {
  pub ability: NamedResource,
  #[serde(default)]
  pub is_hidden: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfficialArtwork {
  pub front_default: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OtherSprites {
  #[serde(rename = "official-artwork", default)]
  pub official_artwork: OfficialArtwork,
}

/// Sprite URLs; any variant may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sprites {
  pub front_default: Option<String>,
  pub front_shiny: Option<String>,
  #[serde(default)]
  pub other: OtherSprites,
}

/// Full entity data for one Pokémon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pokemon {
  pub id: u32,
  pub name: String,
  /// Height in decimetres.
  pub height: u32,
  /// Weight in hectograms.
  pub weight: u32,
  pub types: Vec<TypeSlot>,
  pub stats: Vec<StatSlot>,
  #[serde(default)]
  pub sprites: Sprites,
  #[serde(default)]
  pub abilities: Vec<AbilitySlot>,
}

impl Pokemon {
  /// The first (primary) type, used for display coloring.
  pub fn primary_type(&self) -> Option<&str> {
    self.types.first().map(|t| t.kind.name.as_str())
  }

  /// Official artwork URL, falling back to the default front sprite.
  #[allow(dead_code)]
  pub fn artwork(&self) -> Option<&str> {
    self
      .sprites
      .other
      .official_artwork
      .front_default
      .as_deref()
      .or(self.sprites.front_default.as_deref())
  }

  pub fn height_m(&self) -> f64 {
    f64::from(self.height) / 10.0
  }

  pub fn weight_kg(&self) -> f64 {
    f64::from(self.weight) / 10.0
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlavorTextEntry {
  pub flavor_text: String,
  pub language: NamedResource,
}

/// Species metadata for one Pokémon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonSpecies {
  pub id: u32,
  pub name: String,
  pub generation: NamedResource,
  #[serde(default)]
  pub flavor_text_entries: Vec<FlavorTextEntry>,
  /// Reference to this species' evolution chain, if it has one.
  pub evolution_chain: Option<ResourceRef>,
}

impl PokemonSpecies {
  /// First English flavor text, with the sprite-era control characters
  /// collapsed to spaces.
  pub fn english_flavor_text(&self) -> Option<String> {
    self
      .flavor_text_entries
      .iter()
      .find(|entry| entry.language.name == "en")
      .map(|entry| {
        entry
          .flavor_text
          .chars()
          .map(|c| if c == '\u{c}' || c == '\n' { ' ' } else { c })
          .collect()
      })
  }

  /// Generation tag formatted for display (e.g. "GENERATION I").
  pub fn generation_label(&self) -> String {
    self.generation.name.replace('-', " ").to_uppercase()
  }
}

/// An evolution chain: a tree of species rooted at the base form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionChain {
  pub id: u32,
  pub chain: ChainLink,
}

/// One node of the evolution tree. Depth is data-driven; nothing here
/// assumes the usual three stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainLink {
  pub species: NamedResource,
  #[serde(default)]
  pub evolves_to: Vec<ChainLink>,
}

#[cfg(test)]
mod tests {
  use super::*;

  const PIKACHU: &str = r#"{
    "id": 25,
    "name": "pikachu",
    "height": 4,
    "weight": 60,
    "types": [
      { "slot": 1, "type": { "name": "electric", "url": "https://pokeapi.co/api/v2/type/13/" } }
    ],
    "stats": [
      { "base_stat": 35, "stat": { "name": "hp", "url": "https://pokeapi.co/api/v2/stat/1/" } },
      { "base_stat": 55, "stat": { "name": "attack", "url": "https://pokeapi.co/api/v2/stat/2/" } },
      { "base_stat": 40, "stat": { "name": "defense", "url": "https://pokeapi.co/api/v2/stat/3/" } },
      { "base_stat": 50, "stat": { "name": "special-attack", "url": "https://pokeapi.co/api/v2/stat/4/" } },
      { "base_stat": 50, "stat": { "name": "special-defense", "url": "https://pokeapi.co/api/v2/stat/5/" } },
      { "base_stat": 90, "stat": { "name": "speed", "url": "https://pokeapi.co/api/v2/stat/6/" } }
    ],
    "sprites": {
      "front_default": "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/25.png",
      "front_shiny": null,
      "other": {
        "official-artwork": {
          "front_default": "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/25.png"
        }
      }
    },
    "abilities": [
      { "ability": { "name": "static", "url": "https://pokeapi.co/api/v2/ability/9/" }, "is_hidden": false }
    ]
  }"#;

  #[test]
  fn parse_pokemon() {
    let pokemon: Pokemon = serde_json::from_str(PIKACHU).expect("parse pikachu");

    assert_eq!(pokemon.id, 25);
    assert_eq!(pokemon.name, "pikachu");
    assert_eq!(pokemon.primary_type(), Some("electric"));
    assert_eq!(pokemon.stats.len(), 6);
    assert_eq!(pokemon.stats[5].base_stat, 90);
    assert!((pokemon.height_m() - 0.4).abs() < 1e-9);
    assert!((pokemon.weight_kg() - 6.0).abs() < 1e-9);
  }

  #[test]
  fn artwork_prefers_official_then_falls_back() {
    let mut pokemon: Pokemon = serde_json::from_str(PIKACHU).expect("parse pikachu");
    assert!(pokemon.artwork().unwrap().contains("official-artwork"));

    pokemon.sprites.other.official_artwork.front_default = None;
    assert!(pokemon.artwork().unwrap().ends_with("25.png"));

    pokemon.sprites.front_default = None;
    assert_eq!(pokemon.artwork(), None);
  }

  #[test]
  fn pokemon_survives_cache_round_trip() {
    let pokemon: Pokemon = serde_json::from_str(PIKACHU).expect("parse pikachu");
    let json = serde_json::to_string(&pokemon).expect("serialize");
    let back: Pokemon = serde_json::from_str(&json).expect("reparse");

    assert_eq!(back.id, pokemon.id);
    assert_eq!(back.name, pokemon.name);
    assert_eq!(back.primary_type(), pokemon.primary_type());
  }

  #[test]
  fn english_flavor_text_is_selected_and_cleaned() {
    let species = PokemonSpecies {
      id: 25,
      name: "pikachu".to_string(),
      generation: NamedResource {
        name: "generation-i".to_string(),
        url: String::new(),
      },
      flavor_text_entries: vec![
        FlavorTextEntry {
          flavor_text: "Quand plusieurs de ces Pokémon...".to_string(),
          language: NamedResource {
            name: "fr".to_string(),
            url: String::new(),
          },
        },
        FlavorTextEntry {
          flavor_text: "When several of\u{c}these POKéMON\ngather".to_string(),
          language: NamedResource {
            name: "en".to_string(),
            url: String::new(),
          },
        },
      ],
      evolution_chain: None,
    };

    assert_eq!(
      species.english_flavor_text().as_deref(),
      Some("When several of these POKéMON gather")
    );
    assert_eq!(species.generation_label(), "GENERATION I");
  }

  #[test]
  fn missing_english_flavor_text_is_none() {
    let species = PokemonSpecies {
      id: 1,
      name: "bulbasaur".to_string(),
      generation: NamedResource {
        name: "generation-i".to_string(),
        url: String::new(),
      },
      flavor_text_entries: Vec::new(),
      evolution_chain: None,
    };

    assert_eq!(species.english_flavor_text(), None);
  }

  #[test]
  fn chain_link_parses_recursively_with_missing_children() {
    let chain: ChainLink = serde_json::from_str(
      r#"{
        "species": { "name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon-species/1/" },
        "evolves_to": [
          {
            "species": { "name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon-species/2/" }
          }
        ]
      }"#,
    )
    .expect("parse chain");

    assert_eq!(chain.species.name, "bulbasaur");
    assert_eq!(chain.evolves_to[0].species.name, "ivysaur");
    assert!(chain.evolves_to[0].evolves_to.is_empty());
  }
}
