//! Cached client: cache-through reads, evolution assembly, name search.

use futures::future::try_join_all;
use std::sync::Arc;

use crate::cache::{ExpiringCache, Store};

use super::client::PokeClient;
use super::error::ApiError;
use super::keys::{evolution_chain_id, RequestKey, CACHE_PREFIXES};
use super::types::{ChainLink, EvolutionChain, Pokemon, PokemonList, PokemonSpecies};

/// How many entries the name search spans: the original 151.
pub const SEARCH_UNIVERSE: u32 = 151;

/// Client with transparent caching.
///
/// Wraps [`PokeClient`] with the same read API. Every operation checks the
/// cache under its deterministic key, falls through to the network on a
/// miss, and stores the response best-effort on the way out. Two concurrent
/// callers may both miss a cold key and both fetch; the last write wins.
#[derive(Clone)]
pub struct CachedClient {
  inner: PokeClient,
  cache: ExpiringCache,
}

impl CachedClient {
  /// Create a cached client over the given store.
  pub fn new(store: Arc<dyn Store>) -> Self {
    Self::with_client(PokeClient::new(), store)
  }

  /// Useful for testing with a mock server.
  pub fn with_client(inner: PokeClient, store: Arc<dyn Store>) -> Self {
    Self {
      inner,
      cache: ExpiringCache::new(store, CACHE_PREFIXES),
    }
  }

  /// Fetch one page of the entity listing.
  pub async fn list(&self, limit: u32, offset: u32) -> Result<PokemonList, ApiError> {
    let key = RequestKey::List { limit, offset }.cache_key();
    if let Some(page) = self.cache.get(&key) {
      return Ok(page);
    }

    let page = self.inner.list(limit, offset).await?;
    self.cache.put(&key, &page);
    Ok(page)
  }

  /// Fetch a single entity by numeric id or exact name.
  pub async fn pokemon(&self, id_or_name: &str) -> Result<Pokemon, ApiError> {
    let key = RequestKey::Pokemon {
      id_or_name: id_or_name.to_string(),
    }
    .cache_key();
    if let Some(pokemon) = self.cache.get(&key) {
      return Ok(pokemon);
    }

    let pokemon = self.inner.pokemon(id_or_name).await?;
    self.cache.put(&key, &pokemon);
    Ok(pokemon)
  }

  /// Fetch species metadata by numeric id or exact name.
  pub async fn species(&self, id_or_name: &str) -> Result<PokemonSpecies, ApiError> {
    let key = RequestKey::Species {
      id_or_name: id_or_name.to_string(),
    }
    .cache_key();
    if let Some(species) = self.cache.get(&key) {
      return Ok(species);
    }

    let species = self.inner.species(id_or_name).await?;
    self.cache.put(&key, &species);
    Ok(species)
  }

  /// Fetch an evolution chain by the opaque URL a species points at.
  pub async fn evolution_chain(&self, url: &str) -> Result<EvolutionChain, ApiError> {
    // The final path segment is the stable identifier for caching; a URL
    // that somehow has none still gets a deterministic key.
    let id = evolution_chain_id(url).unwrap_or_else(|| url.to_string());
    let key = RequestKey::EvolutionChain { id }.cache_key();
    if let Some(chain) = self.cache.get(&key) {
      return Ok(chain);
    }

    let chain = self.inner.evolution_chain(url).await?;
    self.cache.put(&key, &chain);
    Ok(chain)
  }

  /// Resolve a chain into full entity data, in traversal order.
  ///
  /// Members resolve concurrently with fail-fast join semantics: one failing
  /// member fails the whole line, and no partial line is returned.
  pub async fn evolution_line(&self, chain: &EvolutionChain) -> Result<Vec<Pokemon>, ApiError> {
    let names = flatten_chain(&chain.chain);

    let fetches = names.iter().map(|name| {
      let name = name.clone();
      async move {
        self
          .pokemon(&name)
          .await
          .map_err(|e| ApiError::AssemblyFailed {
            name,
            source: Box::new(e),
          })
      }
    });

    let mut line = try_join_all(fetches).await?;

    // Resolution may complete in any order; restore the traversal order by
    // each entity's position in the flattened name sequence.
    line.sort_by_key(|p| {
      names
        .iter()
        .position(|name| name == &p.name)
        .unwrap_or(usize::MAX)
    });

    Ok(line)
  }

  /// Case-insensitive substring search over the bounded universe.
  ///
  /// An empty query or an empty match set yields an empty result, not an
  /// error. The minimum-length rule (two characters) belongs to the caller.
  pub async fn search(&self, query: &str) -> Result<Vec<Pokemon>, ApiError> {
    if query.is_empty() {
      return Ok(Vec::new());
    }

    let universe = self.list(SEARCH_UNIVERSE, 0).await?;
    let needle = query.to_lowercase();

    let matches = universe
      .results
      .iter()
      .filter(|entry| entry.name.to_lowercase().contains(&needle));

    // Matches resolve concurrently and come back in listing order.
    try_join_all(matches.map(|entry| self.pokemon(&entry.name))).await
  }
}

/// Flatten an evolution tree into unique species names: pre-order, first
/// occurrence wins, any depth.
pub fn flatten_chain(root: &ChainLink) -> Vec<String> {
  fn walk(link: &ChainLink, out: &mut Vec<String>) {
    if !out.iter().any(|name| name == &link.species.name) {
      out.push(link.species.name.clone());
    }
    for next in &link.evolves_to {
      walk(next, out);
    }
  }

  let mut names = Vec::new();
  walk(root, &mut names);
  names
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::types::NamedResource;
  use crate::cache::MemoryStore;
  use wiremock::matchers::{method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn link(name: &str, evolves_to: Vec<ChainLink>) -> ChainLink {
    ChainLink {
      species: NamedResource {
        name: name.to_string(),
        url: format!("https://pokeapi.co/api/v2/pokemon-species/{}/", name),
      },
      evolves_to,
    }
  }

  fn pokemon_body(id: u32, name: &str) -> serde_json::Value {
    serde_json::json!({
      "id": id,
      "name": name,
      "height": 10,
      "weight": 100,
      "types": [
        { "slot": 1, "type": { "name": "normal", "url": "" } }
      ],
      "stats": [
        { "base_stat": 50, "stat": { "name": "hp", "url": "" } },
        { "base_stat": 50, "stat": { "name": "attack", "url": "" } },
        { "base_stat": 50, "stat": { "name": "defense", "url": "" } },
        { "base_stat": 50, "stat": { "name": "special-attack", "url": "" } },
        { "base_stat": 50, "stat": { "name": "special-defense", "url": "" } },
        { "base_stat": 50, "stat": { "name": "speed", "url": "" } }
      ]
    })
  }

  async fn mock_pokemon(server: &MockServer, id: u32, name: &str) {
    Mock::given(method("GET"))
      .and(path(format!("/pokemon/{}", name)))
      .respond_with(ResponseTemplate::new(200).set_body_json(pokemon_body(id, name)))
      .mount(server)
      .await;
  }

  fn client_over(server: &MockServer, store: Arc<dyn Store>) -> CachedClient {
    CachedClient::with_client(PokeClient::with_base_url(server.uri()), store)
  }

  // ── flattening ──────────────────────────────────────────────────────

  #[test]
  fn flatten_is_preorder() {
    let chain = link(
      "bulbasaur",
      vec![link("ivysaur", vec![link("venusaur", vec![])])],
    );

    assert_eq!(
      flatten_chain(&chain),
      vec!["bulbasaur", "ivysaur", "venusaur"]
    );
  }

  #[test]
  fn flatten_visits_branches_in_order() {
    // Eevee-style fan-out: every branch is a direct child of the root.
    let chain = link(
      "eevee",
      vec![
        link("vaporeon", vec![]),
        link("jolteon", vec![]),
        link("flareon", vec![]),
      ],
    );

    assert_eq!(
      flatten_chain(&chain),
      vec!["eevee", "vaporeon", "jolteon", "flareon"]
    );
  }

  #[test]
  fn flatten_deduplicates_preserving_first_occurrence() {
    // Two branches converging on the same species: the second sighting is
    // not re-emitted.
    let chain = link(
      "base",
      vec![
        link("left", vec![link("shared", vec![])]),
        link("right", vec![link("shared", vec![])]),
      ],
    );

    assert_eq!(flatten_chain(&chain), vec!["base", "left", "shared", "right"]);
  }

  #[test]
  fn flatten_does_not_assume_three_stages() {
    let chain = link(
      "one",
      vec![link(
        "two",
        vec![link(
          "three",
          vec![link("four", vec![link("five", vec![])])],
        )],
      )],
    );

    assert_eq!(
      flatten_chain(&chain),
      vec!["one", "two", "three", "four", "five"]
    );
  }

  // ── cache-through reads ─────────────────────────────────────────────

  #[tokio::test]
  async fn cold_fetch_hits_network_once_then_serves_from_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/pokemon/25"))
      .respond_with(ResponseTemplate::new(200).set_body_json(pokemon_body(25, "pikachu")))
      .expect(1)
      .mount(&server)
      .await;

    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let client = client_over(&server, store.clone());

    let first = client.pokemon("25").await.expect("cold fetch");
    assert_eq!(first.name, "pikachu");

    // One remote call, one cache write.
    assert!(store.get("pokemon_25").unwrap().is_some());

    // Second call is served entirely from the cache; expect(1) above fails
    // the test if another request reaches the server.
    let second = client.pokemon("25").await.expect("warm fetch");
    assert_eq!(second.id, 25);
  }

  #[tokio::test]
  async fn list_pages_are_cached_per_parameter_tuple() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/pokemon"))
      .and(query_param("offset", "0"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "count": 2,
        "next": null,
        "previous": null,
        "results": [
          { "name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/" }
        ]
      })))
      .expect(1)
      .mount(&server)
      .await;

    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let client = client_over(&server, store.clone());

    client.list(20, 0).await.expect("cold list");
    client.list(20, 0).await.expect("warm list");

    assert!(store.get("pokemon_list_20_0").unwrap().is_some());
  }

  #[tokio::test]
  async fn evolution_chain_is_cached_under_its_extracted_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/evolution-chain/10/"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "id": 10,
        "chain": { "species": { "name": "caterpie", "url": "" }, "evolves_to": [] }
      })))
      .expect(1)
      .mount(&server)
      .await;

    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let client = client_over(&server, store.clone());
    let url = format!("{}/evolution-chain/10/", server.uri());

    client.evolution_chain(&url).await.expect("cold chain");
    client.evolution_chain(&url).await.expect("warm chain");

    assert!(store.get("evolution_chain_10").unwrap().is_some());
  }

  #[tokio::test]
  async fn fetch_errors_propagate_and_nothing_is_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/pokemon/missingno"))
      .respond_with(ResponseTemplate::new(404))
      .mount(&server)
      .await;

    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let client = client_over(&server, store.clone());

    assert!(client.pokemon("missingno").await.is_err());
    assert!(store.get("pokemon_missingno").unwrap().is_none());
  }

  // ── evolution assembly ──────────────────────────────────────────────

  #[tokio::test]
  async fn evolution_line_resolves_members_in_traversal_order() {
    let server = MockServer::start().await;
    mock_pokemon(&server, 1, "bulbasaur").await;
    mock_pokemon(&server, 2, "ivysaur").await;
    mock_pokemon(&server, 3, "venusaur").await;

    let client = client_over(&server, Arc::new(MemoryStore::new()));
    let chain = EvolutionChain {
      id: 1,
      chain: link(
        "bulbasaur",
        vec![link("ivysaur", vec![link("venusaur", vec![])])],
      ),
    };

    let line = client.evolution_line(&chain).await.expect("line");
    let names: Vec<&str> = line.iter().map(|p| p.name.as_str()).collect();

    assert_eq!(names, vec!["bulbasaur", "ivysaur", "venusaur"]);
  }

  #[tokio::test]
  async fn one_failing_member_fails_the_whole_line() {
    let server = MockServer::start().await;
    mock_pokemon(&server, 1, "bulbasaur").await;
    // ivysaur is not mounted: the member fetch 404s.

    let client = client_over(&server, Arc::new(MemoryStore::new()));
    let chain = EvolutionChain {
      id: 1,
      chain: link("bulbasaur", vec![link("ivysaur", vec![])]),
    };

    let err = client.evolution_line(&chain).await.unwrap_err();

    match err {
      ApiError::AssemblyFailed { name, .. } => assert_eq!(name, "ivysaur"),
      other => panic!("expected AssemblyFailed, got {:?}", other),
    }
  }

  // ── search ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn search_filters_universe_and_keeps_listing_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/pokemon"))
      .and(query_param("limit", "151"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "count": 151,
        "next": null,
        "previous": null,
        "results": [
          { "name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/" },
          { "name": "pidgey", "url": "https://pokeapi.co/api/v2/pokemon/16/" },
          { "name": "pikachu", "url": "https://pokeapi.co/api/v2/pokemon/25/" }
        ]
      })))
      .mount(&server)
      .await;
    mock_pokemon(&server, 16, "pidgey").await;
    mock_pokemon(&server, 25, "pikachu").await;

    let client = client_over(&server, Arc::new(MemoryStore::new()));

    // Case-insensitive substring match, results in listing order.
    let hits = client.search("PI").await.expect("search");
    let names: Vec<&str> = hits.iter().map(|p| p.name.as_str()).collect();

    assert_eq!(names, vec!["pidgey", "pikachu"]);
  }

  #[tokio::test]
  async fn search_with_no_matches_is_empty_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/pokemon"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "count": 151,
        "next": null,
        "previous": null,
        "results": [
          { "name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/" }
        ]
      })))
      .mount(&server)
      .await;

    let client = client_over(&server, Arc::new(MemoryStore::new()));

    assert!(client.search("zzz").await.expect("search").is_empty());
  }

  #[tokio::test]
  async fn empty_query_short_circuits_without_network() {
    let server = MockServer::start().await;
    // No mocks mounted: any request would fail the fetch.

    let client = client_over(&server, Arc::new(MemoryStore::new()));

    assert!(client.search("").await.expect("search").is_empty());
  }
}
