//! HTTP client for the PokeAPI read endpoints.

use reqwest::Client;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{EvolutionChain, Pokemon, PokemonList, PokemonSpecies};

/// Base endpoint, fixed at build time.
pub const API_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Thin client over the remote read-only API.
///
/// Four read operations, no writes. Failures of any kind (transport, non-2xx
/// status, unexpected body shape) normalize into [`ApiError::FetchFailed`]
/// tagged with the operation and identifier.
#[derive(Debug, Clone)]
pub struct PokeClient {
  http: Client,
  base_url: String,
}

impl Default for PokeClient {
  fn default() -> Self {
    Self::new()
  }
}

impl PokeClient {
  pub fn new() -> Self {
    Self::with_base_url(API_BASE_URL)
  }

  /// Useful for testing against a local server.
  pub fn with_base_url(base_url: impl Into<String>) -> Self {
    Self {
      http: Client::new(),
      base_url: base_url.into(),
    }
  }

  /// Fetch one page of the entity listing.
  pub async fn list(&self, limit: u32, offset: u32) -> Result<PokemonList, ApiError> {
    let url = format!(
      "{}/pokemon?limit={}&offset={}",
      self.base_url, limit, offset
    );
    let identifier = format!("limit {} offset {}", limit, offset);
    self.get_json(&url, "pokemon list", &identifier).await
  }

  /// Fetch a single entity by numeric id or exact name.
  pub async fn pokemon(&self, id_or_name: &str) -> Result<Pokemon, ApiError> {
    let url = format!("{}/pokemon/{}", self.base_url, id_or_name);
    self.get_json(&url, "pokemon", id_or_name).await
  }

  /// Fetch species metadata by numeric id or exact name.
  pub async fn species(&self, id_or_name: &str) -> Result<PokemonSpecies, ApiError> {
    let url = format!("{}/pokemon-species/{}", self.base_url, id_or_name);
    self.get_json(&url, "pokemon species", id_or_name).await
  }

  /// Fetch an evolution chain by the opaque URL the species points at. The
  /// URL is supplied by the API, never constructed locally.
  pub async fn evolution_chain(&self, url: &str) -> Result<EvolutionChain, ApiError> {
    self.get_json(url, "evolution chain", url).await
  }

  async fn get_json<T: DeserializeOwned>(
    &self,
    url: &str,
    operation: &'static str,
    identifier: &str,
  ) -> Result<T, ApiError> {
    let response = self
      .http
      .get(url)
      .send()
      .await
      .map_err(|e| ApiError::fetch_failed(operation, identifier, e))?
      .error_for_status()
      .map_err(|e| ApiError::fetch_failed(operation, identifier, e))?;

    response
      .json::<T>()
      .await
      .map_err(|e| ApiError::fetch_failed(operation, identifier, e))
  }
}
