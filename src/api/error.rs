//! Error taxonomy for the fetch layer.

use thiserror::Error;

/// Errors surfaced by the remote fetch client and the evolution assembler.
///
/// Cache failures never appear here: a failed cache write degrades to "not
/// cached" and a corrupt cache read degrades to a miss, both observed
/// through logs only.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Transport failure, non-2xx status, or a body that did not match the
  /// expected shape.
  #[error("failed to fetch {operation} `{identifier}`")]
  FetchFailed {
    operation: &'static str,
    identifier: String,
    #[source]
    source: reqwest::Error,
  },

  /// A member fetch failed while resolving an evolution chain. The whole
  /// chain fails; no partial result is produced.
  #[error("failed to resolve evolution chain member `{name}`")]
  AssemblyFailed {
    name: String,
    #[source]
    source: Box<ApiError>,
  },
}

impl ApiError {
  pub(crate) fn fetch_failed(
    operation: &'static str,
    identifier: &str,
    source: reqwest::Error,
  ) -> Self {
    Self::FetchFailed {
      operation,
      identifier: identifier.to_string(),
      source,
    }
  }
}
