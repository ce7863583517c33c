use thiserror::Error;

use crate::storage::StoreError;

/// Unexpected matching failures. Assisted-ranking problems are never surfaced
/// here; they trigger the lexical fallback instead.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("failed to load descriptors: {0}")]
    Catalogue(#[from] StoreError),
}
