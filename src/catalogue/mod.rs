//! Descriptor catalogue: discipline-scoped RIZA rubric rows.
//!
//! The matcher only consumes the read side ([`DescriptorCatalogue`]). Rows are
//! loaded fresh for every request; nothing here caches across calls.

pub mod sqlite;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use sqlite::SqliteCatalogue;
pub use types::Descriptor;

#[cfg(any(test, feature = "mock"))]
pub use mock::MemoryCatalogue;

use async_trait::async_trait;

use crate::storage::StoreError;

#[async_trait]
/// Read access to descriptor rows.
pub trait DescriptorCatalogue: Send + Sync {
    /// Descriptors of `discipline` in storage iteration order. Unknown or empty
    /// disciplines yield an empty list.
    async fn descriptors_for(&self, discipline: &str) -> Result<Vec<Descriptor>, StoreError>;

    /// Distinct discipline names.
    async fn disciplines(&self) -> Result<Vec<String>, StoreError>;

    /// Distinct descriptor dimensions across all disciplines.
    async fn dimensions(&self) -> Result<Vec<String>, StoreError>;
}
