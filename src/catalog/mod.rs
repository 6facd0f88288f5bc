/// Catalog access
///
/// Read-only gateway over the external content provider. The trait is the
/// seam the engine is written against, so tests substitute an in-memory
/// fake and no component ever reaches for a shared global client.
use crate::{
    error::AppResult,
    models::{MediaKind, MediaRecord},
};

pub mod rest;

pub use rest::RestCatalog;

/// Trait for catalog providers
///
/// Every call reflects the provider's latest state: implementations do not
/// cache unless explicitly configured to.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Retrieves the full catalog for a kind, in provider order.
    async fn fetch_all(&self, kind: MediaKind) -> AppResult<Vec<MediaRecord>>;

    /// Returns records where `query` is a case-insensitive substring of the
    /// title, of any actor name, or of any genre.
    async fn search(&self, kind: MediaKind, query: &str) -> AppResult<Vec<MediaRecord>>;

    /// Exact, case-sensitive title match against the full catalog.
    async fn find_by_title(&self, kind: MediaKind, title: &str)
        -> AppResult<Option<MediaRecord>>;
}
