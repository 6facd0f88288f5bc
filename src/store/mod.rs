/// Watchlist persistence
///
/// Two observed storage strategies (flat text files, document-style
/// database) live behind one trait so either backend can be swapped in
/// without touching engine logic.
use crate::{error::AppResult, models::Watchlist};

pub mod flat_file;
pub mod sqlite;

pub use flat_file::FlatFileStore;
pub use sqlite::SqliteStore;

/// Trait for watchlist persistence backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WatchlistStore: Send + Sync {
    /// Reads durable storage into memory. Absence of any persisted state is
    /// not an error and yields an empty watchlist.
    async fn restore(&self) -> AppResult<Watchlist>;

    /// Writes the entire watchlist, replacing prior content. A reader never
    /// observes a partially written list within one backend write.
    async fn persist(&self, watchlist: &Watchlist) -> AppResult<()>;
}
