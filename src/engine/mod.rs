/// Watchlist engine
///
/// Owns the user's saved selections, enforces uniqueness, persists through
/// the configured store, and derives genre-based recommendations against
/// the catalog. The catalog and store are passed in at construction, never
/// reached through shared globals, so tests substitute in-memory fakes.
use crate::{
    catalog::CatalogProvider,
    error::AppResult,
    models::{AddOutcome, MediaKind, MediaRecord, Recommendations, Watchlist, WatchlistEntry},
    store::WatchlistStore,
};
use std::{collections::BTreeSet, sync::Arc};
use tokio::sync::RwLock;

pub struct WatchlistEngine {
    catalog: Arc<dyn CatalogProvider>,
    store: Arc<dyn WatchlistStore>,
    state: RwLock<Watchlist>,
}

impl WatchlistEngine {
    pub fn new(catalog: Arc<dyn CatalogProvider>, store: Arc<dyn WatchlistStore>) -> Self {
        Self {
            catalog,
            store,
            state: RwLock::new(Watchlist::new()),
        }
    }

    /// Loads persisted state at startup.
    ///
    /// Unreachable storage degrades to an empty watchlist with a warning;
    /// startup never fails on a read.
    pub async fn restore(&self) {
        match self.store.restore().await {
            Ok(watchlist) => {
                tracing::info!(entries = watchlist.len(), "Watchlist restored");
                *self.state.write().await = watchlist;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not restore watchlist, starting empty");
                *self.state.write().await = Watchlist::new();
            }
        }
    }

    /// Appends an unwatched entry unless an unwatched `(kind, title)`
    /// duplicate exists, then persists.
    ///
    /// Holds the write lock across mutate+persist so an overlapping UI
    /// action cannot interleave. On persist failure the entry is rolled
    /// back and the error surfaces: an add that would not survive a restart
    /// must not look successful.
    pub async fn add(&self, kind: MediaKind, title: &str) -> AppResult<AddOutcome> {
        let mut watchlist = self.state.write().await;

        if watchlist.contains_unwatched(kind, title) {
            tracing::info!(kind = %kind, title = %title, "Already on the watchlist");
            return Ok(AddOutcome::AlreadyPresent);
        }

        let previous = watchlist.clone();
        watchlist.push(WatchlistEntry::unwatched(kind, title));

        if let Err(e) = self.store.persist(&watchlist).await {
            *watchlist = previous;
            return Err(e);
        }

        tracing::info!(kind = %kind, title = %title, "Added to watchlist");
        Ok(AddOutcome::Added)
    }

    /// Current in-memory state, reflecting the most recent successful load
    /// or mutation.
    pub async fn list(&self) -> Watchlist {
        self.state.read().await.clone()
    }

    /// Marks an unwatched entry as watched.
    ///
    /// The entry stays in `list()` but stops contributing to the
    /// recommendation genre union, and its `(kind, title)` slot is free for
    /// a future unwatched add. Returns whether anything changed.
    pub async fn mark_watched(&self, kind: MediaKind, title: &str) -> AppResult<bool> {
        self.mutate(|watchlist| watchlist.mark_watched(kind, title))
            .await
    }

    /// Removes an entry entirely. Returns whether anything was removed.
    pub async fn remove(&self, kind: MediaKind, title: &str) -> AppResult<bool> {
        self.mutate(|watchlist| watchlist.remove(kind, title)).await
    }

    async fn mutate<F>(&self, apply: F) -> AppResult<bool>
    where
        F: FnOnce(&mut Watchlist) -> bool,
    {
        let mut watchlist = self.state.write().await;
        let previous = watchlist.clone();

        if !apply(&mut watchlist) {
            return Ok(false);
        }

        if let Err(e) = self.store.persist(&watchlist).await {
            *watchlist = previous;
            return Err(e);
        }

        Ok(true)
    }

    /// Computes genre-based recommendations.
    ///
    /// Unions the genres of every unwatched entry (resolved against the
    /// catalog by exact title; an unresolvable title contributes nothing),
    /// then returns every catalog record across both kinds sharing at least
    /// one genre and not already watchlisted by title for its kind. No
    /// ranking or limiting. An empty genre union reports
    /// `InsufficientData` instead of an empty match set.
    pub async fn recommend(&self) -> AppResult<Recommendations> {
        // Clone out so no lock is held across network calls
        let watchlist = self.list().await;

        let mut genres: BTreeSet<String> = BTreeSet::new();
        for entry in watchlist.unwatched() {
            match self.catalog.find_by_title(entry.kind, &entry.title).await? {
                Some(record) => genres.extend(record.genres),
                None => {
                    tracing::debug!(
                        kind = %entry.kind,
                        title = %entry.title,
                        "Watchlisted title not found in catalog"
                    );
                }
            }
        }

        if genres.is_empty() {
            tracing::info!("No genres to recommend from");
            return Ok(Recommendations::InsufficientData);
        }

        let mut matches = Vec::new();
        for kind in MediaKind::ALL {
            for record in self.catalog.fetch_all(kind).await? {
                if record.genres.iter().any(|g| genres.contains(g))
                    && !watchlist.contains_title(kind, &record.title)
                {
                    matches.push(record);
                }
            }
        }

        tracing::info!(
            genres = genres.len(),
            matches = matches.len(),
            "Recommendations computed"
        );

        Ok(Recommendations::Matches(matches))
    }

    /// Single top pick: the highest-rated record in the full match set,
    /// first one winning ties. `None` when there is insufficient data or no
    /// match.
    pub async fn recommend_best(&self) -> AppResult<Option<MediaRecord>> {
        let matches = match self.recommend().await? {
            Recommendations::InsufficientData => return Ok(None),
            Recommendations::Matches(matches) => matches,
        };

        let mut best: Option<MediaRecord> = None;
        for record in matches {
            match &best {
                Some(current) if record.rating <= current.rating => {}
                _ => best = Some(record),
            }
        }

        Ok(best)
    }
}
