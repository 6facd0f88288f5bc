/// Flat text file backend
///
/// One file per kind (`to_watch_movies.txt`, `to_watch_series.txt`). The
/// format is the durable text layout the application has always written: a
/// header line naming the kind, one `- <title>` line per entry, and a
/// literal `(empty)` placeholder when the list is empty. Watched entries
/// carry a ` [watched]` suffix so the watched flag survives a round trip.
///
/// Each file is written to a temp path and renamed into place, so a reader
/// never sees a half-written list. Movies and series remain independent
/// files, though: a crash between the two renames can leave them
/// inconsistent with each other. That is an accepted limitation of this
/// backend; the database backend commits both kinds in one transaction.
use crate::{
    error::{AppError, AppResult},
    models::{MediaKind, Watchlist, WatchlistEntry},
    store::WatchlistStore,
};
use std::path::{Path, PathBuf};

const WATCHED_SUFFIX: &str = " [watched]";

pub struct FlatFileStore {
    dir: PathBuf,
}

impl FlatFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_for(&self, kind: MediaKind) -> PathBuf {
        match kind {
            MediaKind::Movie => self.dir.join("to_watch_movies.txt"),
            MediaKind::Series => self.dir.join("to_watch_series.txt"),
        }
    }

    fn header(kind: MediaKind) -> &'static str {
        match kind {
            MediaKind::Movie => "Movies:",
            MediaKind::Series => "Series:",
        }
    }

    fn render(kind: MediaKind, entries: &[&WatchlistEntry]) -> String {
        if entries.is_empty() {
            return format!("{} (empty)\n", Self::header(kind));
        }

        let mut out = format!("{}\n", Self::header(kind));
        for entry in entries {
            if entry.watched {
                out.push_str(&format!("- {}{}\n", entry.title, WATCHED_SUFFIX));
            } else {
                out.push_str(&format!("- {}\n", entry.title));
            }
        }
        out
    }

    fn parse(kind: MediaKind, contents: &str) -> Vec<WatchlistEntry> {
        let mut entries = Vec::new();
        for line in contents.lines() {
            let Some(rest) = line.trim_end().strip_prefix("- ") else {
                // Header, placeholder, or stray line
                continue;
            };

            let (title, watched) = match rest.strip_suffix(WATCHED_SUFFIX) {
                Some(title) => (title, true),
                None => (rest, false),
            };

            entries.push(WatchlistEntry {
                title: title.to_string(),
                kind,
                watched,
            });
        }
        entries
    }

    async fn write_file(&self, path: &Path, contents: &str) -> AppResult<()> {
        let tmp = path.with_extension("txt.tmp");

        tokio::fs::write(&tmp, contents).await.map_err(|e| {
            AppError::PersistenceUnavailable(format!("writing {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, path).await.map_err(|e| {
            AppError::PersistenceUnavailable(format!("renaming into {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    async fn read_file(&self, kind: MediaKind) -> AppResult<Vec<WatchlistEntry>> {
        let path = self.file_for(kind);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Self::parse(kind, &contents)),
            // No persisted state yet: start empty
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(AppError::PersistenceUnavailable(format!(
                "reading {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[async_trait::async_trait]
impl WatchlistStore for FlatFileStore {
    async fn restore(&self) -> AppResult<Watchlist> {
        let mut entries = self.read_file(MediaKind::Movie).await?;
        entries.extend(self.read_file(MediaKind::Series).await?);

        tracing::debug!(entries = entries.len(), "Watchlist restored from flat files");

        Ok(Watchlist::from_entries(entries))
    }

    async fn persist(&self, watchlist: &Watchlist) -> AppResult<()> {
        for kind in MediaKind::ALL {
            let entries: Vec<&WatchlistEntry> = watchlist.entries_for(kind).collect();
            let contents = Self::render(kind, &entries);
            self.write_file(&self.file_for(kind), &contents).await?;
        }

        tracing::debug!(entries = watchlist.len(), "Watchlist persisted to flat files");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_watchlist() -> Watchlist {
        let mut watchlist = Watchlist::new();
        watchlist.push(WatchlistEntry::unwatched(MediaKind::Movie, "Inception"));
        watchlist.push(WatchlistEntry::unwatched(MediaKind::Series, "Dark"));
        watchlist.push(WatchlistEntry::unwatched(MediaKind::Movie, "The Matrix"));
        watchlist.mark_watched(MediaKind::Movie, "The Matrix");
        watchlist
    }

    #[tokio::test]
    async fn restore_without_files_yields_empty_watchlist() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlatFileStore::new(dir.path());

        let watchlist = store.restore().await.unwrap();
        assert!(watchlist.is_empty());
    }

    #[tokio::test]
    async fn persist_then_restore_round_trips_all_tuples() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlatFileStore::new(dir.path());
        let watchlist = sample_watchlist();

        store.persist(&watchlist).await.unwrap();
        let restored = store.restore().await.unwrap();

        // Restore groups by kind, so compare as sets of tuples
        let tuples = |w: &Watchlist| {
            let mut v: Vec<(MediaKind, String, bool)> = w
                .entries()
                .iter()
                .map(|e| (e.kind, e.title.clone(), e.watched))
                .collect();
            v.sort_by(|a, b| (a.0.as_str(), &a.1, a.2).cmp(&(b.0.as_str(), &b.1, b.2)));
            v
        };
        assert_eq!(tuples(&restored), tuples(&watchlist));
    }

    #[tokio::test]
    async fn empty_list_writes_the_placeholder_line() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlatFileStore::new(dir.path());

        store.persist(&Watchlist::new()).await.unwrap();

        let movies = std::fs::read_to_string(dir.path().join("to_watch_movies.txt")).unwrap();
        let series = std::fs::read_to_string(dir.path().join("to_watch_series.txt")).unwrap();
        assert_eq!(movies, "Movies: (empty)\n");
        assert_eq!(series, "Series: (empty)\n");
    }

    #[tokio::test]
    async fn persisted_file_uses_the_dash_line_format() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlatFileStore::new(dir.path());

        store.persist(&sample_watchlist()).await.unwrap();

        let movies = std::fs::read_to_string(dir.path().join("to_watch_movies.txt")).unwrap();
        assert_eq!(movies, "Movies:\n- Inception\n- The Matrix [watched]\n");
    }

    #[tokio::test]
    async fn parse_ignores_headers_placeholders_and_stray_lines() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("to_watch_movies.txt"),
            "Movies:\n\n- Inception\nnot an entry\n- Dune\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("to_watch_series.txt"), "Series: (empty)\n").unwrap();

        let store = FlatFileStore::new(dir.path());
        let restored = store.restore().await.unwrap();

        let titles: Vec<&str> = restored.entries().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Inception", "Dune"]);
    }

    #[tokio::test]
    async fn persist_replaces_prior_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlatFileStore::new(dir.path());

        store.persist(&sample_watchlist()).await.unwrap();

        let mut smaller = Watchlist::new();
        smaller.push(WatchlistEntry::unwatched(MediaKind::Movie, "Arrival"));
        store.persist(&smaller).await.unwrap();

        let restored = store.restore().await.unwrap();
        assert_eq!(restored, smaller);
    }

    #[tokio::test]
    async fn unwritable_directory_surfaces_persistence_unavailable() {
        let store = FlatFileStore::new("/nonexistent/watchlist/dir");

        let err = store.persist(&sample_watchlist()).await.unwrap_err();
        assert!(matches!(err, AppError::PersistenceUnavailable(_)));
    }
}
