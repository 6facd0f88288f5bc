/// SQLite document-store backend
///
/// Persists the watchlist as a `watch_entries` collection of
/// `{title, kind, watched}` rows. `persist` replaces the whole collection
/// inside one transaction, so a reader never observes a partial list and,
/// unlike the flat-file backend, movies and series can never go out of sync
/// with each other.
use crate::{
    error::{AppError, AppResult},
    models::{MediaKind, Watchlist, WatchlistEntry},
    store::WatchlistStore,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Row, SqlitePool,
};
use std::str::FromStr;

fn storage_err(context: &str, e: sqlx::Error) -> AppError {
    AppError::PersistenceUnavailable(format!("{}: {}", context, e))
}

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database and ensures the schema.
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| storage_err("invalid database URL", e))?
            .create_if_missing(true);

        // Single interactive user; one connection also keeps in-memory
        // databases coherent across calls.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| storage_err("opening database", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS watch_entries (
                title TEXT NOT NULL,
                kind TEXT NOT NULL,
                watched INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| storage_err("creating schema", e))?;

        Ok(Self { pool })
    }

    /// Looks up a stored entry by title, exactly or case-insensitively.
    ///
    /// Mirrors the query surface of the observed document store; the engine
    /// itself checks duplicates in memory.
    pub async fn find_by_title(
        &self,
        kind: MediaKind,
        title: &str,
        case_insensitive: bool,
    ) -> AppResult<Option<WatchlistEntry>> {
        let sql = if case_insensitive {
            "SELECT title, kind, watched FROM watch_entries \
             WHERE kind = ? AND title = ? COLLATE NOCASE LIMIT 1"
        } else {
            "SELECT title, kind, watched FROM watch_entries \
             WHERE kind = ? AND title = ? LIMIT 1"
        };

        let row = sqlx::query(sql)
            .bind(kind.as_str())
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_err("querying watch entry", e))?;

        Ok(row.map(|row| WatchlistEntry {
            title: row.get("title"),
            kind,
            watched: row.get("watched"),
        }))
    }
}

#[async_trait::async_trait]
impl WatchlistStore for SqliteStore {
    async fn restore(&self) -> AppResult<Watchlist> {
        let rows = sqlx::query("SELECT title, kind, watched FROM watch_entries ORDER BY rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_err("reading watch entries", e))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let kind_str: String = row.get("kind");
            let Ok(kind) = kind_str.parse::<MediaKind>() else {
                tracing::warn!(kind = %kind_str, "Skipping watch entry with unknown kind");
                continue;
            };
            entries.push(WatchlistEntry {
                title: row.get("title"),
                kind,
                watched: row.get("watched"),
            });
        }

        tracing::debug!(entries = entries.len(), "Watchlist restored from database");

        Ok(Watchlist::from_entries(entries))
    }

    async fn persist(&self, watchlist: &Watchlist) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_err("starting transaction", e))?;

        sqlx::query("DELETE FROM watch_entries")
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_err("clearing watch entries", e))?;

        for entry in watchlist.entries() {
            sqlx::query("INSERT INTO watch_entries (title, kind, watched) VALUES (?, ?, ?)")
                .bind(&entry.title)
                .bind(entry.kind.as_str())
                .bind(entry.watched)
                .execute(&mut *tx)
                .await
                .map_err(|e| storage_err("inserting watch entry", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| storage_err("committing watch entries", e))?;

        tracing::debug!(entries = watchlist.len(), "Watchlist persisted to database");

        Ok(())
    }
}
