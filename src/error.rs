/// Application-level errors
///
/// The taxonomy is deliberately small: both variants are conditions the UI
/// layer reports as non-fatal notices. A duplicate `add` is not an error at
/// all; it is signalled through `AddOutcome::AlreadyPresent`.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Provider unreachable, non-success status, or malformed response body.
    /// Callers degrade to "no results" and report; never a crash.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Storage unreachable or unwritable. On restore this degrades to an
    /// empty watchlist; on persist it must reach the user, since the
    /// mutation would not survive a restart.
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),
}

pub type AppResult<T> = Result<T, AppError>;
