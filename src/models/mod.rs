use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt::Display, str::FromStr};

/// The two kinds of content the catalog provider serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    pub const ALL: [MediaKind; 2] = [MediaKind::Movie, MediaKind::Series];

    /// Provider endpoint path for this kind (`GET /movies`, `GET /series`)
    pub fn endpoint(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movies",
            MediaKind::Series => "series",
        }
    }

    /// Key under which the provider may wrap the record array
    ///
    /// The provider answers either with a bare array or with an object
    /// holding the array under this key.
    pub fn wrapped_key(&self) -> &'static str {
        self.endpoint()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaKind::Movie),
            "series" => Ok(MediaKind::Series),
            other => Err(format!("unknown media kind: {}", other)),
        }
    }
}

/// A catalog record as surfaced to callers
///
/// Always fetched fresh from the provider, never locally edited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaRecord {
    pub title: String,
    pub description: String,
    pub rating: f64,
    pub actors: Vec<String>,
    pub genres: Vec<String>,
    pub kind: MediaKind,
}

impl MediaRecord {
    /// Case-insensitive substring match against title, any actor, or any genre
    ///
    /// This is containment matching, not tokenized search.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.actors.iter().any(|a| a.to_lowercase().contains(&needle))
            || self.genres.iter().any(|g| g.to_lowercase().contains(&needle))
    }
}

// ============================================================================
// Catalog provider wire types
// ============================================================================

/// Raw content object as returned by the catalog provider
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub actors: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl RawRecord {
    pub fn into_record(self, kind: MediaKind) -> MediaRecord {
        MediaRecord {
            title: self.title,
            description: self.description,
            rating: self.rating,
            actors: self.actors,
            genres: self.genres,
            kind,
        }
    }
}

/// The two accepted shapes of a provider response body
///
/// The provider returns either a bare array of records or an object wrapping
/// that array under the kind's key. Anything else fails decoding and is
/// reported as `CatalogUnavailable` rather than shape-guessed.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CatalogBody {
    Records(Vec<RawRecord>),
    Wrapped(HashMap<String, Vec<RawRecord>>),
}

impl CatalogBody {
    /// Extracts the record array for `kind`, or `None` when a wrapped
    /// response does not carry the expected key.
    pub fn into_records(self, kind: MediaKind) -> Option<Vec<RawRecord>> {
        match self {
            CatalogBody::Records(records) => Some(records),
            CatalogBody::Wrapped(mut map) => map.remove(kind.wrapped_key()),
        }
    }
}

// ============================================================================
// Watchlist types
// ============================================================================

/// A single saved selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistEntry {
    pub title: String,
    pub kind: MediaKind,
    pub watched: bool,
}

impl WatchlistEntry {
    pub fn unwatched(kind: MediaKind, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind,
            watched: false,
        }
    }
}

/// The user's saved selections, insertion-ordered
///
/// Invariant: at most one unwatched entry per `(kind, title)` pair. The
/// engine enforces this on `add`; the aggregate only provides the checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Watchlist {
    entries: Vec<WatchlistEntry>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<WatchlistEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn entries_for(&self, kind: MediaKind) -> impl Iterator<Item = &WatchlistEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    pub fn unwatched(&self) -> impl Iterator<Item = &WatchlistEntry> {
        self.entries.iter().filter(|e| !e.watched)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: WatchlistEntry) {
        self.entries.push(entry);
    }

    /// Whether an unwatched entry with this `(kind, title)` already exists
    pub fn contains_unwatched(&self, kind: MediaKind, title: &str) -> bool {
        self.entries
            .iter()
            .any(|e| !e.watched && e.kind == kind && e.title == title)
    }

    /// Whether any entry (watched or not) carries this title for this kind
    pub fn contains_title(&self, kind: MediaKind, title: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.kind == kind && e.title == title)
    }

    /// Flips the watched flag on the first unwatched match, in place.
    /// Returns whether anything changed.
    pub fn mark_watched(&mut self, kind: MediaKind, title: &str) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|e| !e.watched && e.kind == kind && e.title == title)
        {
            Some(entry) => {
                entry.watched = true;
                true
            }
            None => false,
        }
    }

    /// Removes every entry with this `(kind, title)`. Returns whether
    /// anything was removed.
    pub fn remove(&mut self, kind: MediaKind, title: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| !(e.kind == kind && e.title == title));
        self.entries.len() != before
    }
}

/// Outcome of an `add` operation
///
/// `AlreadyPresent` is a user-facing conflict signal, not an error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// Outcome of a recommendation pass
///
/// An empty aggregate genre set (empty watchlist, or no entry resolves to a
/// catalog record with genres) is a distinct, reportable condition and must
/// not be conflated with a genuine empty match set.
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendations {
    InsufficientData,
    Matches(Vec<MediaRecord>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kind_parses_both_spellings() {
        assert_eq!("movie".parse::<MediaKind>().unwrap(), MediaKind::Movie);
        assert_eq!("Movies".parse::<MediaKind>().unwrap(), MediaKind::Movie);
        assert_eq!("series".parse::<MediaKind>().unwrap(), MediaKind::Series);
        assert!("podcast".parse::<MediaKind>().is_err());
    }

    #[test]
    fn catalog_body_decodes_bare_array() {
        let json = r#"[{"title": "Inception", "description": "Dreams", "rating": 8.8,
                        "actors": ["Leonardo DiCaprio"], "genres": ["sci-fi", "thriller"]}]"#;
        let body: CatalogBody = serde_json::from_str(json).unwrap();
        let records = body.into_records(MediaKind::Movie).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Inception");
        assert_eq!(records[0].genres, vec!["sci-fi", "thriller"]);
    }

    #[test]
    fn catalog_body_decodes_wrapped_object() {
        let json = r#"{"series": [{"title": "Dark", "description": "", "rating": 8.7,
                        "actors": [], "genres": ["sci-fi"]}]}"#;
        let body: CatalogBody = serde_json::from_str(json).unwrap();
        let records = body.into_records(MediaKind::Series).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Dark");
    }

    #[test]
    fn catalog_body_rejects_wrapped_object_with_wrong_key() {
        let json = r#"{"shows": [{"title": "Dark"}]}"#;
        let body: CatalogBody = serde_json::from_str(json).unwrap();
        assert!(body.into_records(MediaKind::Series).is_none());
    }

    #[test]
    fn catalog_body_rejects_third_shape() {
        // Neither a bare array nor an object of record arrays
        assert!(serde_json::from_str::<CatalogBody>(r#""unexpected""#).is_err());
        assert!(serde_json::from_str::<CatalogBody>(r#"{"movies": 42}"#).is_err());
    }

    #[test]
    fn record_matches_title_actor_and_genre_substrings() {
        let record = MediaRecord {
            title: "School of Rock".to_string(),
            description: String::new(),
            rating: 7.2,
            actors: vec!["Jack Black".to_string()],
            genres: vec!["comedy".to_string()],
            kind: MediaKind::Movie,
        };

        // Substring of an actor name, even though the title has no "ack"
        assert!(record.matches("ack"));
        // Case-insensitive title containment
        assert!(record.matches("SCHOOL"));
        // Genre containment
        assert!(record.matches("com"));
        assert!(!record.matches("horror"));
    }

    #[test]
    fn watchlist_uniqueness_checks_distinguish_kind() {
        let mut watchlist = Watchlist::new();
        watchlist.push(WatchlistEntry::unwatched(MediaKind::Movie, "Dune"));

        assert!(watchlist.contains_unwatched(MediaKind::Movie, "Dune"));
        assert!(!watchlist.contains_unwatched(MediaKind::Series, "Dune"));
        assert!(!watchlist.contains_unwatched(MediaKind::Movie, "dune"));
    }

    #[test]
    fn mark_watched_frees_the_unwatched_slot() {
        let mut watchlist = Watchlist::new();
        watchlist.push(WatchlistEntry::unwatched(MediaKind::Movie, "Dune"));

        assert!(watchlist.mark_watched(MediaKind::Movie, "Dune"));
        assert!(!watchlist.contains_unwatched(MediaKind::Movie, "Dune"));
        // Still present by title, so it stays excluded from recommendations
        assert!(watchlist.contains_title(MediaKind::Movie, "Dune"));
        // A second mark has nothing left to flip
        assert!(!watchlist.mark_watched(MediaKind::Movie, "Dune"));
    }

    #[test]
    fn remove_deletes_all_states_of_a_title() {
        let mut watchlist = Watchlist::new();
        watchlist.push(WatchlistEntry::unwatched(MediaKind::Movie, "Dune"));
        watchlist.mark_watched(MediaKind::Movie, "Dune");
        watchlist.push(WatchlistEntry::unwatched(MediaKind::Movie, "Dune"));

        assert!(watchlist.remove(MediaKind::Movie, "Dune"));
        assert!(watchlist.is_empty());
        assert!(!watchlist.remove(MediaKind::Movie, "Dune"));
    }
}
