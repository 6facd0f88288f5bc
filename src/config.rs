use serde::Deserialize;

/// Which persistence backend to wire in
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One text file per kind in `watchlist_dir`
    #[default]
    Flat,
    /// SQLite database at `database_url`
    Sqlite,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the catalog provider
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,

    /// Timeout for any single catalog request, in seconds
    #[serde(default = "default_catalog_timeout_secs")]
    pub catalog_timeout_secs: u64,

    /// Persistence backend selection
    #[serde(default)]
    pub storage: StorageBackend,

    /// Directory holding the flat watchlist files
    #[serde(default = "default_watchlist_dir")]
    pub watchlist_dir: String,

    /// SQLite database URL for the database backend
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

fn default_catalog_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_catalog_timeout_secs() -> u64 {
    10
}

fn default_watchlist_dir() -> String {
    ".".to_string()
}

fn default_database_url() -> String {
    "sqlite://watchlist.db".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
