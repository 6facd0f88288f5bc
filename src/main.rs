use reelist::{
    catalog::{CatalogProvider, RestCatalog},
    config::{Config, StorageBackend},
    engine::WatchlistEngine,
    error::AppError,
    models::{AddOutcome, MediaKind, MediaRecord, Recommendations, Watchlist},
    store::{FlatFileStore, SqliteStore, WatchlistStore},
};
use std::{str::FromStr, sync::Arc, time::Duration};

const USAGE: &str = "usage: reelist <command>
  browse <movie|series>            show the full catalog for a kind
  search <movie|series> <query>    substring search over titles, actors, genres
  add <movie|series> <title>       add a title to the watchlist
  watched <movie|series> <title>   mark a watchlist entry as watched
  remove <movie|series> <title>    remove a title from the watchlist
  list                             show the watchlist
  recommend                        show every genre-matching suggestion
  pick                             show the single best suggestion";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    let catalog = Arc::new(RestCatalog::new(
        &config.catalog_url,
        Duration::from_secs(config.catalog_timeout_secs),
    )?);
    let store: Arc<dyn WatchlistStore> = match config.storage {
        StorageBackend::Flat => Arc::new(FlatFileStore::new(&config.watchlist_dir)),
        StorageBackend::Sqlite => Arc::new(SqliteStore::connect(&config.database_url).await?),
    };

    let engine = WatchlistEngine::new(catalog.clone(), store);
    engine.restore().await;

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["browse", kind] => {
            let kind = parse_kind(kind)?;
            match catalog.fetch_all(kind).await {
                Ok(records) => print_records(&records),
                Err(e) => notice(&e),
            }
        }
        ["search", kind, query @ ..] if !query.is_empty() => {
            let kind = parse_kind(kind)?;
            match catalog.search(kind, &query.join(" ")).await {
                Ok(records) if records.is_empty() => println!("No matches."),
                Ok(records) => print_records(&records),
                Err(e) => notice(&e),
            }
        }
        ["add", kind, title @ ..] if !title.is_empty() => {
            let kind = parse_kind(kind)?;
            let title = title.join(" ");
            match engine.add(kind, &title).await {
                Ok(AddOutcome::Added) => println!("'{}' added to the watchlist.", title),
                Ok(AddOutcome::AlreadyPresent) => {
                    println!("'{}' is already on the watchlist.", title)
                }
                Err(e) => notice(&e),
            }
        }
        ["watched", kind, title @ ..] if !title.is_empty() => {
            let kind = parse_kind(kind)?;
            let title = title.join(" ");
            match engine.mark_watched(kind, &title).await {
                Ok(true) => println!("'{}' marked as watched.", title),
                Ok(false) => println!("'{}' is not on the watchlist.", title),
                Err(e) => notice(&e),
            }
        }
        ["remove", kind, title @ ..] if !title.is_empty() => {
            let kind = parse_kind(kind)?;
            let title = title.join(" ");
            match engine.remove(kind, &title).await {
                Ok(true) => println!("'{}' removed from the watchlist.", title),
                Ok(false) => println!("'{}' is not on the watchlist.", title),
                Err(e) => notice(&e),
            }
        }
        ["list"] => print_watchlist(&engine.list().await),
        ["recommend"] => match engine.recommend().await {
            Ok(Recommendations::InsufficientData) => {
                println!("Not enough watchlist data to recommend from yet.")
            }
            Ok(Recommendations::Matches(records)) if records.is_empty() => {
                println!("No matching suggestions.")
            }
            Ok(Recommendations::Matches(records)) => print_records(&records),
            Err(e) => notice(&e),
        },
        ["pick"] => match engine.recommend_best().await {
            Ok(Some(record)) => {
                println!("{} ({}), rated {}", record.title, record.genres.join(", "), record.rating)
            }
            Ok(None) => println!("Nothing to suggest yet."),
            Err(e) => notice(&e),
        },
        _ => anyhow::bail!("{}", USAGE),
    }

    Ok(())
}

fn parse_kind(arg: &str) -> anyhow::Result<MediaKind> {
    MediaKind::from_str(arg).map_err(|e| anyhow::anyhow!("{}\n{}", e, USAGE))
}

/// Non-fatal notice for conditions the user should see but that must never
/// crash the session.
fn notice(error: &AppError) {
    eprintln!("{}", error);
}

fn print_records(records: &[MediaRecord]) {
    for record in records {
        println!("{} ({})", record.title, record.genres.join(", "));
    }
}

fn print_watchlist(watchlist: &Watchlist) {
    for kind in MediaKind::ALL {
        let header = match kind {
            MediaKind::Movie => "Movies:",
            MediaKind::Series => "Series:",
        };
        let entries: Vec<String> = watchlist
            .entries_for(kind)
            .map(|e| {
                if e.watched {
                    format!("- {} [watched]", e.title)
                } else {
                    format!("- {}", e.title)
                }
            })
            .collect();

        if entries.is_empty() {
            println!("{} (empty)", header);
        } else {
            println!("{}", header);
            for line in entries {
                println!("{}", line);
            }
        }
    }
}
