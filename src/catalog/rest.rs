/// REST catalog provider
///
/// Talks to the mock content backend (`GET /movies`, `GET /series`). The
/// backend answers with either a bare array of content objects or an object
/// wrapping that array under the kind's key; both shapes are decoded through
/// `CatalogBody` and any third shape is rejected as `CatalogUnavailable`.
///
/// No local caching: every call re-fetches, so results always reflect the
/// provider's latest state. Searching and title lookup filter client-side
/// over the full catalog, which keeps the matching contract independent of
/// whatever query parameters the provider happens to support.
use crate::{
    catalog::CatalogProvider,
    error::{AppError, AppResult},
    models::{CatalogBody, MediaKind, MediaRecord},
};
use reqwest::Client as HttpClient;
use std::time::Duration;

#[derive(Clone)]
pub struct RestCatalog {
    http_client: HttpClient,
    base_url: String,
}

impl RestCatalog {
    /// Creates a provider client with a per-request timeout.
    ///
    /// The timeout bounds every catalog call: a stalled provider degrades to
    /// a reported `CatalogUnavailable`, never a hang.
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::CatalogUnavailable(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_records(&self, kind: MediaKind) -> AppResult<Vec<MediaRecord>> {
        let url = format!("{}/{}", self.base_url, kind.endpoint());

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            AppError::CatalogUnavailable(format!("request to {} failed: {}", url, e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::CatalogUnavailable(format!(
                "provider returned status {} for {}",
                status, url
            )));
        }

        let body: CatalogBody = response.json().await.map_err(|e| {
            AppError::CatalogUnavailable(format!("malformed provider response: {}", e))
        })?;

        let records = body.into_records(kind).ok_or_else(|| {
            AppError::CatalogUnavailable(format!(
                "provider response missing expected '{}' key",
                kind.wrapped_key()
            ))
        })?;

        tracing::debug!(
            kind = %kind,
            records = records.len(),
            "Catalog fetched"
        );

        Ok(records
            .into_iter()
            .map(|raw| raw.into_record(kind))
            .collect())
    }
}

#[async_trait::async_trait]
impl CatalogProvider for RestCatalog {
    async fn fetch_all(&self, kind: MediaKind) -> AppResult<Vec<MediaRecord>> {
        self.fetch_records(kind).await
    }

    async fn search(&self, kind: MediaKind, query: &str) -> AppResult<Vec<MediaRecord>> {
        let records = self.fetch_records(kind).await?;
        let matches: Vec<MediaRecord> = records
            .into_iter()
            .filter(|record| record.matches(query))
            .collect();

        tracing::info!(
            kind = %kind,
            query = %query,
            results = matches.len(),
            "Catalog search completed"
        );

        Ok(matches)
    }

    async fn find_by_title(
        &self,
        kind: MediaKind,
        title: &str,
    ) -> AppResult<Option<MediaRecord>> {
        let records = self.fetch_records(kind).await?;
        Ok(records.into_iter().find(|record| record.title == title))
    }
}
