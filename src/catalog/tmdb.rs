//! Reqwest-based catalog client for a TMDB-style provider.

use crate::catalog::{CatalogError, CatalogMovieDetails, CatalogSearchResult, CatalogSource, Result};
use crate::config::CatalogConfig;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// The concrete implementation of [`CatalogSource`].
///
/// One lookup per call, bounded by the configured timeout. No caching and
/// no retries; a failed lookup is reported and the caller decides.
pub struct TmdbCatalog {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    request_timeout: Duration,
}

/// Envelope around the provider's search results.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<CatalogSearchResult>,
}

/// Makes sure a url has a trailing slash.
///
/// `Url::join` drops the last path segment when the base lacks a trailing
/// slash: joining `/3` with `movie` gives `/movie`, while `/3/` gives
/// `/3/movie`. Call this before joining.
fn ensure_slash(url: &Url) -> Url {
    if url.path().ends_with('/') {
        url.clone()
    } else {
        let mut new_url = url.clone();
        let mut path = new_url.path().to_string();
        path.push('/');
        new_url.set_path(&path);
        new_url
    }
}

impl TmdbCatalog {
    pub fn new(config: &CatalogConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            request_timeout: config.timeout,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        ensure_slash(&self.base_url).join(path).map_err(|e| CatalogError::Unavailable {
            message: format!("invalid catalog URL for {path}: {e}"),
        })
    }

    fn unavailable(err: reqwest::Error) -> CatalogError {
        CatalogError::Unavailable {
            message: err.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl CatalogSource for TmdbCatalog {
    async fn search(&self, query: &str) -> Result<Vec<CatalogSearchResult>> {
        let mut url = self.endpoint("search/movie")?;
        if let Some(api_key) = &self.api_key {
            url.query_pairs_mut().append_pair("api_key", api_key);
        }
        url.query_pairs_mut().append_pair("query", query);

        debug!("Searching catalog: {}", url.path());

        let response = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(Self::unavailable)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Catalog search failed: {} - {}", status, body);
            return Err(CatalogError::Unavailable {
                message: format!("search returned {status}"),
            });
        }

        let body: SearchResponse = response.json().await.map_err(|e| CatalogError::Unavailable {
            message: format!("error decoding search response: {e}"),
        })?;

        Ok(body.results)
    }

    async fn fetch_details(&self, external_id: i64) -> Result<CatalogMovieDetails> {
        let mut url = self.endpoint(&format!("movie/{external_id}"))?;
        if let Some(api_key) = &self.api_key {
            url.query_pairs_mut().append_pair("api_key", api_key);
        }
        url.query_pairs_mut().append_pair("language", "en-US");

        debug!("Fetching catalog details: {}", url.path());

        let response = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(Self::unavailable)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound { id: external_id });
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Catalog detail fetch failed: {} - {}", status, body);
            return Err(CatalogError::Unavailable {
                message: format!("detail fetch returned {status}"),
            });
        }

        response.json().await.map_err(|e| CatalogError::Unavailable {
            message: format!("error decoding detail response: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base: &str, timeout: Duration) -> CatalogConfig {
        CatalogConfig {
            base_url: base.parse().unwrap(),
            image_base_url: "https://image.example.com/w500".to_string(),
            api_key: Some("test-key".to_string()),
            timeout,
        }
    }

    #[tokio::test]
    async fn test_search_returns_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("query", "Dune"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [
                    {"id": 438631, "title": "Dune", "release_date": "2021-09-15", "overview": "Paul Atreides..."},
                    {"id": 841, "title": "Dune", "release_date": "1984-12-14"}
                ]
            })))
            .mount(&server)
            .await;

        let catalog = TmdbCatalog::new(&test_config(&server.uri(), Duration::from_secs(5))).unwrap();
        let results = catalog.search("Dune").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 438631);
        assert_eq!(results[0].title, "Dune");
        assert_eq!(results[1].overview, None);
    }

    #[tokio::test]
    async fn test_search_provider_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let catalog = TmdbCatalog::new(&test_config(&server.uri(), Duration::from_secs(5))).unwrap();
        let err = catalog.search("anything").await.unwrap_err();

        assert!(matches!(err, CatalogError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_search_timeout_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"results": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let catalog = TmdbCatalog::new(&test_config(&server.uri(), Duration::from_millis(50))).unwrap();
        let err = catalog.search("slow").await.unwrap_err();

        assert!(matches!(err, CatalogError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_fetch_details() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/603"))
            .and(query_param("language", "en-US"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 603,
                "title": "The Matrix",
                "release_date": "1999-03-30",
                "overview": "A computer hacker learns...",
                "poster_path": "/matrix.jpg"
            })))
            .mount(&server)
            .await;

        let catalog = TmdbCatalog::new(&test_config(&server.uri(), Duration::from_secs(5))).unwrap();
        let details = catalog.fetch_details(603).await.unwrap();

        assert_eq!(details.title, "The Matrix");
        assert_eq!(details.release_year().as_deref(), Some("1999"));
        assert_eq!(details.poster_path.as_deref(), Some("/matrix.jpg"));
    }

    #[tokio::test]
    async fn test_fetch_details_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/999999"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status_message": "The resource you requested could not be found."
            })))
            .mount(&server)
            .await;

        let catalog = TmdbCatalog::new(&test_config(&server.uri(), Duration::from_secs(5))).unwrap();
        let err = catalog.fetch_details(999999).await.unwrap_err();

        assert!(matches!(err, CatalogError::NotFound { id: 999999 }));
    }

    #[test]
    fn test_ensure_slash() {
        let base: Url = "https://api.example.com/3".parse().unwrap();
        assert_eq!(ensure_slash(&base).join("search/movie").unwrap().path(), "/3/search/movie");

        let base: Url = "https://api.example.com/3/".parse().unwrap();
        assert_eq!(ensure_slash(&base).join("search/movie").unwrap().path(), "/3/search/movie");
    }
}
