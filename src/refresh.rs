//! # Refresh Loader Module
//!
//! ## Purpose
//! Fetches the watchlist document from a remote endpoint or a local file,
//! parses it, and installs the resulting snapshot into the store. Runs on a
//! fixed schedule and on demand when a query arrives before the first
//! successful load.
//!
//! ## Input/Output Specification
//! - **Input**: Source identifier (HTTP(S) URL or file path), refresh period
//! - **Output**: Installed snapshots in the store; failures logged, never
//!   propagated to queries
//! - **Document shape**: JSON object with `results` (entries) and
//!   `sources_used` (source metadata) arrays
//!
//! ## Key Features
//! - Non-200 responses and malformed documents leave the prior snapshot
//!   untouched
//! - Read-through on an empty store prefers the local fallback so data is
//!   available before the first successful remote fetch
//! - Scheduled refreshes prefer the remote source

use crate::config::WatchlistConfig;
use crate::errors::{Result, ScreeningError};
use crate::store::{WatchlistSnapshot, WatchlistStore};
use crate::{Entry, SourceMetaData};
use reqwest::header::ACCEPT;
use reqwest::{redirect, Client, StatusCode};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// A resolved watchlist source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySource {
    /// Fetched over HTTP(S)
    Remote(String),
    /// Read from the local filesystem
    Local(PathBuf),
}

impl EntrySource {
    /// Resolve a source identifier to a remote URL or an existing local
    /// path. Anything else is a configuration failure and the refresh is
    /// skipped.
    pub fn resolve(identifier: &str) -> Result<Self> {
        if identifier.starts_with("http://") || identifier.starts_with("https://") {
            return Ok(EntrySource::Remote(identifier.to_string()));
        }

        let path = Path::new(identifier);
        if path.is_file() {
            return Ok(EntrySource::Local(path.to_path_buf()));
        }

        Err(ScreeningError::ConfigurationFailure {
            source_id: identifier.to_string(),
        })
    }

    fn describe(&self) -> String {
        match self {
            EntrySource::Remote(url) => url.clone(),
            EntrySource::Local(path) => path.display().to_string(),
        }
    }
}

/// Upstream document: two named collections
#[derive(Debug, Deserialize)]
struct WatchlistDocument {
    results: Vec<Entry>,
    #[serde(default)]
    sources_used: Vec<SourceMetaData>,
}

/// Fetches, parses, and installs watchlist snapshots
pub struct RefreshLoader {
    config: WatchlistConfig,
    client: Client,
    store: Arc<WatchlistStore>,
    // Serializes concurrent refresh attempts (scheduler vs read-through)
    refresh_lock: Mutex<()>,
}

impl RefreshLoader {
    /// Create a new loader over the given store
    pub fn new(config: WatchlistConfig, store: Arc<WatchlistStore>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .redirect(redirect::Policy::limited(10))
            .build()
            .map_err(|e| ScreeningError::Internal {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            config,
            client,
            store,
            refresh_lock: Mutex::new(()),
        })
    }

    /// Run one refresh from the given source. On success the parsed
    /// snapshot replaces the store contents wholesale; on any failure the
    /// prior snapshot is left untouched and the error is returned for the
    /// caller to log.
    pub async fn refresh(&self, source: &EntrySource) -> Result<()> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked(source).await
    }

    async fn refresh_locked(&self, source: &EntrySource) -> Result<()> {
        info!("fetching watchlist entries from {}", source.describe());
        let prior = self.store.begin_loading().await;

        let outcome = async {
            let body = match source {
                EntrySource::Remote(url) => self.fetch_remote(url).await?,
                EntrySource::Local(path) => self.read_local(path).await?,
            };
            parse_document(&body, &source.describe())
        }
        .await;

        match outcome {
            Ok(snapshot) => {
                self.store.install(snapshot).await;
                Ok(())
            }
            Err(e) => {
                self.store.abort_loading(prior).await;
                Err(e)
            }
        }
    }

    /// Refresh from the configured source identifier, resolving it first
    pub async fn refresh_from_source(&self) -> Result<()> {
        let source = EntrySource::resolve(&self.config.source)?;
        self.refresh(&source).await
    }

    /// Blocking read-through for an empty store: try the local fallback
    /// first so data is available before the first successful remote fetch,
    /// then the configured source. Never fails; both sources failing leaves
    /// the store empty and queries see an empty result set.
    pub async fn ensure_loaded(&self) {
        if !self.store.is_empty().await {
            return;
        }

        let _guard = self.refresh_lock.lock().await;
        if !self.store.is_empty().await {
            // Another caller loaded while we waited for the lock
            return;
        }

        if let Some(path) = self.config.fallback_path.clone() {
            match EntrySource::resolve(&path.display().to_string()) {
                Ok(source) => match self.refresh_locked(&source).await {
                    Ok(()) => return,
                    Err(e) => warn!("fallback watchlist load failed ({}): {}", e.category(), e),
                },
                Err(e) => warn!("fallback watchlist load failed ({}): {}", e.category(), e),
            }
        }

        match EntrySource::resolve(&self.config.source) {
            Ok(source) => {
                if let Err(e) = self.refresh_locked(&source).await {
                    error!("watchlist refresh failed ({}): {}", e.category(), e);
                }
            }
            Err(e) => error!("watchlist refresh skipped ({}): {}", e.category(), e),
        }
    }

    /// Spawn the periodic refresh task. Each tick refreshes from the
    /// configured source; failures are logged and retried on the next tick.
    pub fn spawn_scheduler(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let period = Duration::from_secs(self.config.refresh_interval_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                if let Err(e) = self.refresh_from_source().await {
                    error!("scheduled watchlist refresh failed ({}): {}", e.category(), e);
                }
            }
        })
    }

    async fn fetch_remote(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ScreeningError::TransportFailure {
                source_id: url.to_string(),
                details: e.to_string(),
            })?;

        if response.status() != StatusCode::OK {
            return Err(ScreeningError::UnexpectedStatus {
                source_id: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| ScreeningError::TransportFailure {
                source_id: url.to_string(),
                details: e.to_string(),
            })
    }

    async fn read_local(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ScreeningError::TransportFailure {
                source_id: path.display().to_string(),
                details: e.to_string(),
            })
    }
}

/// Parse the two named collections out of the upstream document
fn parse_document(body: &str, source: &str) -> Result<WatchlistSnapshot> {
    let document: WatchlistDocument =
        serde_json::from_str(body).map_err(|e| ScreeningError::ParseFailure {
            source_id: source.to_string(),
            details: e.to_string(),
        })?;

    Ok(WatchlistSnapshot {
        entries: document.results,
        sources: document.sources_used,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreState;
    use std::io::Write;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SAMPLE_DOCUMENT: &str = r#"{
        "results": [
            {"name": "Luciano BRUNETTI", "type": "Individual", "dates_of_birth": ["1988-08-30"]},
            {"name": "KARAMAY URBAN CREDIT COOPERATIVES", "type": "Entity"}
        ],
        "sources_used": [
            {"source": "Specially Designated Nationals (SDN) - Treasury Department",
             "source_last_updated": "2024-05-01T12:00:00+00:00"}
        ]
    }"#;

    fn loader_for(source: &str, store: Arc<WatchlistStore>) -> RefreshLoader {
        let config = WatchlistConfig {
            source: source.to_string(),
            fallback_path: None,
            refresh_interval_secs: 3600,
            request_timeout_secs: 5,
        };
        RefreshLoader::new(config, store).unwrap()
    }

    #[test]
    fn test_resolve_recognizes_urls_and_paths() {
        assert!(matches!(
            EntrySource::resolve("https://example.com/list.json"),
            Ok(EntrySource::Remote(_))
        ));
        assert!(matches!(
            EntrySource::resolve("ftp://example.com/list.json"),
            Err(ScreeningError::ConfigurationFailure { .. })
        ));
        assert!(matches!(
            EntrySource::resolve("/no/such/file.json"),
            Err(ScreeningError::ConfigurationFailure { .. })
        ));
    }

    #[test]
    fn test_parse_document_requires_results() {
        assert!(parse_document(r#"{"sources_used": []}"#, "test").is_err());
        let snapshot = parse_document(SAMPLE_DOCUMENT, "test").unwrap();
        assert_eq!(snapshot.entries.len(), 2);
        assert_eq!(snapshot.sources.len(), 1);
    }

    #[tokio::test]
    async fn test_remote_refresh_installs_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/consolidated.json"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_DOCUMENT))
            .mount(&server)
            .await;

        let store = Arc::new(WatchlistStore::new());
        let loader = loader_for(&format!("{}/consolidated.json", server.uri()), store.clone());

        loader.refresh_from_source().await.unwrap();
        let snapshot = store.current().await.unwrap();
        assert_eq!(snapshot.entries.len(), 2);
        assert_eq!(snapshot.entries[0].name, "Luciano BRUNETTI");
        assert_eq!(store.state().await, StoreState::Ready);
    }

    #[tokio::test]
    async fn test_http_error_retains_prior_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_DOCUMENT))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = Arc::new(WatchlistStore::new());
        let loader = loader_for(&server.uri(), store.clone());

        loader.refresh_from_source().await.unwrap();
        assert_eq!(store.current().await.unwrap().entries.len(), 2);

        let err = loader.refresh_from_source().await.unwrap_err();
        assert!(matches!(err, ScreeningError::UnexpectedStatus { status: 500, .. }));
        assert_eq!(store.current().await.unwrap().entries.len(), 2);
        assert_eq!(store.state().await, StoreState::Ready);
    }

    #[tokio::test]
    async fn test_malformed_document_retains_prior_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_DOCUMENT))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let store = Arc::new(WatchlistStore::new());
        let loader = loader_for(&server.uri(), store.clone());

        loader.refresh_from_source().await.unwrap();
        let err = loader.refresh_from_source().await.unwrap_err();
        assert!(matches!(err, ScreeningError::ParseFailure { .. }));
        assert_eq!(store.current().await.unwrap().entries.len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_replaces_dataset_wholesale() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_DOCUMENT))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"results": [{"name": "Only Survivor"}], "sources_used": []}"#),
            )
            .mount(&server)
            .await;

        let store = Arc::new(WatchlistStore::new());
        let loader = loader_for(&server.uri(), store.clone());

        loader.refresh_from_source().await.unwrap();
        loader.refresh_from_source().await.unwrap();

        let snapshot = store.current().await.unwrap();
        assert_eq!(snapshot.entries.len(), 1);
        assert_eq!(snapshot.entries[0].name, "Only Survivor");
    }

    #[tokio::test]
    async fn test_local_source_refresh() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_DOCUMENT.as_bytes()).unwrap();

        let store = Arc::new(WatchlistStore::new());
        let loader = loader_for(&file.path().display().to_string(), store.clone());

        loader.refresh_from_source().await.unwrap();
        assert_eq!(store.current().await.unwrap().entries.len(), 2);
    }

    #[tokio::test]
    async fn test_ensure_loaded_prefers_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_DOCUMENT.as_bytes()).unwrap();

        let store = Arc::new(WatchlistStore::new());
        // Remote source is unreachable; the fallback must carry the load
        let config = WatchlistConfig {
            source: "http://127.0.0.1:1/unreachable.json".to_string(),
            fallback_path: Some(file.path().to_path_buf()),
            refresh_interval_secs: 3600,
            request_timeout_secs: 1,
        };
        let loader = RefreshLoader::new(config, store.clone()).unwrap();

        loader.ensure_loaded().await;
        assert_eq!(store.current().await.unwrap().entries.len(), 2);
    }

    #[tokio::test]
    async fn test_ensure_loaded_with_all_sources_failing_stays_empty() {
        let store = Arc::new(WatchlistStore::new());
        let config = WatchlistConfig {
            source: "http://127.0.0.1:1/unreachable.json".to_string(),
            fallback_path: Some(PathBuf::from("/no/such/file.json")),
            refresh_interval_secs: 3600,
            request_timeout_secs: 1,
        };
        let loader = RefreshLoader::new(config, store.clone()).unwrap();

        loader.ensure_loaded().await;
        assert!(store.is_empty().await);
        assert_eq!(store.state().await, StoreState::Empty);
    }

    #[tokio::test]
    async fn test_unrecognized_source_skips_refresh() {
        let store = Arc::new(WatchlistStore::new());
        let loader = loader_for("ftp://not-a-thing/list.json", store.clone());

        let err = loader.refresh_from_source().await.unwrap_err();
        assert!(matches!(err, ScreeningError::ConfigurationFailure { .. }));
        assert!(store.is_empty().await);
    }
}
