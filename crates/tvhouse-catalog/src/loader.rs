//! Catalog acquisition with local cache and bundled fallback.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;

use super::api::CatalogApi;
use super::channel::Channel;
use super::error::CatalogError;
use super::parse::{BUNDLED_CATALOG, parse_catalog};

/// Default upper bound on the remote fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// File name of the local catalog cache.
pub const CACHE_FILE_NAME: &str = "channels.json";

/// Where the channels of a [`LoadedCatalog`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// Downloaded during this load and written to the cache.
    Remote,
    /// Previous cache file, kept because the download failed.
    StaleCache,
    /// Catalog bundled with the application.
    Bundled,
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::StaleCache => write!(f, "stale cache"),
            Self::Bundled => write!(f, "bundled"),
        }
    }
}

/// Result of a catalog load.
#[derive(Debug)]
pub struct LoadedCatalog {
    /// Channels in document order.
    pub channels: Vec<Channel>,
    /// Provenance of `channels`.
    pub source: CatalogSource,
    /// Why the remote fetch did not produce fresh data, if it did not.
    pub fetch_error: Option<CatalogError>,
}

/// Loads the channel catalog.
///
/// Each load downloads the remote catalog on a background task bounded
/// by a timeout, stores it in the cache file, and parses the cache. When
/// no cache is available afterwards the bundled catalog is used.
///
/// By default the cache is deleted before every download, so a failed
/// download always falls back to the bundled catalog. With
/// [`keep_stale_cache`](Self::keep_stale_cache) the previous cache is
/// only replaced on success and is reused when the download fails.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogLoader<C> {
    /// Catalog source.
    client: Arc<C>,
    /// Local cache file.
    cache_path: PathBuf,
    /// Upper bound on the remote fetch.
    timeout: Duration,
    /// Keep the previous cache until a download succeeds.
    keep_stale_cache: bool,
    /// Fallback catalog document.
    bundled: String,
}

impl<C> CatalogLoader<C>
where
    C: CatalogApi + Sync + 'static,
{
    /// Creates a loader caching into `cache_path`.
    #[must_use]
    pub fn new(client: C, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            client: Arc::new(client),
            cache_path: cache_path.into(),
            timeout: DEFAULT_FETCH_TIMEOUT,
            keep_stale_cache: false,
            bundled: String::from(BUNDLED_CATALOG),
        }
    }

    /// Sets the fetch timeout (default: 60s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Keeps the previous cache when a download fails (default: off).
    #[must_use]
    pub const fn keep_stale_cache(mut self, keep: bool) -> Self {
        self.keep_stale_cache = keep;
        self
    }

    /// Replaces the fallback catalog document.
    #[must_use]
    pub fn bundled(mut self, document: impl Into<String>) -> Self {
        self.bundled = document.into();
        self
    }

    /// Returns the cache file path.
    #[must_use]
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Loads the catalog, never failing.
    ///
    /// Fetch problems are reported in [`LoadedCatalog::fetch_error`].
    #[instrument(skip_all)]
    pub async fn load(&self) -> LoadedCatalog {
        if !self.keep_stale_cache {
            remove_cache(&self.cache_path);
        }

        let fetch_error = match self.fetch_with_timeout().await {
            Ok(body) => write_cache(&self.cache_path, &body).err(),
            Err(e) => Some(e),
        };

        if let Some(ref e) = fetch_error {
            tracing::warn!(error = %e, "catalog refresh failed");
        }

        // Delete-first never falls back to a cache this load did not write.
        let cached = if fetch_error.is_none() || self.keep_stale_cache {
            read_cache(&self.cache_path)
        } else {
            None
        };

        let loaded = match cached {
            Some(text) => {
                let source = if fetch_error.is_none() {
                    CatalogSource::Remote
                } else {
                    CatalogSource::StaleCache
                };
                LoadedCatalog {
                    channels: parse_catalog(&text),
                    source,
                    fetch_error,
                }
            }
            None => LoadedCatalog {
                channels: parse_catalog(&self.bundled),
                source: CatalogSource::Bundled,
                fetch_error,
            },
        };

        tracing::info!(
            source = %loaded.source,
            channels = loaded.channels.len(),
            "catalog loaded"
        );
        loaded
    }

    /// Loads the catalog and returns only the channels.
    pub async fn load_channels(&self) -> Vec<Channel> {
        self.load().await.channels
    }

    /// Runs the fetch on a background task and waits at most `timeout`.
    async fn fetch_with_timeout(&self) -> Result<Vec<u8>, CatalogError> {
        let client = Arc::clone(&self.client);
        let mut handle =
            tokio::spawn(async move { CatalogApi::fetch_catalog(client.as_ref()).await });

        match tokio::time::timeout(self.timeout, &mut handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(CatalogError::TaskFailed(e.to_string())),
            Err(_) => {
                handle.abort();
                Err(CatalogError::Timeout(self.timeout))
            }
        }
    }
}

/// Deletes the cache file; a missing file is not an error.
fn remove_cache(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed previous catalog cache"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove catalog cache"),
    }
}

/// Writes the cache through a temporary file so readers never see a partial document.
fn write_cache(path: &Path, body: &[u8]) -> Result<(), CatalogError> {
    let io_err = |source: std::io::Error| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    if let Err(e) =
        std::fs::write(&tmp_path, body).and_then(|()| std::fs::rename(&tmp_path, path))
    {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(io_err(e));
    }

    tracing::debug!(path = %path.display(), bytes = body.len(), "catalog cache written");
    Ok(())
}

/// Reads the cache file, treating any read failure as absence.
fn read_cache(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read catalog cache");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use crate::client::CatalogClient;

    const REMOTE_JSON: &str = include_str!("../../../fixtures/catalog/channels_remote.json");
    const SINGLE_JSON: &str = include_str!("../../../fixtures/catalog/channels_single.json");

    /// Source that always fails, as with networking disabled.
    struct OfflineApi;

    impl CatalogApi for OfflineApi {
        async fn fetch_catalog(&self) -> Result<Vec<u8>, CatalogError> {
            Err(CatalogError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            })
        }
    }

    /// Source that never answers.
    struct HangingApi;

    impl CatalogApi for HangingApi {
        async fn fetch_catalog(&self) -> Result<Vec<u8>, CatalogError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
    }

    /// Source that leaves a cache file behind and then fails, as when the
    /// previous cache could not be deleted.
    struct LeftoverCacheApi {
        cache: PathBuf,
    }

    impl CatalogApi for LeftoverCacheApi {
        async fn fetch_catalog(&self) -> Result<Vec<u8>, CatalogError> {
            std::fs::write(&self.cache, REMOTE_JSON).unwrap();
            Err(CatalogError::Status {
                status: reqwest::StatusCode::BAD_GATEWAY,
            })
        }
    }

    async fn mock_catalog(status: u16, body: &str) -> wiremock::MockServer {
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/channels.json"))
            .respond_with(wiremock::ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn http_client(server: &wiremock::MockServer) -> CatalogClient {
        CatalogClient::builder()
            .catalog_url(format!("{}/channels.json", server.uri()).parse().unwrap())
            .user_agent("test/0.0.0")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_load_remote_writes_cache_and_preserves_order() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join(CACHE_FILE_NAME);
        let server = mock_catalog(200, REMOTE_JSON).await;
        let loader = CatalogLoader::new(http_client(&server), &cache);

        // Act
        let loaded = loader.load().await;

        // Assert
        assert_eq!(loaded.source, CatalogSource::Remote);
        assert!(loaded.fetch_error.is_none());
        let names: Vec<&str> = loaded.channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["VTV1", "VTV3", "HTV7", "HTV9"]);
        assert_eq!(std::fs::read_to_string(&cache).unwrap(), REMOTE_JSON);
        assert!(!cache.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_load_reads_freshly_written_cache() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join(CACHE_FILE_NAME);
        std::fs::write(&cache, SINGLE_JSON).unwrap();
        let server = mock_catalog(200, REMOTE_JSON).await;
        let loader = CatalogLoader::new(http_client(&server), &cache);

        // Act
        let first = loader.load().await;
        let second = loader.load().await;

        // Assert
        assert_eq!(first.channels.len(), 4);
        assert_eq!(second.channels, first.channels);
        assert_eq!(second.source, CatalogSource::Remote);
    }

    #[tokio::test]
    async fn test_load_http_error_falls_back_to_bundled() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join(CACHE_FILE_NAME);
        let server = mock_catalog(500, "internal error").await;
        let loader = CatalogLoader::new(http_client(&server), &cache);

        // Act
        let loaded = loader.load().await;

        // Assert
        assert_eq!(loaded.source, CatalogSource::Bundled);
        assert!(matches!(
            loaded.fetch_error,
            Some(CatalogError::Status { .. })
        ));
        let names: Vec<&str> = loaded.channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["HTV2", "HTV3", "HTV4"]);
        assert!(!cache.exists());
    }

    #[tokio::test]
    async fn test_load_offline_uses_single_bundled_channel() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let loader =
            CatalogLoader::new(OfflineApi, dir.path().join(CACHE_FILE_NAME)).bundled(SINGLE_JSON);

        // Act
        let channels = loader.load_channels().await;

        // Assert
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name, "HTV2");
        assert_eq!(
            channels[0].url,
            "https://drm-livecdn.hplus.com.vn/CDN-FPT02/HTV2-HD-1080p/playlist.m3u8"
        );
    }

    #[tokio::test]
    async fn test_load_failure_deletes_previous_cache_by_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join(CACHE_FILE_NAME);
        std::fs::write(&cache, REMOTE_JSON).unwrap();
        let loader = CatalogLoader::new(OfflineApi, &cache);

        // Act
        let loaded = loader.load().await;

        // Assert
        assert_eq!(loaded.source, CatalogSource::Bundled);
        assert_eq!(loaded.channels.len(), 3);
        assert!(!cache.exists());
    }

    #[tokio::test]
    async fn test_load_failure_ignores_surviving_cache_by_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join(CACHE_FILE_NAME);
        let loader = CatalogLoader::new(
            LeftoverCacheApi {
                cache: cache.clone(),
            },
            &cache,
        );

        // Act
        let loaded = loader.load().await;

        // Assert
        assert!(cache.exists());
        assert_eq!(loaded.source, CatalogSource::Bundled);
        assert!(loaded.fetch_error.is_some());
        assert_eq!(loaded.channels.len(), 3);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_load_failure_with_undeletable_cache_uses_bundled() {
        use std::os::unix::fs::PermissionsExt;

        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        let cache = locked.join(CACHE_FILE_NAME);
        std::fs::write(&cache, REMOTE_JSON).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();
        let loader = CatalogLoader::new(OfflineApi, &cache);

        // Act
        let loaded = loader.load().await;
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        // Assert
        assert_eq!(loaded.source, CatalogSource::Bundled);
        assert_eq!(loaded.channels.len(), 3);
    }

    #[tokio::test]
    async fn test_load_write_failure_uses_bundled_and_cleans_temp_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join(CACHE_FILE_NAME);
        std::fs::create_dir(&cache).unwrap();
        let server = mock_catalog(200, REMOTE_JSON).await;
        let loader = CatalogLoader::new(http_client(&server), &cache);

        // Act
        let loaded = loader.load().await;

        // Assert
        assert_eq!(loaded.source, CatalogSource::Bundled);
        assert!(matches!(loaded.fetch_error, Some(CatalogError::Io { .. })));
        assert!(!cache.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_write_cache_removes_temp_file_on_rename_failure() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join(CACHE_FILE_NAME);
        std::fs::create_dir(&cache).unwrap();

        // Act
        let result = write_cache(&cache, REMOTE_JSON.as_bytes());

        // Assert
        assert!(matches!(result, Err(CatalogError::Io { .. })));
        assert!(!cache.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_load_failure_keeps_stale_cache_when_enabled() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join(CACHE_FILE_NAME);
        std::fs::write(&cache, REMOTE_JSON).unwrap();
        let loader = CatalogLoader::new(OfflineApi, &cache).keep_stale_cache(true);

        // Act
        let loaded = loader.load().await;

        // Assert
        assert_eq!(loaded.source, CatalogSource::StaleCache);
        assert!(loaded.fetch_error.is_some());
        assert_eq!(loaded.channels.len(), 4);
        assert!(cache.exists());
    }

    #[tokio::test]
    async fn test_load_timeout_falls_back_to_bundled() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let loader = CatalogLoader::new(HangingApi, dir.path().join(CACHE_FILE_NAME))
            .timeout(Duration::from_millis(50));

        // Act
        let loaded = loader.load().await;

        // Assert
        assert_eq!(loaded.source, CatalogSource::Bundled);
        assert!(matches!(loaded.fetch_error, Some(CatalogError::Timeout(_))));
        assert_eq!(loaded.channels.len(), 3);
    }

    #[tokio::test]
    async fn test_load_slow_server_times_out() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string(REMOTE_JSON)
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;
        let loader = CatalogLoader::new(
            http_client(&mock_server),
            dir.path().join(CACHE_FILE_NAME),
        )
        .timeout(Duration::from_millis(100));

        // Act
        let loaded = loader.load().await;

        // Assert
        assert_eq!(loaded.source, CatalogSource::Bundled);
        assert!(matches!(loaded.fetch_error, Some(CatalogError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_load_malformed_remote_entries_are_skipped() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let server = mock_catalog(
            200,
            include_str!("../../../fixtures/catalog/channels_malformed.json"),
        )
        .await;
        let loader = CatalogLoader::new(http_client(&server), dir.path().join(CACHE_FILE_NAME));

        // Act
        let loaded = loader.load().await;

        // Assert
        assert_eq!(loaded.source, CatalogSource::Remote);
        let names: Vec<&str> = loaded.channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["HTV2", "HTV4"]);
    }

    #[tokio::test]
    async fn test_load_creates_missing_cache_directory() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("nested").join("data").join(CACHE_FILE_NAME);
        let server = mock_catalog(200, SINGLE_JSON).await;
        let loader = CatalogLoader::new(http_client(&server), &cache);

        // Act
        let loaded = loader.load().await;

        // Assert
        assert_eq!(loaded.source, CatalogSource::Remote);
        assert!(cache.exists());
    }

    #[test]
    fn test_catalog_source_display() {
        // Arrange & Act & Assert
        assert_eq!(CatalogSource::Remote.to_string(), "remote");
        assert_eq!(CatalogSource::StaleCache.to_string(), "stale cache");
        assert_eq!(CatalogSource::Bundled.to_string(), "bundled");
    }
}
