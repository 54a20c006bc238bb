//! `CatalogClient` - remote channel catalog client implementation.

use anyhow::Context;
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::CatalogApi;
use super::error::CatalogError;
use super::parse::validate_catalog;

/// Default location of the remote channel catalog.
pub const DEFAULT_CATALOG_URL: &str = "https://tvhouse.example.com/channels.json";

/// Remote channel catalog client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClient {
    /// HTTP client.
    http_client: Client,
    /// Catalog document URL.
    catalog_url: Url,
}

/// Builder for `CatalogClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClientBuilder {
    catalog_url: Option<Url>,
    user_agent: Option<String>,
}

impl CatalogClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            catalog_url: None,
            user_agent: None,
        }
    }

    /// Overrides the catalog URL (config, or wiremock in tests).
    #[must_use]
    pub fn catalog_url(mut self, url: Url) -> Self {
        self.catalog_url = Some(url);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - The default catalog URL does not parse.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> anyhow::Result<CatalogClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let catalog_url = if let Some(url) = self.catalog_url {
            url
        } else {
            Url::parse(DEFAULT_CATALOG_URL).context("invalid default catalog URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(CatalogClient {
            http_client,
            catalog_url,
        })
    }
}

impl CatalogClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::new()
    }

    /// Returns the catalog URL this client downloads from.
    #[must_use]
    pub const fn catalog_url(&self) -> &Url {
        &self.catalog_url
    }
}

impl CatalogApi for CatalogClient {
    #[instrument(skip_all)]
    async fn fetch_catalog(&self) -> Result<Vec<u8>, CatalogError> {
        tracing::debug!(url = %self.catalog_url, "catalog request");

        let response = self
            .http_client
            .get(self.catalog_url.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status { status });
        }

        let body = response.bytes().await?.to_vec();
        validate_catalog(&body).map_err(CatalogError::InvalidCatalog)?;

        tracing::debug!(bytes = body.len(), "catalog downloaded");
        Ok(body)
    }
}
