//! Channel catalog library for tvhouse.
//!
//! Fetches the remote channel catalog, keeps a local JSON cache of it,
//! and falls back to a catalog bundled with the application.

mod api;
mod channel;
mod client;
mod error;
mod loader;
mod parse;

#[allow(clippy::module_name_repetitions)]
pub use api::{CatalogApi, LocalCatalogApi};
pub use channel::{Channel, IconSource, find_channel};
#[allow(clippy::module_name_repetitions)]
pub use client::{CatalogClient, CatalogClientBuilder, DEFAULT_CATALOG_URL};
#[allow(clippy::module_name_repetitions)]
pub use error::CatalogError;
#[allow(clippy::module_name_repetitions)]
pub use loader::{
    CACHE_FILE_NAME, CatalogLoader, CatalogSource, DEFAULT_FETCH_TIMEOUT, LoadedCatalog,
};
pub use parse::{BUNDLED_CATALOG, bundled_channels, parse_catalog};
