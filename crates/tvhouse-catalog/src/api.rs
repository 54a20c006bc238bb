//! `CatalogApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::CatalogError;

/// Remote channel catalog trait.
///
/// Abstracts the catalog download so the loader can be exercised with
/// fake sources in tests. Uses `trait_variant::make` to generate a
/// `Send`-bound async trait, which the loader needs to run the fetch
/// on a background task.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// Downloads the raw catalog document.
    ///
    /// The returned body has already been checked to be a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the endpoint answers
    /// with a non-success status, or the body is not a JSON array.
    async fn fetch_catalog(&self) -> Result<Vec<u8>, CatalogError>;
}
