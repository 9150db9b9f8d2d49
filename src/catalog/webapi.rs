//! WebApi catalog client.
//!
//! The newer catalog service: prefix/suffix number search returning both
//! exact results and suggestions.

use serde::de::DeserializeOwned;

use crate::catalog::t3::{decorate_all, CatalogNumber};
use crate::config::EndpointConfig;
use crate::http::{ApiClient, HttpError};

/// Exact matches and suggestions for one search.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// None when the exact-match lookup was skipped (short suffix).
    pub results: Option<Vec<CatalogNumber>>,

    pub suggestions: Vec<CatalogNumber>,
}

/// Client for the WebApi catalog service.
#[derive(Debug, Clone)]
pub struct WebApiClient {
    base_url: String,
    client: ApiClient,
}

impl WebApiClient {
    pub fn new(config: &EndpointConfig, client: ApiClient) -> Self {
        Self {
            base_url: config.base_url.clone(),
            client,
        }
    }

    /// Send a request to a resource relative to the API base.
    pub async fn send<T>(&self, resource: &str, params: &[(&str, String)]) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, resource);
        self.client.get_json(&url, params).await
    }

    fn search_params(prefixes: &[u32], suffix: &str) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = prefixes
            .iter()
            .map(|prefix| ("prefix", prefix.to_string()))
            .collect();
        params.push(("suffix", suffix.to_string()));
        params
    }

    /// Numbers exactly matching the prefixes and suffix.
    pub async fn numbers(
        &self,
        prefixes: &[u32],
        suffix: &str,
    ) -> Result<Vec<CatalogNumber>, HttpError> {
        let mut numbers: Vec<CatalogNumber> = self
            .send("numbers", &Self::search_params(prefixes, suffix))
            .await?;
        decorate_all(&mut numbers);
        Ok(numbers)
    }

    /// Close alternatives for the prefixes and suffix.
    pub async fn suggestions(
        &self,
        prefixes: &[u32],
        suffix: &str,
    ) -> Result<Vec<CatalogNumber>, HttpError> {
        let mut numbers: Vec<CatalogNumber> = self
            .send("suggestions", &Self::search_params(prefixes, suffix))
            .await?;
        decorate_all(&mut numbers);
        Ok(numbers)
    }

    /// Both exact matches and suggestions for one search.
    pub async fn search(&self, prefixes: &[u32], suffix: &str) -> Result<SearchOutcome, HttpError> {
        let results = self.numbers(prefixes, suffix).await?;
        let suggestions = self.suggestions(prefixes, suffix).await?;

        Ok(SearchOutcome {
            results: Some(results),
            suggestions,
        })
    }
}
