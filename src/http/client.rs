//! Outbound HTTP client.
//!
//! # Responsibilities
//! - Execute GET/POST calls against remote JSON/XML APIs
//! - Apply connect/request timeouts from configuration
//! - Treat non-2xx responses as errors (no retries)

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::config::HttpConfig;

/// Errors raised by outbound calls.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Client construction failed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Transport failure, timeout or non-2xx status.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be decoded.
    #[error("response from {url} could not be decoded: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Thin wrapper over a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: reqwest::Client,
}

impl ApiClient {
    /// Create a client with timeouts taken from configuration.
    pub fn new(config: &HttpConfig) -> Result<Self, HttpError> {
        let inner = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_secs))
            .timeout(Duration::from_secs(config.request_secs))
            .build()
            .map_err(HttpError::Build)?;

        Ok(Self { inner })
    }

    /// GET a JSON document and decode it.
    pub async fn get_json<T, Q>(&self, url: &str, query: &Q) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .inner
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| HttpError::Request {
                url: url.to_string(),
                source,
            })?;

        tracing::debug!(method = "GET", url, status = %response.status(), "Outbound call");

        response.json().await.map_err(|source| HttpError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// GET a raw text body.
    pub async fn get_text<Q>(&self, url: &str, query: &Q) -> Result<String, HttpError>
    where
        Q: Serialize + ?Sized,
    {
        let response = self
            .inner
            .get(url)
            .query(query)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| HttpError::Request {
                url: url.to_string(),
                source,
            })?;

        tracing::debug!(method = "GET", url, status = %response.status(), "Outbound call");

        response.text().await.map_err(|source| HttpError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// POST an urlencoded form and decode the JSON response.
    pub async fn post_form<T, F>(&self, url: &str, form: &F) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
        F: Serialize + ?Sized,
    {
        let response = self
            .inner
            .post(url)
            .form(form)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| HttpError::Request {
                url: url.to_string(),
                source,
            })?;

        tracing::debug!(method = "POST", url, status = %response.status(), "Outbound call");

        response.json().await.map_err(|source| HttpError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
