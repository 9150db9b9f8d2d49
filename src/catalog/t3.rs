//! T3 catalog client.
//!
//! Forwards number queries to the T3 numbers service and decorates every
//! returned record with its alternate display formats.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::catalog::numbers::AltFormats;
use crate::config::EndpointConfig;
use crate::http::{ApiClient, HttpError};

/// Service-number types exposed by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Flash,
    LuckyDip,
}

impl ServiceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKind::Flash => "FLASH",
            ServiceKind::LuckyDip => "LUCKY_DIP",
        }
    }
}

/// Query parameters for a number listing.
#[derive(Debug, Clone)]
pub struct NumberQuery {
    /// Number prefix, e.g. "1300" or "1800".
    pub prefix: String,

    pub kind: ServiceKind,

    /// Price bounds in whole dollars.
    pub min_price: u32,
    pub max_price: u32,

    pub page: u32,
    pub page_size: u32,

    pub sort_by: String,
    pub direction: String,
}

impl Default for NumberQuery {
    fn default() -> Self {
        Self {
            prefix: "1300".to_string(),
            kind: ServiceKind::Flash,
            min_price: 0,
            max_price: 10_000,
            page: 1,
            page_size: 10_000,
            sort_by: "PRICE".to_string(),
            direction: "ASCENDING".to_string(),
        }
    }
}

/// One number record from either catalog backend.
///
/// Only the fields the sites rely on are typed; everything else the API
/// returns rides along in `meta`.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogNumber {
    pub number: String,

    #[serde(default)]
    pub word: Option<String>,

    #[serde(flatten)]
    pub meta: serde_json::Map<String, serde_json::Value>,

    #[serde(skip)]
    pub formats: AltFormats,
}

impl CatalogNumber {
    /// Fill in the alternate display formats.
    pub fn decorate(&mut self) {
        self.formats = AltFormats::derive(&self.number, self.word.as_deref());
    }
}

/// Decorate a freshly decoded batch in place.
pub fn decorate_all(numbers: &mut [CatalogNumber]) {
    for number in numbers {
        number.decorate();
    }
}

/// Client for the T3 numbers service.
#[derive(Debug, Clone)]
pub struct T3Client {
    base_url: String,
    client: ApiClient,
}

impl T3Client {
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

    /// List numbers matching the query, decorated with display formats.
    pub async fn get_numbers(&self, query: &NumberQuery) -> Result<Vec<CatalogNumber>, HttpError> {
        let mut numbers: Vec<CatalogNumber> = self
            .send(
                "Activations",
                &[
                    ("query", query.prefix.clone()),
                    ("numberTypes", "SERVICE_NUMBER".to_string()),
                    ("serviceNumberTypes", query.kind.as_str().to_string()),
                    ("minPriceDollars", query.min_price.to_string()),
                    ("maxPriceDollars", query.max_price.to_string()),
                    ("pageNum", query.page.to_string()),
                    ("pageSize", query.page_size.to_string()),
                    ("sortBy", query.sort_by.clone()),
                    ("sortDirection", query.direction.clone()),
                ],
            )
            .await?;

        decorate_all(&mut numbers);
        Ok(numbers)
    }

    /// Every 1300 and 1800 number the catalog exposes.
    pub async fn get_all_numbers(&self) -> Result<Vec<CatalogNumber>, HttpError> {
        let mut result = Vec::new();

        for prefix in ["1300", "1800"] {
            for kind in [ServiceKind::Flash, ServiceKind::LuckyDip] {
                let query = NumberQuery {
                    prefix: prefix.to_string(),
                    kind,
                    ..NumberQuery::default()
                };
                result.extend(self.get_numbers(&query).await?);
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_decode_and_decorate() {
        let mut numbers: Vec<CatalogNumber> = serde_json::from_str(
            r#"[
                {"number": "1300123456", "word": null, "priceDollars": 99},
                {"number": "1800224636", "word": "1800 CHINOS"}
            ]"#,
        )
        .unwrap();
        decorate_all(&mut numbers);

        assert_eq!(numbers[0].formats.spaced, "1300 123456");
        assert_eq!(numbers[0].formats.display, "1300 12 34 56");
        assert_eq!(numbers[0].meta["priceDollars"], 99);

        assert_eq!(numbers[1].formats.display, "1800 CHINOS");
    }

    #[test]
    fn default_query_matches_catalog_expectations() {
        let query = NumberQuery::default();
        assert_eq!(query.prefix, "1300");
        assert_eq!(query.kind.as_str(), "FLASH");
        assert_eq!(query.max_price, 10_000);
        assert_eq!(query.sort_by, "PRICE");
    }

    #[test]
    fn service_kind_wire_names() {
        assert_eq!(ServiceKind::Flash.as_str(), "FLASH");
        assert_eq!(ServiceKind::LuckyDip.as_str(), "LUCKY_DIP");
    }
}
