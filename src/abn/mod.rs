//! ABN registry lookups.
//!
//! The Australian Business Register exposes an XML search endpoint. A
//! lookup either yields the business details or, when the registry
//! reports an exception (unknown ABN, bad GUID), an all-empty record —
//! the legacy sites render that as "not found" rather than erroring.

use roxmltree::{Document, Node};
use thiserror::Error;

use crate::config::AbnLookupConfig;
use crate::http::{ApiClient, HttpError};

/// Errors raised by registry lookups.
#[derive(Debug, Error)]
pub enum AbnError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("registry returned malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// Entity classification from the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityType {
    pub code: String,
    pub description: String,
}

/// Personal legal name attached to the ABN.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalName {
    pub given: String,
    pub other_given: String,
    pub family: String,
}

/// An organisation name with its effective date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessName {
    pub organisation: String,
    pub effective_from: String,
}

/// Details for one ABN.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbnDetails {
    pub statement: String,
    pub abn: String,
    pub current: String,
    pub asic_number: String,
    pub entity_type: EntityType,
    pub legal_name: LegalName,
    pub main_name: BusinessName,
    pub trade_name: BusinessName,
}

impl AbnDetails {
    /// True when the registry reported nothing for the ABN.
    pub fn is_empty(&self) -> bool {
        self.abn.is_empty()
    }
}

/// Client for the ABN registry.
#[derive(Debug, Clone)]
pub struct AbnClient {
    config: AbnLookupConfig,
    client: ApiClient,
}

impl AbnClient {
    pub fn new(config: &AbnLookupConfig, client: ApiClient) -> Self {
        Self {
            config: config.clone(),
            client,
        }
    }

    /// Look up the details for an ABN.
    pub async fn lookup(&self, abn: &str) -> Result<AbnDetails, AbnError> {
        let body = self
            .client
            .get_text(
                &self.config.endpoint,
                &[
                    ("searchString", abn),
                    ("includeHistoricalDetails", "Y"),
                    ("authenticationGuid", self.config.api_key.as_str()),
                ],
            )
            .await?;

        Ok(parse_response(&body)?)
    }
}

/// Decode the registry's XML payload.
///
/// Matching is by local tag name only; the registry wraps the payload in
/// a versioned namespace.
pub fn parse_response(xml: &str) -> Result<AbnDetails, roxmltree::Error> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    let response = find_element(root, "response").unwrap_or(root);

    if find_element(response, "exception").is_some() {
        return Ok(AbnDetails::default());
    }

    let mut details = AbnDetails {
        statement: text_of(response, "usageStatement"),
        asic_number: text_of(response, "ASICNumber"),
        ..AbnDetails::default()
    };

    if let Some(abn) = find_element(response, "ABN") {
        details.abn = text_of(abn, "identifierValue");
        details.current = text_of(abn, "isCurrentIndicator");
    }

    if let Some(entity_type) = find_element(response, "entityType") {
        details.entity_type = EntityType {
            code: text_of(entity_type, "entityTypeCode"),
            description: text_of(entity_type, "entityDescription"),
        };
    }

    if let Some(legal_name) = find_element(response, "legalName") {
        details.legal_name = LegalName {
            given: text_of(legal_name, "givenName"),
            other_given: text_of(legal_name, "otherGivenName"),
            family: text_of(legal_name, "familyName"),
        };
    }

    if let Some(main_name) = find_element(response, "mainName") {
        details.main_name = business_name(main_name);
    }

    if let Some(trade_name) = find_element(response, "mainTradingName") {
        details.trade_name = business_name(trade_name);
    }

    Ok(details)
}

fn business_name(scope: Node<'_, '_>) -> BusinessName {
    BusinessName {
        organisation: text_of(scope, "organisationName"),
        effective_from: text_of(scope, "effectiveFrom"),
    }
}

fn find_element<'a, 'input>(scope: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    scope
        .descendants()
        .find(|node| node.is_element() && node.tag_name().name() == tag)
}

fn text_of(scope: Node<'_, '_>, tag: &str) -> String {
    find_element(scope, tag)
        .and_then(|node| node.text())
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOUND: &str = r#"<?xml version="1.0" encoding="utf-8"?>
        <ABRPayloadSearchResults xmlns="http://abr.business.gov.au/ABRXMLSearch/">
          <response>
            <usageStatement>For the use of the requester only</usageStatement>
            <businessEntity>
              <ABN>
                <identifierValue>53004085616</identifierValue>
                <isCurrentIndicator>Y</isCurrentIndicator>
              </ABN>
              <ASICNumber>004085616</ASICNumber>
              <entityType>
                <entityTypeCode>PUB</entityTypeCode>
                <entityDescription>Australian Public Company</entityDescription>
              </entityType>
              <legalName>
                <givenName>Jane</givenName>
                <otherGivenName>Q</otherGivenName>
                <familyName>Citizen</familyName>
              </legalName>
              <mainName>
                <organisationName>EXAMPLE HOLDINGS LTD</organisationName>
                <effectiveFrom>1999-11-01</effectiveFrom>
              </mainName>
              <mainTradingName>
                <organisationName>EXAMPLE</organisationName>
                <effectiveFrom>2000-01-01</effectiveFrom>
              </mainTradingName>
            </businessEntity>
          </response>
        </ABRPayloadSearchResults>"#;

    const NOT_FOUND: &str = r#"<?xml version="1.0" encoding="utf-8"?>
        <ABRPayloadSearchResults xmlns="http://abr.business.gov.au/ABRXMLSearch/">
          <response>
            <exception>
              <exceptionDescription>Search text is not a valid ABN or ACN</exceptionDescription>
              <exceptionCode>WEBSERVICES</exceptionCode>
            </exception>
          </response>
        </ABRPayloadSearchResults>"#;

    #[test]
    fn parses_a_found_business() {
        let details = parse_response(FOUND).unwrap();
        assert_eq!(details.abn, "53004085616");
        assert_eq!(details.current, "Y");
        assert_eq!(details.asic_number, "004085616");
        assert_eq!(details.entity_type.code, "PUB");
        assert_eq!(details.legal_name.family, "Citizen");
        assert_eq!(details.main_name.organisation, "EXAMPLE HOLDINGS LTD");
        assert_eq!(details.trade_name.effective_from, "2000-01-01");
        assert!(!details.is_empty());
    }

    #[test]
    fn exception_yields_empty_details() {
        let details = parse_response(NOT_FOUND).unwrap();
        assert_eq!(details, AbnDetails::default());
        assert!(details.is_empty());
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse_response("<unclosed").is_err());
    }
}
