//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees syntactically.
//! Validation is a pure function over the whole config and returns every
//! error found, not just the first.

use thiserror::Error;
use url::Url;

use crate::config::schema::KitConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("firewall.block.code {0} is not a valid HTTP status")]
    BlockCode(u16),

    #[error("banned country code '{0}' must be 2 or 3 ASCII letters")]
    CountryCode(String),

    #[error("http.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("session.ttl_secs must be greater than zero")]
    ZeroSessionTtl,

    #[error("session.cookie_name must not be empty")]
    EmptyCookieName,

    #[error("{field} '{value}' is not a valid URL")]
    BadUrl { field: &'static str, value: String },
}

/// Validate a configuration, collecting all errors.
pub fn validate_config(config: &KitConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !(100..=599).contains(&config.firewall.block.code) {
        errors.push(ValidationError::BlockCode(config.firewall.block.code));
    }

    for code in &config.firewall.banned_countries {
        let len_ok = (2..=3).contains(&code.len());
        if !len_ok || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
            errors.push(ValidationError::CountryCode(code.clone()));
        }
    }

    if config.http.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.http.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }

    if config.session.ttl_secs == 0 {
        errors.push(ValidationError::ZeroSessionTtl);
    }
    if config.session.cookie_name.is_empty() {
        errors.push(ValidationError::EmptyCookieName);
    }

    check_url(&mut errors, "firewall.ip2loc.endpoint", &config.firewall.ip2loc.endpoint);
    check_url(&mut errors, "form.recaptcha.verify_url", &config.form.recaptcha.verify_url);
    check_url(&mut errors, "abn_lookup.endpoint", &config.abn_lookup.endpoint);
    check_url(&mut errors, "catalog.t3.base_url", &config.catalog.t3.base_url);
    check_url(&mut errors, "catalog.webapi.base_url", &config.catalog.webapi.base_url);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if Url::parse(value).is_err() {
        errors.push(ValidationError::BadUrl {
            field,
            value: value.to_string(),
        });
    }
}
