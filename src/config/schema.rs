//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the library.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the library.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct KitConfig {
    /// Session store settings (cookie name, expiry).
    pub session: SessionConfig,

    /// Country firewall settings.
    pub firewall: FirewallConfig,

    /// Form security settings (reCAPTCHA keys).
    pub form: FormConfig,

    /// ABN registry lookup settings.
    pub abn_lookup: AbnLookupConfig,

    /// Number catalog backends (T3 and WebApi).
    pub catalog: CatalogConfig,

    /// Outbound HTTP client settings.
    pub http: HttpConfig,

    /// SMTP settings for outbound mail.
    pub smtp: SmtpConfig,

    /// Logging settings.
    pub log: LogConfig,
}

/// Session store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the session cookie.
    pub cookie_name: String,

    /// Seconds of inactivity before a session expires.
    pub ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "legacykit_session".to_string(),
            ttl_secs: 1800,
        }
    }
}

/// Country firewall configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FirewallConfig {
    /// 2 or 3 letter country codes to ban, in evaluation order.
    pub banned_countries: Vec<String>,

    /// Response sent when a request is blocked.
    pub block: BlockConfig,

    /// Geolocation API used to resolve IPs to countries.
    pub ip2loc: Ip2LocConfig,
}

/// Response sent by the deny action.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockConfig {
    /// HTTP status code for blocked requests.
    pub code: u16,

    /// Message body sent with the status.
    pub message: String,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            code: 403,
            message: "Forbidden".to_string(),
        }
    }
}

/// Geolocation API access.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Ip2LocConfig {
    /// API key issued by the geolocation provider.
    pub api_key: String,

    /// Lookup endpoint.
    pub endpoint: String,
}

impl Default for Ip2LocConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "https://api.ipgeolocation.io/ipgeo".to_string(),
        }
    }
}

/// Form security configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FormConfig {
    pub recaptcha: RecaptchaConfig,
}

/// reCAPTCHA keys and verification endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RecaptchaConfig {
    /// Site key embedded in the widget markup.
    pub site_key: String,

    /// Secret sent with verification requests.
    pub secret: String,

    /// Provider verification endpoint.
    pub verify_url: String,
}

impl Default for RecaptchaConfig {
    fn default() -> Self {
        Self {
            site_key: String::new(),
            secret: String::new(),
            verify_url: "https://www.google.com/recaptcha/api/siteverify".to_string(),
        }
    }
}

/// ABN registry lookup access.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AbnLookupConfig {
    /// GUID issued by the registry for authentication.
    pub api_key: String,

    /// Search-by-ABN endpoint.
    pub endpoint: String,
}

impl Default for AbnLookupConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "https://abr.business.gov.au/abrxmlsearch/AbrXmlSearch.asmx/ABRSearchByABN"
                .to_string(),
        }
    }
}

/// Number catalog backends.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// T3 catalog service.
    pub t3: EndpointConfig,

    /// WebApi catalog service.
    pub webapi: EndpointConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            t3: EndpointConfig {
                base_url: "https://portal.tbill.live/numbers-service-impl/api/".to_string(),
            },
            webapi: EndpointConfig {
                base_url: "https://api.telcoworksgroup.com.au/".to_string(),
            },
        }
    }
}

/// A single remote API base URL.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct EndpointConfig {
    pub base_url: String,
}

/// Outbound HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// SMTP relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// Relay hostname.
    pub host: String,

    /// Relay port.
    pub port: u16,

    /// Optional relay credentials.
    pub username: String,
    pub password: String,

    /// Default From address when a message does not set one.
    pub from: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 25,
            username: String::new(),
            password: String::new(),
            from: String::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Path of the flat event log file. Empty disables the file log.
    pub file: String,

    /// Log level filter (trace, debug, info, warn, error).
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: "legacy.log".to_string(),
            level: "info".to_string(),
        }
    }
}
