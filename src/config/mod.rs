//! Configuration layer: schema, loading, validation.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AbnLookupConfig, BlockConfig, CatalogConfig, EndpointConfig, FirewallConfig, FormConfig,
    HttpConfig, Ip2LocConfig, KitConfig, LogConfig, RecaptchaConfig, SessionConfig, SmtpConfig,
};
pub use validation::{validate_config, ValidationError};
