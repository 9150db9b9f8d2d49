//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::KitConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<KitConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse and validate configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<KitConfig, ConfigError> {
    let config: KitConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_site_config() {
        let config = parse_config(
            r#"
            [session]
            cookie_name = "example_session"
            ttl_secs = 3600

            [firewall]
            banned_countries = ["RU", "CN", "PRK"]

            [firewall.ip2loc]
            api_key = "geo-key"

            [form.recaptcha]
            site_key = "site"
            secret = "secret"

            [abn_lookup]
            api_key = "guid"

            [smtp]
            host = "mail.example.org"
            port = 587
            "#,
        )
        .unwrap();

        assert_eq!(config.session.cookie_name, "example_session");
        assert_eq!(config.firewall.banned_countries.len(), 3);
        assert_eq!(config.smtp.port, 587);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = parse_config("[firewall.block]\ncode = 9000\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = parse_config("not toml at all [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
