//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for the hosting process
//! - Default the filter from configuration, overridable via env

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogConfig;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. Safe to call once per
/// process; hosts that install their own subscriber should skip this.
pub fn init(config: &LogConfig) {
    let fallback = format!("legacykit={}", config.level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
