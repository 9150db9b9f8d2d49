//! Form-security guards and the country firewall.
//!
//! Every guard resolves failures into the same [`Deny`] action: a
//! response with a configured status and message that short-circuits the
//! request. The library cannot terminate the hosting process, so "deny"
//! is a value the caller returns, not an exit.

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::config::BlockConfig;

pub mod csrf;
pub mod firewall;
pub mod honeypot;
pub mod recaptcha;

pub use firewall::{Firewall, GeoLocation, WORST_SPAM_COUNTRIES};

/// Terminating deny action shared by all guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deny {
    pub status: StatusCode,
    pub message: String,
}

impl Deny {
    /// Build the deny action from firewall block settings.
    pub fn from_config(config: &BlockConfig) -> Self {
        Self {
            status: StatusCode::from_u16(config.code).unwrap_or(StatusCode::FORBIDDEN),
            message: config.message.clone(),
        }
    }
}

impl IntoResponse for Deny {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.message));
        *response.status_mut() = self.status;
        response
    }
}
