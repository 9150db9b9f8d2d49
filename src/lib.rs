//! Support library for legacy sites.
//!
//! Bundles the request-handling chores the old marketing sites share:
//!
//! - form security guards: CSRF tokens, a honeypot trap, reCAPTCHA
//! - a country firewall backed by a remote geolocation API
//! - per-visitor session state behind a cookie
//! - typed request-parameter access
//! - thin async clients for the T3 and WebApi number catalogs and the
//!   ABN business registry
//! - outbound email with web-form metadata headers
//!
//! Everything hangs off an [`App`] built once from [`KitConfig`]; the
//! session and firewall layers plug into axum as middleware, the rest is
//! called from handlers.

// Core plumbing
pub mod app;
pub mod config;
pub mod http;
pub mod input;
pub mod session;

// Guards
pub mod security;

// Remote services
pub mod abn;
pub mod catalog;
pub mod mail;

// Page support
pub mod html;
pub mod model;

// Cross-cutting concerns
pub mod observability;

pub use app::App;
pub use config::{load_config, KitConfig};
pub use input::RequestInput;
pub use security::firewall::{firewall_middleware, Firewall};
pub use security::Deny;
pub use session::{session_middleware, SessionHandle, SessionStore};
