//! Outbound HTTP client and response helpers.

pub mod client;
pub mod response;

pub use client::{ApiClient, HttpError};
