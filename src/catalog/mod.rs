//! Clients for the two remote number catalogs.

pub mod numbers;
pub mod t3;
pub mod webapi;

pub use numbers::AltFormats;
pub use t3::{CatalogNumber, NumberQuery, ServiceKind, T3Client};
pub use webapi::{SearchOutcome, WebApiClient};
