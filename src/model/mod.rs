//! Session-backed page models.

pub mod search;

pub use search::{run_search, SearchForm};
