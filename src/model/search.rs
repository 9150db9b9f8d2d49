//! Session-backed number-search state.
//!
//! The search form's prefix and suffix fields live in the visitor's
//! session so the form survives navigation. Results come from the WebApi
//! catalog; suffixes shorter than six digits skip the exact-match lookup
//! and only fetch suggestions.

use crate::catalog::{SearchOutcome, WebApiClient};
use crate::http::HttpError;
use crate::input::RequestInput;
use crate::session::SessionHandle;

const PREFIX_KEY: &str = "search.form.prefix";
const SUFFIX_KEY: &str = "search.form.suffix";

/// Prefixes offered when the visitor has not chosen any.
pub const DEFAULT_PREFIXES: [u32; 2] = [1300, 1800];

/// Shortest suffix worth an exact-match lookup.
pub const MIN_SUFFIX_LEN: usize = 6;

/// The search form's persisted field values.
#[derive(Debug, Clone)]
pub struct SearchForm {
    session: SessionHandle,
}

impl SearchForm {
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }

    /// Selected number prefixes.
    pub fn prefixes(&self) -> Vec<u32> {
        self.session
            .get(PREFIX_KEY)
            .unwrap_or_else(|| DEFAULT_PREFIXES.to_vec())
    }

    /// Whether a prefix is currently selected. Handy for rendering
    /// checkboxes and radios.
    pub fn has_prefix(&self, prefix: u32) -> bool {
        self.prefixes().contains(&prefix)
    }

    pub fn set_prefixes(&self, prefixes: &[u32]) {
        self.session.set(PREFIX_KEY, prefixes);
    }

    /// Full or partial number suffix.
    pub fn suffix(&self) -> String {
        self.session.get_or(SUFFIX_KEY, String::new())
    }

    pub fn set_suffix(&self, suffix: &str) {
        self.session.set(SUFFIX_KEY, suffix);
    }

    /// Update fields from the current request, leaving absent fields
    /// untouched.
    pub fn update_from_request(&self, input: &RequestInput) {
        if input.exists("prefix") {
            self.set_prefixes(&input.u32_list("prefix"));
        }

        if input.exists("suffix") {
            self.set_suffix(&input.str_param_or("suffix", ""));
        }
    }
}

/// Run the search the form currently describes.
///
/// Exact results are only looked up for full suffixes; suggestions are
/// always fetched.
pub async fn run_search(
    webapi: &WebApiClient,
    form: &SearchForm,
) -> Result<SearchOutcome, HttpError> {
    let prefixes = form.prefixes();
    let suffix = form.suffix();

    if suffix.len() < MIN_SUFFIX_LEN {
        let suggestions = webapi.suggestions(&prefixes, &suffix).await?;
        return Ok(SearchOutcome {
            results: None,
            suggestions,
        });
    }

    webapi.search(&prefixes, &suffix).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::session::SessionStore;
    use std::sync::Arc;

    fn form() -> SearchForm {
        let store = Arc::new(SessionStore::new(&SessionConfig::default()));
        SearchForm::new(store.open(None).0)
    }

    #[test]
    fn defaults_before_any_submission() {
        let form = form();
        assert_eq!(form.prefixes(), vec![1300, 1800]);
        assert_eq!(form.suffix(), "");
        assert!(form.has_prefix(1800));
        assert!(!form.has_prefix(13));
    }

    #[test]
    fn submitted_fields_overwrite_session_state() {
        let form = form();
        form.update_from_request(&RequestInput::from_pairs([
            ("prefix", "1800"),
            ("suffix", "133887"),
        ]));

        assert_eq!(form.prefixes(), vec![1800]);
        assert_eq!(form.suffix(), "133887");
    }

    #[test]
    fn absent_fields_are_preserved() {
        let form = form();
        form.set_prefixes(&[1300]);
        form.set_suffix("224636");

        form.update_from_request(&RequestInput::from_pairs([("unrelated", "1")]));

        assert_eq!(form.prefixes(), vec![1300]);
        assert_eq!(form.suffix(), "224636");
    }

    #[test]
    fn bracket_style_prefix_submission() {
        let form = form();
        form.update_from_request(&RequestInput::from_pairs([
            ("prefix[]", "1300"),
            ("prefix[]", "1800"),
        ]));
        assert_eq!(form.prefixes(), vec![1300, 1800]);
    }
}
