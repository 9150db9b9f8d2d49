//! Honeypot spam trap.
//!
//! A hidden text field with a fixed decoy name is rendered into forms.
//! Humans never see it, so a valid submission carries it back empty.
//! Bots that autofill every field, or strip the field entirely, fail.

use crate::input::RequestInput;

/// Decoy field name, kept verbatim from the sites already in production.
pub const FIELD_NAME: &str = "c67538";

/// Hidden honeypot input for embedding in a form.
pub fn hidden_field() -> String {
    format!("<input type=\"text\" name=\"{FIELD_NAME}\" value=\"\" style=\"display: none !important;\">")
}

/// True when the honeypot was submitted and is empty.
pub fn is_clean(input: &RequestInput) -> bool {
    matches!(input.raw(FIELD_NAME), Some(""))
}
