//! Small HTML rendering helpers for legacy form flows.

use crate::input::RequestInput;

/// Minimal HTML entity escaping for attribute and text positions.
pub fn escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

/// Re-render every submitted parameter as a hidden input field.
///
/// Needed by multi-page legacy forms that re-post prior answers.
pub fn hidden_fields(input: &RequestInput) -> String {
    let mut result = String::new();
    for (key, value) in input.params() {
        result.push_str(&format!(
            "<input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
            escape(key),
            escape(value)
        ));
    }
    result
}
