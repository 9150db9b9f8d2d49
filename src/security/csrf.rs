//! CSRF token issuance and verification.
//!
//! One 32-byte random token per session, generated on first access and
//! hex-encoded. Submitted tokens are compared in constant time.

use hex_simd::AsciiCase;
use rand::Rng;
use subtle::ConstantTimeEq;

use crate::html;
use crate::input::RequestInput;
use crate::session::SessionHandle;

/// Form field carrying the token.
pub const FIELD_NAME: &str = "csrf";

/// Session key the token lives under.
const SESSION_KEY: &str = "csrf";

const TOKEN_BYTES: usize = 32;

/// The session's CSRF token, issuing one on first access.
pub fn token(session: &SessionHandle) -> String {
    if let Some(existing) = session.get::<String>(SESSION_KEY) {
        return existing;
    }

    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill(&mut bytes[..]);
    let token = hex_simd::encode_to_string(bytes, AsciiCase::Lower);

    session.set(SESSION_KEY, &token);
    token
}

/// Hidden form field carrying the session's token.
pub fn hidden_field(session: &SessionHandle) -> String {
    format!(
        "<input type=\"hidden\" name=\"{FIELD_NAME}\" value=\"{}\">",
        html::escape(&token(session))
    )
}

/// Check the submitted token against the session's token.
///
/// Missing submissions fail; comparison is constant-time.
pub fn verify(session: &SessionHandle, input: &RequestInput) -> bool {
    let submitted = input.raw(FIELD_NAME).unwrap_or_default();
    let expected = token(session);

    expected.as_bytes().ct_eq(submitted.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::session::SessionStore;
    use std::sync::Arc;

    fn session() -> SessionHandle {
        let store = Arc::new(SessionStore::new(&SessionConfig::default()));
        store.open(None).0
    }

    #[test]
    fn token_is_stable_within_a_session() {
        let session = session();
        let first = token(&session);
        let second = token(&session);
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_differ_between_sessions() {
        assert_ne!(token(&session()), token(&session()));
    }

    #[test]
    fn matching_submission_verifies() {
        let session = session();
        let input = RequestInput::from_pairs([(FIELD_NAME, token(&session))]);
        assert!(verify(&session, &input));
    }

    #[test]
    fn single_character_difference_is_rejected() {
        let session = session();
        let mut tampered = token(&session);
        let flipped = if tampered.ends_with('0') { '1' } else { '0' };
        tampered.pop();
        tampered.push(flipped);

        let input = RequestInput::from_pairs([(FIELD_NAME, tampered)]);
        assert!(!verify(&session, &input));
    }

    #[test]
    fn missing_submission_is_rejected() {
        let session = session();
        token(&session);
        let input = RequestInput::from_pairs([] as [(&str, &str); 0]);
        assert!(!verify(&session, &input));
    }

    #[test]
    fn hidden_field_embeds_the_token() {
        let session = session();
        let field = hidden_field(&session);
        assert!(field.contains(&token(&session)));
        assert!(field.starts_with("<input type=\"hidden\""));
    }
}
