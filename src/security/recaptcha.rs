//! reCAPTCHA rendering and verification.
//!
//! Verification forwards the challenge response and the configured secret
//! to the provider over HTTPS. Only an explicit `success` flag in the
//! decoded reply passes; everything else fails closed. Transport errors
//! propagate like any other remote API failure.

use serde::Deserialize;

use crate::config::RecaptchaConfig;
use crate::html;
use crate::http::{ApiClient, HttpError};
use crate::input::RequestInput;

/// Form field the provider's widget posts back.
pub const RESPONSE_FIELD: &str = "g-recaptcha-response";

/// Decoded verification reply. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

/// Script tag and widget markup for embedding the challenge in a page.
pub fn widget_html(config: &RecaptchaConfig) -> String {
    format!(
        "<script src=\"https://www.google.com/recaptcha/api.js\" async defer></script>\n\
         <div class=\"g-recaptcha\" data-sitekey=\"{}\"></div>",
        html::escape(&config.site_key)
    )
}

/// Verify the submitted challenge response with the provider.
pub async fn verify(
    client: &ApiClient,
    config: &RecaptchaConfig,
    input: &RequestInput,
) -> Result<bool, HttpError> {
    let response = input.str_param_or(RESPONSE_FIELD, "");

    let reply: VerifyResponse = client
        .post_form(
            &config.verify_url,
            &[
                ("secret", config.secret.as_str()),
                ("response", response.as_str()),
            ],
        )
        .await?;

    if !reply.success && !reply.error_codes.is_empty() {
        tracing::debug!(errors = ?reply.error_codes, "reCAPTCHA verification rejected");
    }

    Ok(reply.success)
}
