//! Response helpers for legacy page flows.

use axum::body::Body;
use axum::http::{header, HeaderValue, Response, StatusCode};

use crate::input::RequestInput;

/// Expired date used to defeat caches on ancient proxies.
const EXPIRES_IN_THE_PAST: &str = "Sun, 01 Jan 2014 00:00:00 GMT";

/// Build a redirect response, optionally re-appending the inbound query
/// string to the target URL.
pub fn redirect(url: &str, preserve_from: Option<&RequestInput>, status: StatusCode) -> Response<Body> {
    let mut target = url.to_string();

    if let Some(input) = preserve_from {
        if let Some(query) = input.query() {
            if !query.is_empty() {
                target.push(if target.contains('?') { '&' } else { '?' });
                target.push_str(query);
            }
        }
    }

    let location = HeaderValue::from_str(&target)
        .unwrap_or_else(|_| HeaderValue::from_static("/"));

    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response.headers_mut().insert(header::LOCATION, location);
    response
}

/// Stamp cache-suppression headers onto a response.
pub fn disable_cache<B>(response: &mut Response<B>) {
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("max-age=0, no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static(EXPIRES_IN_THE_PAST));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_appends_query_string() {
        let input = RequestInput::from_pairs([("page", "2"), ("q", "abc")]);
        let response = redirect("/next", Some(&input), StatusCode::MOVED_PERMANENTLY);

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/next?page=2&q=abc"
        );
    }

    #[test]
    fn redirect_extends_existing_query() {
        let input = RequestInput::from_pairs([("a", "1")]);
        let response = redirect("/next?x=9", Some(&input), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/next?x=9&a=1");
    }

    #[test]
    fn redirect_without_preservation() {
        let response = redirect("/gone", None, StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/gone");
    }

    #[test]
    fn cache_suppression_headers() {
        let mut response = Response::new(Body::empty());
        disable_cache(&mut response);
        assert!(response.headers().contains_key(header::CACHE_CONTROL));
        assert_eq!(response.headers()[header::PRAGMA], "no-cache");
    }
}
