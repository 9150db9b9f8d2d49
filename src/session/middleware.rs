//! Session cookie middleware.
//!
//! Opens (or starts) the visitor's session before the handler runs,
//! injects a [`SessionHandle`] into request extensions and sets the
//! session cookie on the way out when a new session was started.

use axum::body::Body;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use cookie::{Cookie, SameSite};
use uuid::Uuid;

use crate::app::App;
use crate::session::SessionHandle;

/// Extract the session id from the Cookie header, if any.
fn session_id(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    Cookie::split_parse(raw)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == cookie_name)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

fn session_cookie(cookie_name: &str, id: Uuid) -> Cookie<'static> {
    Cookie::build((cookie_name.to_string(), id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Attach the visitor's session to the request.
pub async fn session_middleware(
    State(app): State<App>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let cookie_name = &app.config.session.cookie_name;
    let id = session_id(req.headers(), cookie_name);
    let (session, started) = app.sessions.open(id);
    let new_id = session.id();

    req.extensions_mut().insert(session);
    let mut response = next.run(req).await;

    if started {
        let cookie = session_cookie(cookie_name, new_id);
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(error) => {
                tracing::error!(%error, "Failed to encode session cookie");
            }
        }
    }

    response
}

impl<S> FromRequestParts<S> for SessionHandle
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionHandle>()
            .cloned()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}
