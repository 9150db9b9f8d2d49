//! Typed access to request parameters and server variables.
//!
//! # Responsibilities
//! - Merge query-string and urlencoded form parameters (form wins)
//! - Expose sanitising typed getters (string, integer, list)
//! - Surface connection metadata: remote IP, host, user agent, referrer
//!
//! The extractor buffers at most [`MAX_FORM_BYTES`] of body and only for
//! urlencoded submissions; anything else leaves the body untouched

use std::net::{IpAddr, SocketAddr};

use axum::body::Bytes;
use axum::extract::{ConnectInfo, FromRequest, Request};
use axum::http::{header, HeaderMap, Method, StatusCode};

/// Upper bound on buffered form bodies.
pub const MAX_FORM_BYTES: usize = 2 * 1024 * 1024;

/// Request-scoped bundle of parameters and server variables.
#[derive(Debug, Clone, Default)]
pub struct RequestInput {
    /// Query pairs first, then form pairs; lookups take the last match.
    params: Vec<(String, String)>,
    query: Option<String>,
    method: Method,
    uri: String,
    remote_ip: Option<IpAddr>,
    host: String,
    user_agent: String,
    referrer: String,
}

impl RequestInput {
    /// Build an input set from bare key/value pairs. Intended for tests and
    /// non-axum hosts.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let params: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish();

        Self {
            uri: if query.is_empty() {
                "/".to_string()
            } else {
                format!("/?{query}")
            },
            query: Some(query),
            params,
            ..Self::default()
        }
    }

    pub fn with_remote_ip(mut self, ip: IpAddr) -> Self {
        self.remote_ip = Some(ip);
        self
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn with_referrer(mut self, referrer: &str) -> Self {
        self.referrer = referrer.to_string();
        self
    }

    /// True when the parameter was submitted at all.
    pub fn exists(&self, name: &str) -> bool {
        self.raw(name).is_some()
    }

    /// Last submitted value for the parameter, unfiltered.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rev()
            .find(|(k, _)| k == name || (k.ends_with("[]") && &k[..k.len() - 2] == name))
            .map(|(_, v)| v.as_str())
    }

    /// Every submitted value for the parameter, in submission order.
    /// Matches both repeated keys and the legacy `name[]` convention.
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.params
            .iter()
            .filter(|(k, _)| k == name || (k.ends_with("[]") && &k[..k.len() - 2] == name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// String value with control characters stripped and whitespace trimmed.
    pub fn str_param(&self, name: &str) -> Option<String> {
        self.raw(name).map(sanitise)
    }

    /// String value, or a default when absent.
    pub fn str_param_or(&self, name: &str, default: &str) -> String {
        self.str_param(name)
            .unwrap_or_else(|| default.to_string())
    }

    /// Unsigned integer value; non-numeric submissions are None.
    pub fn u32_param(&self, name: &str) -> Option<u32> {
        self.raw(name).and_then(|v| v.trim().parse().ok())
    }

    /// Signed integer value; non-numeric submissions are None.
    pub fn i64_param(&self, name: &str) -> Option<i64> {
        self.raw(name).and_then(|v| v.trim().parse().ok())
    }

    /// All numeric values submitted under the name.
    pub fn u32_list(&self, name: &str) -> Vec<u32> {
        self.values(name)
            .into_iter()
            .filter_map(|v| v.trim().parse().ok())
            .collect()
    }

    /// Submitted parameters in order, sanitised.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path and query of the request, as received.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Raw query string, when one was present.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Remote peer address, when the host exposes one.
    pub fn remote_ip(&self) -> Option<IpAddr> {
        self.remote_ip
    }

    /// Remote peer address for log lines.
    pub fn remote_ip_display(&self) -> String {
        self.remote_ip
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "[unknown]".to_string())
    }

    /// Host header value, empty when missing.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// User-Agent header value, empty when missing.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Referer header value, empty when missing.
    pub fn referrer(&self) -> &str {
        &self.referrer
    }
}

/// Strip ASCII control characters and trim surrounding whitespace.
fn sanitise(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn is_urlencoded_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

fn decode_pairs(raw: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(raw)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

impl<S> FromRequest<S> for RequestInput
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();

        let query = parts.uri.query().map(str::to_string);
        let mut params = query
            .as_deref()
            .map(|q| decode_pairs(q.as_bytes()))
            .unwrap_or_default();

        // Form pairs go after query pairs so POST wins on collision.
        if is_urlencoded_form(&parts.headers) {
            let bytes: Bytes = axum::body::to_bytes(body, MAX_FORM_BYTES)
                .await
                .map_err(|_| StatusCode::PAYLOAD_TOO_LARGE)?;
            params.extend(decode_pairs(&bytes));
        }

        let remote_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        Ok(Self {
            params,
            query,
            method: parts.method.clone(),
            uri: parts
                .uri
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| parts.uri.path().to_string()),
            remote_ip,
            host: header_str(&parts.headers, header::HOST),
            user_agent: header_str(&parts.headers, header::USER_AGENT),
            referrer: header_str(&parts.headers, header::REFERER),
        })
    }
}
