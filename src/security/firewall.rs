//! Country firewall.
//!
//! Resolves the caller's IP to a country through a remote geolocation API
//! and denies the request when either the 2- or 3-letter code is on the
//! banned list. Blocks are recorded in the event log before the deny
//! action is returned.

use std::net::{IpAddr, SocketAddr};
use std::sync::RwLock;

use axum::body::Body;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::app::App;
use crate::config::FirewallConfig;
use crate::http::{ApiClient, HttpError};
use crate::observability::EventLog;
use crate::security::Deny;

/// Location info returned by the geolocation API. Unknown fields are
/// ignored; absent codes decode as empty strings and never match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoLocation {
    #[serde(default)]
    pub ip: String,

    #[serde(default)]
    pub country_code2: String,

    #[serde(default)]
    pub country_code3: String,

    #[serde(default)]
    pub country_name: String,
}

/// Country codes responsible for most automated spam and botnet traffic,
/// per Spamhaus statistics. Sites opt in via
/// [`Firewall::ban_worst_spam_countries`].
pub const WORST_SPAM_COUNTRIES: [&str; 17] = [
    "CN", "RU", "UA", "IN", "FR", "JP", "GB", "HK", "DE", "EG", "VN", "IR", "BR", "TH", "ID",
    "PA", "GG",
];

/// Country-based request firewall.
#[derive(Debug)]
pub struct Firewall {
    /// Banned codes, upper-cased, in configuration order.
    banned: RwLock<Vec<String>>,
    config: FirewallConfig,
}

impl Firewall {
    pub fn new(config: FirewallConfig) -> Self {
        let banned = config
            .banned_countries
            .iter()
            .map(|code| code.to_ascii_uppercase())
            .collect();

        Self {
            banned: RwLock::new(banned),
            config,
        }
    }

    /// Add a 2- or 3-letter country code to the banned list.
    pub fn add_banned_country(&self, code: &str) {
        self.banned
            .write()
            .expect("banned country list poisoned")
            .push(code.to_ascii_uppercase());
    }

    /// The banned codes in evaluation order.
    pub fn banned_countries(&self) -> Vec<String> {
        self.banned
            .read()
            .expect("banned country list poisoned")
            .clone()
    }

    /// Ban the [`WORST_SPAM_COUNTRIES`] in one go.
    pub fn ban_worst_spam_countries(&self) {
        let mut banned = self.banned.write().expect("banned country list poisoned");
        banned.extend(WORST_SPAM_COUNTRIES.iter().map(|code| code.to_string()));
    }

    /// Remove every banned country.
    pub fn clear_banned_countries(&self) {
        self.banned
            .write()
            .expect("banned country list poisoned")
            .clear();
    }

    /// True when either country code of the location is banned.
    pub fn matches_banned(&self, location: &GeoLocation) -> bool {
        let banned = self.banned.read().expect("banned country list poisoned");
        let code2 = location.country_code2.to_ascii_uppercase();
        let code3 = location.country_code3.to_ascii_uppercase();

        banned
            .iter()
            .any(|code| (!code2.is_empty() && *code == code2) || (!code3.is_empty() && *code == code3))
    }

    /// Look up location info for an IP address.
    pub async fn lookup_country(
        &self,
        client: &ApiClient,
        ip: IpAddr,
    ) -> Result<GeoLocation, HttpError> {
        client
            .get_json(
                &self.config.ip2loc.endpoint,
                &[
                    ("apiKey", self.config.ip2loc.api_key.clone()),
                    ("ip", ip.to_string()),
                ],
            )
            .await
    }

    /// Check whether the country for the IP is banned.
    pub async fn is_banned_country(
        &self,
        client: &ApiClient,
        ip: IpAddr,
    ) -> Result<bool, HttpError> {
        let location = self.lookup_country(client, ip).await?;
        Ok(self.matches_banned(&location))
    }

    /// The deny action, recorded against the event log.
    pub fn block(&self, events: &EventLog, ip: Option<IpAddr>) -> Deny {
        let ip = ip
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "[unknown]".to_string());
        events.notice(
            &format!("Blocked access from {ip}"),
            &[("ip", ip.clone())],
        );

        Deny::from_config(&self.config.block)
    }
}

/// Deny requests whose source country is banned.
///
/// Requests without a resolvable peer address pass through with a
/// warning. Geolocation failures surface as 500s and are left to the
/// hosting framework's error page.
pub async fn firewall_middleware(
    State(app): State<App>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if app.firewall.banned_countries().is_empty() {
        return next.run(req).await;
    }

    let Some(ip) = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
    else {
        tracing::warn!("No peer address on request, skipping country check");
        return next.run(req).await;
    };

    match app.firewall.is_banned_country(&app.client, ip).await {
        Ok(true) => app.firewall.block(&app.events, Some(ip)).into_response(),
        Ok(false) => next.run(req).await,
        Err(error) => {
            tracing::error!(%error, %ip, "Country lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
