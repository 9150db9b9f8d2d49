//! Application state wiring.
//!
//! One [`App`] is built from configuration at startup and cloned into
//! axum state and handlers. It owns every shared service: the outbound
//! client, session store, firewall, event log, mailer and the remote API
//! clients.

use std::path::Path;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::abn::AbnClient;
use crate::catalog::{T3Client, WebApiClient};
use crate::config::KitConfig;
use crate::http::{response, ApiClient};
use crate::input::RequestInput;
use crate::mail::{MailError, Mailer};
use crate::observability::EventLog;
use crate::security::firewall::Firewall;
use crate::security::{csrf, honeypot, recaptcha};
use crate::session::{SessionHandle, SessionStore};

/// Errors raised while assembling the application state.
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Http(#[from] crate::http::HttpError),

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error("failed to open event log: {0}")]
    EventLog(#[from] std::io::Error),
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct App {
    pub config: Arc<KitConfig>,
    pub client: ApiClient,
    pub sessions: Arc<SessionStore>,
    pub firewall: Arc<Firewall>,
    pub events: Arc<EventLog>,
    pub mailer: Arc<Mailer>,
    pub t3: T3Client,
    pub webapi: WebApiClient,
    pub abn: AbnClient,
}

impl App {
    /// Build every subsystem from a validated configuration.
    pub fn from_config(config: KitConfig) -> Result<Self, InitError> {
        let client = ApiClient::new(&config.http)?;

        let events = if config.log.file.is_empty() {
            EventLog::disabled()
        } else {
            EventLog::open(Path::new(&config.log.file))?
        };

        let app = Self {
            client: client.clone(),
            sessions: Arc::new(SessionStore::new(&config.session)),
            firewall: Arc::new(Firewall::new(config.firewall.clone())),
            events: Arc::new(events),
            mailer: Arc::new(Mailer::from_config(&config.smtp)?),
            t3: T3Client::new(&config.catalog.t3, client.clone()),
            webapi: WebApiClient::new(&config.catalog.webapi, client.clone()),
            abn: AbnClient::new(&config.abn_lookup, client),
            config: Arc::new(config),
        };

        tracing::info!(
            banned_countries = app.firewall.banned_countries().len(),
            "Application state initialized"
        );

        Ok(app)
    }

    /// Deny the request when the CSRF token is missing or wrong.
    pub fn require_csrf(
        &self,
        session: &SessionHandle,
        input: &RequestInput,
    ) -> Result<(), Response> {
        if csrf::verify(session, input) {
            Ok(())
        } else {
            Err(self
                .firewall
                .block(&self.events, input.remote_ip())
                .into_response())
        }
    }

    /// Deny the request when the honeypot field is missing or filled.
    pub fn require_honeypot(&self, input: &RequestInput) -> Result<(), Response> {
        if honeypot::is_clean(input) {
            Ok(())
        } else {
            Err(self
                .firewall
                .block(&self.events, input.remote_ip())
                .into_response())
        }
    }

    /// Deny the request unless the provider confirms the challenge.
    /// Verification transport failures surface as 500s.
    pub async fn require_recaptcha(&self, input: &RequestInput) -> Result<(), Response> {
        match recaptcha::verify(&self.client, &self.config.form.recaptcha, input).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(self
                .firewall
                .block(&self.events, input.remote_ip())
                .into_response()),
            Err(error) => {
                tracing::error!(%error, "reCAPTCHA verification call failed");
                Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
            }
        }
    }

    /// Send the visitor elsewhere instead of denying when the challenge
    /// fails. Used by flows that bounce back to the form.
    pub async fn redirect_if_invalid_recaptcha(
        &self,
        input: &RequestInput,
        url: &str,
    ) -> Result<(), Response> {
        match self.require_recaptcha(input).await {
            Ok(()) => Ok(()),
            Err(denied) if denied.status() == StatusCode::INTERNAL_SERVER_ERROR => Err(denied),
            Err(_) => Err(response::redirect(url, None, StatusCode::SEE_OTHER)),
        }
    }
}
