//! Outbound email.
//!
//! Messages that contain markup are sent as HTML, the rest as plain
//! text. Web-form notifications carry `X-WebForm-*` headers describing
//! the submitting request so abuse reports can be traced.

use std::str::FromStr;

use lettre::message::header::{HeaderName, HeaderValue};
use lettre::message::{Mailbox, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::config::SmtpConfig;
use crate::html;
use crate::input::RequestInput;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[a-zA-Z/!][^>]*>").expect("valid pattern"));

/// Errors raised while building or sending mail.
#[derive(Debug, Error)]
pub enum MailError {
    #[error(transparent)]
    Address(#[from] lettre::address::AddressError),

    #[error(transparent)]
    Message(#[from] lettre::error::Error),

    #[error(transparent)]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// One outbound message under construction.
#[derive(Debug, Clone, Default)]
pub struct MailMessage {
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    from: Option<String>,
    reply_to: Option<String>,
    subject: String,
    body: String,
    webform: Vec<(&'static str, String)>,
}

impl MailMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to(mut self, address: &str) -> Self {
        self.to.push(address.to_string());
        self
    }

    pub fn cc(mut self, address: &str) -> Self {
        self.cc.push(address.to_string());
        self
    }

    pub fn bcc(mut self, address: &str) -> Self {
        self.bcc.push(address.to_string());
        self
    }

    pub fn from(mut self, address: &str) -> Self {
        self.from = Some(address.to_string());
        self
    }

    pub fn reply_to(mut self, address: &str) -> Self {
        self.reply_to = Some(address.to_string());
        self
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = subject.to_string();
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    /// Stamp request metadata headers onto the message.
    pub fn webform_metadata(mut self, input: &RequestInput) -> Self {
        self.webform = vec![
            ("X-WebForm-Host", input.host().to_string()),
            ("X-WebForm-Referrer", input.referrer().to_string()),
            ("X-WebForm-UserAgent", input.user_agent().to_string()),
            ("X-WebForm-RemoteIP", input.remote_ip_display()),
            ("X-WebForm-URI", input.uri().to_string()),
        ];
        self
    }

    /// Markup in the body switches the message to HTML.
    fn is_html(&self) -> bool {
        HTML_TAG.is_match(&self.body)
    }
}

/// SMTP mailer.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    default_from: String,
}

impl Mailer {
    /// Build the mailer from SMTP settings. Credentials switch the
    /// transport to an authenticated TLS relay.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, MailError> {
        let transport = if config.username.is_empty() {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.as_str())
                .port(config.port)
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
                .port(config.port)
                .credentials(Credentials::new(
                    config.username.clone(),
                    config.password.clone(),
                ))
                .build()
        };

        Ok(Self {
            transport,
            default_from: config.from.clone(),
        })
    }

    /// Send one message.
    pub async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        let from = message
            .from
            .clone()
            .unwrap_or_else(|| self.default_from.clone());

        let mut builder = Message::builder()
            .from(Mailbox::from_str(&from)?)
            .subject(message.subject.clone());

        for address in &message.to {
            builder = builder.to(Mailbox::from_str(address)?);
        }
        for address in &message.cc {
            builder = builder.cc(Mailbox::from_str(address)?);
        }
        for address in &message.bcc {
            builder = builder.bcc(Mailbox::from_str(address)?);
        }
        if let Some(reply_to) = &message.reply_to {
            builder = builder.reply_to(Mailbox::from_str(reply_to)?);
        }

        let part = if message.is_html() {
            SinglePart::html(message.body.clone())
        } else {
            SinglePart::plain(message.body.clone())
        };
        let mut email = builder.singlepart(part)?;

        for (name, value) in &message.webform {
            email.headers_mut().insert_raw(HeaderValue::new(
                HeaderName::new_from_ascii_str(name),
                value.clone(),
            ));
        }

        self.transport.send(email).await?;
        tracing::info!(subject = %message.subject, "Email sent");
        Ok(())
    }
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailer")
            .field("default_from", &self.default_from)
            .finish()
    }
}

/// Compose a notification body from every submitted parameter, one
/// `key - value` line each, with the remote IP appended.
pub fn compose_message_from_params(input: &RequestInput) -> String {
    let mut result = String::new();

    for (key, value) in input.params() {
        result.push_str(&html::escape(key));
        result.push_str(" - ");
        result.push_str(&html::escape(value));
        result.push('\n');
    }

    result.push_str("ip - ");
    result.push_str(&input.remote_ip_display());
    result.push('\n');

    result
}
