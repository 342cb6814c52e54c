//! SMTP delivery of "contact saved" alerts.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
  AsyncSmtpTransport, AsyncTransport as _, Message, Tokio1Executor,
  message::{Mailbox, header::ContentType},
  transport::smtp::client::{Tls, TlsParameters},
};
use rolodex_core::notify::{MailNotifier, NotifyError};
use thiserror::Error;
use uuid::Uuid;

use crate::{MailConfig, MailTls};

#[derive(Debug, Error)]
pub enum MailError {
  #[error("invalid `{field}` mailbox: {source}")]
  Address {
    field:  &'static str,
    #[source]
    source: lettre::address::AddressError,
  },

  #[error("SMTP transport error: {0}")]
  Transport(#[from] lettre::transport::smtp::Error),

  #[error("message build error: {0}")]
  Message(#[from] lettre::error::Error),
}

/// Body line of the alert sent for `contact_id`.
pub fn alert_body(contact_id: Uuid) -> String { format!("Contact with id:{contact_id} was updated") }

// ─── SmtpNotifier ─────────────────────────────────────────────────────────────

/// Sends one plain-text alert per saved contact through a relay.
///
/// The relay's certificate is not validated.
pub struct SmtpNotifier {
  transport: AsyncSmtpTransport<Tokio1Executor>,
  from:      Mailbox,
  to:        Mailbox,
  subject:   String,
}

impl SmtpNotifier {
  /// Parse the mailboxes and configure the transport. No connection is made
  /// until the first alert.
  pub fn new(config: &MailConfig) -> Result<Self, MailError> {
    let from = parse_mailbox("from", &config.from)?;
    let to = parse_mailbox("to", &config.to)?;

    let tls = match config.tls {
      MailTls::None => Tls::None,
      MailTls::Opportunistic => Tls::Opportunistic(tls_parameters(&config.relay_host)?),
      MailTls::Required => Tls::Required(tls_parameters(&config.relay_host)?),
      MailTls::Wrapper => Tls::Wrapper(tls_parameters(&config.relay_host)?),
    };

    let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.relay_host)
      .port(config.relay_port)
      .tls(tls)
      .timeout(Some(Duration::from_secs(config.timeout_secs)))
      .build();

    Ok(Self { transport, from, to, subject: config.subject.clone() })
  }

  /// Build the alert for `contact_id` without sending it.
  pub fn compose(&self, contact_id: Uuid) -> Result<Message, MailError> {
    let message = Message::builder()
      .from(self.from.clone())
      .to(self.to.clone())
      .subject(&self.subject)
      .header(ContentType::TEXT_PLAIN)
      .body(alert_body(contact_id))?;
    Ok(message)
  }
}

fn parse_mailbox(field: &'static str, value: &str) -> Result<Mailbox, MailError> {
  value.parse().map_err(|source| MailError::Address { field, source })
}

fn tls_parameters(host: &str) -> Result<TlsParameters, MailError> {
  let params = TlsParameters::builder(host.to_owned())
    .dangerous_accept_invalid_certs(true)
    .build()?;
  Ok(params)
}

#[async_trait]
impl MailNotifier for SmtpNotifier {
  async fn contact_saved(&self, contact_id: Uuid) -> Result<(), NotifyError> {
    let message = self.compose(contact_id).map_err(NotifyError::new)?;
    self.transport.send(message).await.map_err(NotifyError::new)?;
    tracing::info!(%contact_id, "sent contact alert");
    Ok(())
  }
}

// ─── DisabledNotifier ─────────────────────────────────────────────────────────

/// Stand-in used when `mail.enabled` is false.
pub struct DisabledNotifier;

#[async_trait]
impl MailNotifier for DisabledNotifier {
  async fn contact_saved(&self, contact_id: Uuid) -> Result<(), NotifyError> {
    tracing::debug!(%contact_id, "mail disabled, alert not sent");
    Ok(())
  }
}
