//! Post-commit notification sinks.
//!
//! Both sinks are best-effort: the service logs their failures and never
//! lets them change the outcome of the operation that triggered them.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// The signal observers receive when contact data changes. Carries no payload;
/// observers re-fetch what they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeSignal {
  Update,
}

impl ChangeSignal {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Update => "Update",
    }
  }
}

#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl NotifyError {
  pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self(Box::new(err))
  }
}

/// Announces to every current observer that contact data changed.
///
/// Implementations own their subscriber lists; the service only announces.
pub trait ChangeNotifier: Send + Sync {
  fn announce_change(&self) -> Result<(), NotifyError>;
}

/// Sends an informational message after a contact was saved.
#[async_trait]
pub trait MailNotifier: Send + Sync {
  async fn contact_saved(&self, contact_id: Uuid) -> Result<(), NotifyError>;
}
