//! Error types for `rolodex-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::request::ValidationErrors;

#[derive(Debug, Error)]
pub enum Error {
  /// The request was structurally invalid; nothing was written.
  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  /// The referenced contact does not exist; nothing was written.
  #[error("contact not found: {0}")]
  ContactNotFound(Uuid),

  /// An unexpected failure in the store or in the service itself. The cause
  /// has already been logged; it is never carried to the caller.
  #[error("internal error during {operation}")]
  Internal { operation: &'static str },
}

impl Error {
  /// `true` for errors caused by the caller's input.
  pub fn is_client_error(&self) -> bool {
    matches!(self, Self::Validation(_) | Self::ContactNotFound(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
