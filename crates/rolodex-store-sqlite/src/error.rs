//! Error type for `rolodex-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A stored column could not be decoded into its domain type.
  #[error("decode error: {0}")]
  Decode(String),

  /// An update or removal targeted a contact row that no longer exists; the
  /// unit of work was rolled back.
  #[error("contact not found: {0}")]
  ContactNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl rolodex_core::store::StoreError for Error {
  fn missing_contact(&self) -> Option<uuid::Uuid> {
    match self {
      Self::ContactNotFound(id) => Some(*id),
      _ => None,
    }
  }
}
