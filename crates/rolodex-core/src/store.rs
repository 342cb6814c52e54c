//! The `ContactStore` trait and the [`UnitOfWork`] it commits.
//!
//! The trait is implemented by storage backends (e.g. `rolodex-store-sqlite`).
//! Reads return fully-built entities; every write is staged on a
//! [`UnitOfWork`] and applied atomically by [`ContactStore::commit`].

use std::future::Future;

use uuid::Uuid;

use crate::contact::{Address, Contact, ContactDetails, EmailAddress};

// ─── Unit of work ────────────────────────────────────────────────────────────

/// Whether a staged contact row is new or replaces an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persist {
  Insert,
  Update,
}

/// A set of pending changes that commit together or not at all.
///
/// Backends apply the stages in a fixed order: child clearing, the contact
/// insert/update, child additions (in the order they were staged), then
/// contact removals.
///
/// Children are cleared by owner, not by the ids a caller read earlier, so
/// whatever rows exist at commit time are replaced.
#[derive(Debug, Clone, Default)]
pub struct UnitOfWork {
  pub contact:          Option<(Contact, Persist)>,
  pub cleared_children: Vec<Uuid>,
  pub added_emails:     Vec<EmailAddress>,
  pub added_addresses:  Vec<Address>,
  pub removed_contacts: Vec<Uuid>,
}

impl UnitOfWork {
  pub fn new() -> Self { Self::default() }

  pub fn insert_contact(&mut self, contact: Contact) {
    self.contact = Some((contact, Persist::Insert));
  }

  pub fn update_contact(&mut self, contact: Contact) {
    self.contact = Some((contact, Persist::Update));
  }

  pub fn remove_contact(&mut self, id: Uuid) { self.removed_contacts.push(id); }

  /// Remove every email and address owned by `contact_id`.
  pub fn clear_children(&mut self, contact_id: Uuid) {
    self.cleared_children.push(contact_id);
  }

  pub fn add_email(&mut self, email: EmailAddress) { self.added_emails.push(email); }

  pub fn add_address(&mut self, address: Address) { self.added_addresses.push(address); }

  /// `true` if committing would not touch the store.
  pub fn is_empty(&self) -> bool {
    self.contact.is_none()
      && self.cleared_children.is_empty()
      && self.added_emails.is_empty()
      && self.added_addresses.is_empty()
      && self.removed_contacts.is_empty()
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Error type of a [`ContactStore`] backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The contact a commit had to update or remove, if it no longer existed.
  /// The commit was rolled back.
  fn missing_contact(&self) -> Option<Uuid> { None }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a contact store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: StoreError;

  /// All contacts ordered by first name, without children.
  fn list_contacts(
    &self,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// One contact with both child collections in stored order. Returns `None`
  /// if not found.
  fn get_contact(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ContactDetails>, Self::Error>> + Send + '_;

  /// Apply every stage of `work` in a single transaction.
  ///
  /// Fails without writing anything if a staged update or removal targets a
  /// contact that does not exist; see [`StoreError::missing_contact`].
  fn commit(
    &self,
    work: UnitOfWork,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
