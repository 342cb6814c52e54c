//! [`ContactService`]: request orchestration over a [`ContactStore`].
//!
//! Every operation follows the same shape: client errors (validation, unknown
//! id) are detected before anything is staged, store failures are logged and
//! collapsed into [`Error::Internal`], and the best-effort notifications run
//! only after a successful commit.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  contact::{Address, Contact, EmailAddress},
  notify::{ChangeNotifier, MailNotifier},
  request::{AddressDraft, EmailDraft, SaveContactRequest},
  store::{ContactStore, StoreError, UnitOfWork},
  view::EditContactView,
};

// ─── Child rebuilding ────────────────────────────────────────────────────────

/// Build the email rows for `contact_id` from the submitted entries.
///
/// The first entry flagged primary keeps the flag; every other entry is
/// stored non-primary. If none is flagged, none becomes primary.
pub fn rebuild_emails(contact_id: Uuid, drafts: &[EmailDraft]) -> Vec<EmailAddress> {
  let mut primary_set = false;
  drafts
    .iter()
    .map(|draft| {
      let is_primary = draft.is_primary && !primary_set;
      primary_set |= is_primary;
      EmailAddress {
        id: Uuid::new_v4(),
        contact_id,
        kind: draft.kind.clone(),
        email: draft.email.clone(),
        is_primary,
      }
    })
    .collect()
}

/// Build the address rows for `contact_id`, verbatim and in order.
pub fn rebuild_addresses(contact_id: Uuid, drafts: &[AddressDraft]) -> Vec<Address> {
  drafts
    .iter()
    .map(|draft| Address {
      id: Uuid::new_v4(),
      contact_id,
      kind: draft.kind.clone(),
      street1: draft.street1.clone(),
      street2: draft.street2.clone(),
      city: draft.city.clone(),
      state: draft.state.clone(),
      zip: draft.zip.clone(),
    })
    .collect()
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Contact operations with their post-commit side effects.
pub struct ContactService<S> {
  store:    Arc<S>,
  notifier: Arc<dyn ChangeNotifier>,
  mailer:   Arc<dyn MailNotifier>,
}

impl<S> ContactService<S>
where
  S: ContactStore,
{
  pub fn new(
    store: Arc<S>,
    notifier: Arc<dyn ChangeNotifier>,
    mailer: Arc<dyn MailNotifier>,
  ) -> Self {
    Self { store, notifier, mailer }
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// All contacts ordered by first name, without children.
  pub async fn list(&self) -> Result<Vec<Contact>> {
    tracing::info!("retrieving all contacts");
    let contacts = self
      .store
      .list_contacts()
      .await
      .map_err(|e| internal("list_contacts", &e))?;
    tracing::info!(count = contacts.len(), "retrieved contacts");
    Ok(contacts)
  }

  /// One contact with its children, plus the title choices for its form.
  pub async fn fetch_for_edit(&self, id: Uuid) -> Result<EditContactView> {
    tracing::info!(contact_id = %id, "preparing contact for edit");
    let details = self
      .store
      .get_contact(id)
      .await
      .map_err(|e| internal("edit_contact", &e))?
      .ok_or_else(|| {
        tracing::warn!(contact_id = %id, "attempted to edit a non-existing contact");
        Error::ContactNotFound(id)
      })?;
    Ok(EditContactView::from(details))
  }

  /// An empty form for a new contact. Does not touch the store.
  pub fn new_contact(&self) -> EditContactView { EditContactView::scaffold() }

  // ── Save ──────────────────────────────────────────────────────────────────

  /// Create or update a contact, replacing its children wholesale.
  ///
  /// Returns the id of the saved contact.
  pub async fn save(&self, request: SaveContactRequest) -> Result<Uuid> {
    tracing::info!(contact_id = ?request.contact_id, "starting to save contact");

    let draft = request.validate().map_err(|errors| {
      tracing::warn!(%errors, "contact submission is invalid");
      Error::Validation(errors)
    })?;

    let mut work = UnitOfWork::new();

    let (contact, is_new) = match draft.contact_id {
      None => {
        let contact = Contact {
          id:         Uuid::new_v4(),
          title:      draft.title,
          first_name: draft.first_name.clone(),
          last_name:  draft.last_name.clone(),
          dob:        draft.dob,
        };
        (contact, true)
      }
      Some(id) => {
        let existing = self
          .store
          .get_contact(id)
          .await
          .map_err(|e| internal("save_contact", &e))?
          .ok_or_else(|| {
            tracing::warn!(contact_id = %id, "contact to save not found");
            Error::ContactNotFound(id)
          })?;

        tracing::info!(contact_id = %id, "updating contact; clearing existing addresses and emails");
        work.clear_children(id);
        (existing.contact, false)
      }
    };

    tracing::debug!(contact_id = %contact.id, "adding submitted children");
    for email in rebuild_emails(contact.id, &draft.emails) {
      work.add_email(email);
    }
    for address in rebuild_addresses(contact.id, &draft.addresses) {
      work.add_address(address);
    }

    let contact = Contact {
      title: draft.title,
      first_name: draft.first_name,
      last_name: draft.last_name,
      dob: draft.dob,
      ..contact
    };
    let contact_id = contact.id;

    if is_new {
      work.insert_contact(contact);
    } else {
      work.update_contact(contact);
    }

    tracing::info!(contact_id = %contact_id, "saving changes to the database");
    self
      .store
      .commit(work)
      .await
      .map_err(|e| commit_failed("save_contact", e))?;
    tracing::info!(contact_id = %contact_id, "database changes saved");

    self.announce();
    self.send_mail(contact_id).await;

    tracing::info!(contact_id = %contact_id, "contact saved");
    Ok(contact_id)
  }

  // ── Delete ────────────────────────────────────────────────────────────────

  /// Delete a contact together with its children.
  pub async fn delete(&self, id: Uuid) -> Result<()> {
    tracing::info!(contact_id = %id, "attempting to delete contact");

    self
      .store
      .get_contact(id)
      .await
      .map_err(|e| internal("delete_contact", &e))?
      .ok_or_else(|| {
        tracing::warn!(contact_id = %id, "delete attempted for non-existing contact");
        Error::ContactNotFound(id)
      })?;

    let mut work = UnitOfWork::new();
    work.clear_children(id);
    work.remove_contact(id);

    self
      .store
      .commit(work)
      .await
      .map_err(|e| commit_failed("delete_contact", e))?;

    self.announce();
    tracing::info!(contact_id = %id, "contact deleted");
    Ok(())
  }

  // ── Post-commit hooks ─────────────────────────────────────────────────────

  fn announce(&self) {
    tracing::info!("announcing contact change to observers");
    if let Err(e) = self.notifier.announce_change() {
      tracing::error!(operation = "announce_change", error = %e, "change notification failed");
    }
  }

  async fn send_mail(&self, contact_id: Uuid) {
    tracing::info!(contact_id = %contact_id, "sending email notification");
    match self.mailer.contact_saved(contact_id).await {
      Ok(()) => tracing::info!(contact_id = %contact_id, "email notification sent"),
      Err(e) => tracing::error!(
        operation = "send_email_notification",
        contact_id = %contact_id,
        error = %e,
        "email notification failed"
      ),
    }
  }
}

/// A commit that found its contact gone is a not-found; anything else is
/// internal.
fn commit_failed<E: StoreError>(operation: &'static str, err: E) -> Error {
  match err.missing_contact() {
    Some(id) => {
      tracing::warn!(operation, contact_id = %id, "contact vanished before commit");
      Error::ContactNotFound(id)
    }
    None => internal(operation, &err),
  }
}

/// Log a store failure for `operation` and hide it behind [`Error::Internal`].
fn internal(operation: &'static str, err: &dyn std::error::Error) -> Error {
  tracing::error!(operation, error = %err, "store operation failed");
  Error::Internal { operation }
}
