//! [`SqliteStore`]: the SQLite implementation of [`ContactStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, params};
use uuid::Uuid;

use rolodex_core::{
  contact::{Contact, ContactDetails},
  store::{ContactStore, Persist, UnitOfWork},
};

use crate::{
  Error, Result,
  encode::{
    RawAddress, RawContact, RawEmail, decode_uuid, encode_date, encode_title, encode_uuid,
  },
  schema::{self, PRAGMAS},
};

// ─── Options ─────────────────────────────────────────────────────────────────

/// Settings applied when a store is opened.
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
  /// Emails to flag as primary when the primary-flag migration runs.
  pub primary_email_backfill: Vec<Uuid>,
}

/// Row totals per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCounts {
  pub contacts:        u64,
  pub email_addresses: u64,
  pub addresses:       u64,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and bring its schema up to date.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with(path, StoreOptions::default()).await
  }

  pub async fn open_with(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema(options).await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema(StoreOptions::default()).await?;
    Ok(store)
  }

  async fn init_schema(&self, options: StoreOptions) -> Result<()> {
    let backfill: Vec<String> = options
      .primary_email_backfill
      .into_iter()
      .map(encode_uuid)
      .collect();

    let version = self
      .conn
      .call(move |conn| {
        conn.execute_batch(PRAGMAS)?;
        Ok(schema::migrate(conn, &backfill)?)
      })
      .await?;

    tracing::debug!(version, "contact store schema ready");
    Ok(())
  }

  /// Count the rows of every table.
  pub async fn row_counts(&self) -> Result<RowCounts> {
    let counts = self
      .conn
      .call(|conn| {
        let count = |table: &str| -> rusqlite::Result<u64> {
          conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        };
        Ok(RowCounts {
          contacts:        count("contacts")?,
          email_addresses: count("email_addresses")?,
          addresses:       count("addresses")?,
        })
      })
      .await?;
    Ok(counts)
  }
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

const SELECT_CONTACT: &str = "SELECT contact_id, title, first_name, last_name, dob FROM contacts";

impl ContactStore for SqliteStore {
  type Error = Error;

  async fn list_contacts(&self) -> Result<Vec<Contact>> {
    let raws: Vec<RawContact> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("{SELECT_CONTACT} ORDER BY first_name COLLATE NOCASE"))?;
        let rows = stmt
          .query_map([], RawContact::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawContact::into_contact).collect()
  }

  async fn get_contact(&self, id: Uuid) -> Result<Option<ContactDetails>> {
    let id_str = encode_uuid(id);

    let raw: Option<(RawContact, Vec<RawEmail>, Vec<RawAddress>)> = self
      .conn
      .call(move |conn| {
        let contact = conn
          .query_row(
            &format!("{SELECT_CONTACT} WHERE contact_id = ?1"),
            params![id_str],
            RawContact::from_row,
          )
          .optional()?;

        let Some(contact) = contact else {
          return Ok(None);
        };

        let emails = conn
          .prepare(
            "SELECT email_id, contact_id, kind, email, is_primary
             FROM email_addresses WHERE contact_id = ?1 ORDER BY position",
          )?
          .query_map(params![id_str], RawEmail::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let addresses = conn
          .prepare(
            "SELECT address_id, contact_id, kind, street1, street2, city, state, zip
             FROM addresses WHERE contact_id = ?1 ORDER BY position",
          )?
          .query_map(params![id_str], RawAddress::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((contact, emails, addresses)))
      })
      .await?;

    let Some((contact, emails, addresses)) = raw else {
      return Ok(None);
    };

    Ok(Some(ContactDetails {
      contact:         contact.into_contact()?,
      email_addresses: emails
        .into_iter()
        .map(RawEmail::into_email)
        .collect::<Result<_>>()?,
      addresses:       addresses
        .into_iter()
        .map(RawAddress::into_address)
        .collect::<Result<_>>()?,
    }))
  }

  async fn commit(&self, work: UnitOfWork) -> Result<()> {
    if work.is_empty() {
      return Ok(());
    }

    // `Some(id)` means an update or removal found no row; the transaction was
    // dropped (rolled back) before reaching `commit`.
    let missing: Option<String> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        for owner in &work.cleared_children {
          let owner = encode_uuid(*owner);
          tx.execute("DELETE FROM email_addresses WHERE contact_id = ?1", params![owner])?;
          tx.execute("DELETE FROM addresses WHERE contact_id = ?1", params![owner])?;
        }

        if let Some((contact, persist)) = &work.contact {
          let id_str = encode_uuid(contact.id);
          let title = encode_title(contact.title);
          let dob = encode_date(contact.dob);
          match persist {
            Persist::Insert => {
              tx.execute(
                "INSERT INTO contacts (contact_id, title, first_name, last_name, dob)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id_str, title, contact.first_name, contact.last_name, dob],
              )?;
            }
            Persist::Update => {
              let changed = tx.execute(
                "UPDATE contacts
                    SET title = ?2, first_name = ?3, last_name = ?4, dob = ?5
                  WHERE contact_id = ?1",
                params![id_str, title, contact.first_name, contact.last_name, dob],
              )?;
              if changed == 0 {
                return Ok(Some(id_str));
              }
            }
          }
        }

        {
          let mut stmt = tx.prepare_cached(
            "INSERT INTO email_addresses (email_id, contact_id, position, kind, email, is_primary)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          )?;
          for (position, email) in work.added_emails.iter().enumerate() {
            stmt.execute(params![
              encode_uuid(email.id),
              encode_uuid(email.contact_id),
              position as i64,
              email.kind,
              email.email,
              email.is_primary,
            ])?;
          }

          let mut stmt = tx.prepare_cached(
            "INSERT INTO addresses
               (address_id, contact_id, position, kind, street1, street2, city, state, zip)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          )?;
          for (position, address) in work.added_addresses.iter().enumerate() {
            stmt.execute(params![
              encode_uuid(address.id),
              encode_uuid(address.contact_id),
              position as i64,
              address.kind,
              address.street1,
              address.street2,
              address.city,
              address.state,
              address.zip,
            ])?;
          }

          let mut stmt = tx.prepare_cached("DELETE FROM contacts WHERE contact_id = ?1")?;
          for id in &work.removed_contacts {
            let id_str = encode_uuid(*id);
            if stmt.execute(params![id_str])? == 0 {
              return Ok(Some(id_str));
            }
          }
        }

        tx.commit()?;
        Ok(None)
      })
      .await?;

    match missing {
      Some(id) => Err(Error::ContactNotFound(decode_uuid(&id)?)),
      None => Ok(()),
    }
  }
}
