//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! UUIDs are stored as hyphenated lowercase strings, dates of birth as
//! `YYYY-MM-DD`, and titles by variant name.

use chrono::NaiveDate;
use rolodex_core::contact::{Address, Contact, EmailAddress, Title};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::Decode(format!("bad date {s:?}: {e}")))
}

// ─── Title ───────────────────────────────────────────────────────────────────

pub fn encode_title(t: Title) -> &'static str { t.into() }

pub fn decode_title(s: &str) -> Result<Title> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown title: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `contacts` row.
pub struct RawContact {
  pub contact_id: String,
  pub title:      String,
  pub first_name: String,
  pub last_name:  String,
  pub dob:        String,
}

impl RawContact {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      contact_id: row.get(0)?,
      title:      row.get(1)?,
      first_name: row.get(2)?,
      last_name:  row.get(3)?,
      dob:        row.get(4)?,
    })
  }

  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      id:         decode_uuid(&self.contact_id)?,
      title:      decode_title(&self.title)?,
      first_name: self.first_name,
      last_name:  self.last_name,
      dob:        decode_date(&self.dob)?,
    })
  }
}

/// Raw values read directly from an `email_addresses` row.
pub struct RawEmail {
  pub email_id:   String,
  pub contact_id: String,
  pub kind:       String,
  pub email:      String,
  pub is_primary: bool,
}

impl RawEmail {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      email_id:   row.get(0)?,
      contact_id: row.get(1)?,
      kind:       row.get(2)?,
      email:      row.get(3)?,
      is_primary: row.get(4)?,
    })
  }

  pub fn into_email(self) -> Result<EmailAddress> {
    Ok(EmailAddress {
      id:         decode_uuid(&self.email_id)?,
      contact_id: decode_uuid(&self.contact_id)?,
      kind:       self.kind,
      email:      self.email,
      is_primary: self.is_primary,
    })
  }
}

/// Raw values read directly from an `addresses` row.
pub struct RawAddress {
  pub address_id: String,
  pub contact_id: String,
  pub kind:       String,
  pub street1:    String,
  pub street2:    Option<String>,
  pub city:       String,
  pub state:      String,
  pub zip:        String,
}

impl RawAddress {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      address_id: row.get(0)?,
      contact_id: row.get(1)?,
      kind:       row.get(2)?,
      street1:    row.get(3)?,
      street2:    row.get(4)?,
      city:       row.get(5)?,
      state:      row.get(6)?,
      zip:        row.get(7)?,
    })
  }

  pub fn into_address(self) -> Result<Address> {
    Ok(Address {
      id:         decode_uuid(&self.address_id)?,
      contact_id: decode_uuid(&self.contact_id)?,
      kind:       self.kind,
      street1:    self.street1,
      street2:    self.street2,
      city:       self.city,
      state:      self.state,
      zip:        self.zip,
    })
  }
}
