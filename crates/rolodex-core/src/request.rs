//! The save-contact request and its validation.
//!
//! A [`SaveContactRequest`] is the raw form submission: every field is
//! optional so that a missing or malformed value becomes a field-level
//! message rather than a deserialisation failure. [`SaveContactRequest::validate`]
//! turns it into a [`ContactDraft`] with typed fields, or collects every
//! problem into [`ValidationErrors`].

use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contact::Title;

/// Format accepted for dates of birth.
pub const DOB_FORMAT: &str = "%Y-%m-%d";

// ─── Raw request ─────────────────────────────────────────────────────────────

/// JSON body of a create-or-update submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveContactRequest {
  /// Absent (or the nil UUID) creates a new contact.
  pub contact_id: Option<Uuid>,
  pub title:      Option<String>,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub dob:        Option<String>,
  /// Submission order matters: the first entry flagged primary wins.
  pub emails:     Vec<EmailInput>,
  pub addresses:  Vec<AddressInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailInput {
  #[serde(rename = "type")]
  pub kind:       String,
  pub email:      Option<String>,
  #[serde(alias = "primary")]
  pub is_primary: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressInput {
  #[serde(rename = "type")]
  pub kind:    String,
  pub street1: Option<String>,
  pub street2: Option<String>,
  pub city:    String,
  pub state:   String,
  pub zip:     String,
}

// ─── Validated draft ─────────────────────────────────────────────────────────

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
  pub contact_id: Option<Uuid>,
  pub title:      Title,
  pub first_name: String,
  pub last_name:  String,
  pub dob:        NaiveDate,
  pub emails:     Vec<EmailDraft>,
  pub addresses:  Vec<AddressDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
  pub kind:       String,
  pub email:      String,
  /// As submitted; not yet reconciled against the single-primary rule.
  pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressDraft {
  pub kind:    String,
  pub street1: String,
  pub street2: Option<String>,
  pub city:    String,
  pub state:   String,
  pub zip:     String,
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Field-level validation messages keyed by field path, e.g. `emails[1].email`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
  pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.entry(field.into()).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn contains(&self, field: &str) -> bool { self.0.contains_key(field) }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in &self.0 {
      for message in messages {
        if !first {
          f.write_str("; ")?;
        }
        write!(f, "{field}: {message}")?;
        first = false;
      }
    }
    Ok(())
  }
}

// ─── Validation ──────────────────────────────────────────────────────────────

impl SaveContactRequest {
  /// Check required fields and formats, collecting every problem found.
  pub fn validate(self) -> Result<ContactDraft, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let title = match non_blank(self.title.as_deref()) {
      None => {
        errors.add("title", "title is required");
        None
      }
      Some(raw) => match raw.parse::<Title>() {
        Ok(title) => Some(title),
        Err(_) => {
          errors.add("title", format!("unknown title {raw:?}"));
          None
        }
      },
    };

    let first_name = required(&mut errors, "first_name", self.first_name.as_deref());
    let last_name = required(&mut errors, "last_name", self.last_name.as_deref());

    let dob = match non_blank(self.dob.as_deref()) {
      None => {
        errors.add("dob", "date of birth is required");
        None
      }
      Some(raw) => match NaiveDate::parse_from_str(raw, DOB_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
          errors.add("dob", format!("{raw:?} is not a valid date (expected YYYY-MM-DD)"));
          None
        }
      },
    };

    let emails: Vec<EmailDraft> = self
      .emails
      .into_iter()
      .enumerate()
      .filter_map(|(i, input)| {
        let email = required(&mut errors, format!("emails[{i}].email"), input.email.as_deref())?;
        Some(EmailDraft {
          kind: input.kind.trim().to_owned(),
          email,
          is_primary: input.is_primary,
        })
      })
      .collect();

    let addresses: Vec<AddressDraft> = self
      .addresses
      .into_iter()
      .enumerate()
      .filter_map(|(i, input)| {
        let street1 =
          required(&mut errors, format!("addresses[{i}].street1"), input.street1.as_deref())?;
        Some(AddressDraft {
          kind: input.kind.trim().to_owned(),
          street1,
          street2: non_blank(input.street2.as_deref()).map(str::to_owned),
          city: input.city.trim().to_owned(),
          state: input.state.trim().to_owned(),
          zip: input.zip.trim().to_owned(),
        })
      })
      .collect();

    match (title, first_name, last_name, dob) {
      (Some(title), Some(first_name), Some(last_name), Some(dob)) if errors.is_empty() => {
        Ok(ContactDraft {
          contact_id: self.contact_id.filter(|id| !id.is_nil()),
          title,
          first_name,
          last_name,
          dob,
          emails,
          addresses,
        })
      }
      _ => Err(errors),
    }
  }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|v| !v.is_empty())
}

fn required(
  errors: &mut ValidationErrors,
  field: impl Into<String>,
  value: Option<&str>,
) -> Option<String> {
  let field = field.into();
  match non_blank(value) {
    Some(v) => Some(v.to_owned()),
    None => {
      errors.add(field.clone(), format!("{field} is required"));
      None
    }
  }
}
