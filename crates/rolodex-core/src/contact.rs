//! Contact entities.
//!
//! A [`Contact`] owns its email addresses and postal addresses. Children refer
//! back to their owner by id only; there are no live parent references.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantArray};
use uuid::Uuid;

// ─── Title ───────────────────────────────────────────────────────────────────

/// Honorific shown in front of a contact's name.
///
/// The variant list is also the set of titles offered to edit forms; add a
/// variant to extend it.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
  VariantArray,
)]
pub enum Title {
  Mr,
  Mrs,
  Ms,
  Dr,
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// The scalar part of a contact record, without children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub id:         Uuid,
  pub title:      Title,
  pub first_name: String,
  pub last_name:  String,
  pub dob:        NaiveDate,
}

// ─── Children ────────────────────────────────────────────────────────────────

/// An email address belonging to a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
  pub id:         Uuid,
  pub contact_id: Uuid,
  /// Free-form label such as `home` or `work`.
  #[serde(rename = "type")]
  pub kind:       String,
  pub email:      String,
  pub is_primary: bool,
}

/// A postal address belonging to a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  pub id:         Uuid,
  pub contact_id: Uuid,
  #[serde(rename = "type")]
  pub kind:       String,
  pub street1:    String,
  pub street2:    Option<String>,
  pub city:       String,
  pub state:      String,
  pub zip:        String,
}

// ─── Aggregate ───────────────────────────────────────────────────────────────

/// A contact loaded together with both child collections, in stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
  pub contact:         Contact,
  pub email_addresses: Vec<EmailAddress>,
  pub addresses:       Vec<Address>,
}

impl ContactDetails {
  /// The primary email, if one is flagged.
  pub fn primary_email(&self) -> Option<&EmailAddress> {
    self.email_addresses.iter().find(|e| e.is_primary)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn title_parses_and_displays() {
    assert_eq!("Dr".parse::<Title>().unwrap(), Title::Dr);
    assert_eq!(Title::Mrs.to_string(), "Mrs");
    assert!("Sir".parse::<Title>().is_err());
  }

  #[test]
  fn title_variants_are_in_form_order() {
    assert_eq!(Title::VARIANTS, &[Title::Mr, Title::Mrs, Title::Ms, Title::Dr]);
  }

  #[test]
  fn email_serialises_label_as_type() {
    let email = EmailAddress {
      id:         Uuid::nil(),
      contact_id: Uuid::nil(),
      kind:       "home".into(),
      email:      "ada@example.com".into(),
      is_primary: true,
    };
    let json = serde_json::to_value(&email).unwrap();
    assert_eq!(json["type"], "home");
    assert_eq!(json["is_primary"], true);
  }
}
