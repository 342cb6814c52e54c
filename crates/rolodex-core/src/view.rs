//! Edit-form view models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::VariantArray;
use uuid::Uuid;

use crate::contact::{Address, ContactDetails, EmailAddress, Title};

/// One entry of a title drop-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleOption {
  pub text:  String,
  pub value: String,
}

/// The selectable titles, in display order.
pub fn available_titles() -> Vec<TitleOption> {
  Title::VARIANTS
    .iter()
    .map(|t| {
      let name: &'static str = (*t).into();
      TitleOption { text: name.to_owned(), value: name.to_owned() }
    })
    .collect()
}

/// Everything an edit form needs: the contact (if any) plus form choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditContactView {
  pub id:               Option<Uuid>,
  pub title:            Option<Title>,
  pub first_name:       String,
  pub last_name:        String,
  pub dob:              Option<NaiveDate>,
  pub email_addresses:  Vec<EmailAddress>,
  pub addresses:        Vec<Address>,
  pub available_titles: Vec<TitleOption>,
}

impl EditContactView {
  /// An empty form for a new contact.
  pub fn scaffold() -> Self {
    Self { available_titles: available_titles(), ..Self::default() }
  }
}

impl From<ContactDetails> for EditContactView {
  fn from(details: ContactDetails) -> Self {
    let ContactDetails { contact, email_addresses, addresses } = details;
    Self {
      id: Some(contact.id),
      title: Some(contact.title),
      first_name: contact.first_name,
      last_name: contact.last_name,
      dob: Some(contact.dob),
      email_addresses,
      addresses,
      available_titles: available_titles(),
    }
  }
}
