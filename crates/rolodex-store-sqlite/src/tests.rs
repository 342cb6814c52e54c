//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use rolodex_core::{
  contact::{Address, Contact, EmailAddress, Title},
  store::{ContactStore, StoreError as _, UnitOfWork},
};
use rusqlite::{Connection, params};
use uuid::Uuid;

use crate::{Error, RowCounts, SqliteStore, encode::encode_uuid, schema};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn contact(first_name: &str) -> Contact {
  Contact {
    id:         Uuid::new_v4(),
    title:      Title::Ms,
    first_name: first_name.into(),
    last_name:  "Hopper".into(),
    dob:        NaiveDate::from_ymd_opt(1906, 12, 9).unwrap(),
  }
}

fn email(contact_id: Uuid, address: &str, is_primary: bool) -> EmailAddress {
  EmailAddress {
    id: Uuid::new_v4(),
    contact_id,
    kind: "work".into(),
    email: address.into(),
    is_primary,
  }
}

fn address(contact_id: Uuid, street1: &str) -> Address {
  Address {
    id: Uuid::new_v4(),
    contact_id,
    kind: "home".into(),
    street1: street1.into(),
    street2: None,
    city: "Arlington".into(),
    state: "VA".into(),
    zip: "22201".into(),
  }
}

async fn insert(s: &SqliteStore, c: &Contact, emails: Vec<EmailAddress>, addresses: Vec<Address>) {
  let mut work = UnitOfWork::new();
  work.insert_contact(c.clone());
  emails.into_iter().for_each(|e| work.add_email(e));
  addresses.into_iter().for_each(|a| work.add_address(a));
  s.commit(work).await.unwrap();
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_contact_with_children() {
  let s = store().await;
  let grace = contact("Grace");
  insert(
    &s,
    &grace,
    vec![
      email(grace.id, "grace@navy.mil", true),
      email(grace.id, "grace@example.com", false),
    ],
    vec![address(grace.id, "1 Navy Way")],
  )
  .await;

  let details = s.get_contact(grace.id).await.unwrap().unwrap();
  assert_eq!(details.contact, grace);
  let emails: Vec<&str> = details.email_addresses.iter().map(|e| e.email.as_str()).collect();
  assert_eq!(emails, ["grace@navy.mil", "grace@example.com"]);
  assert!(details.email_addresses[0].is_primary);
  assert!(!details.email_addresses[1].is_primary);
  assert_eq!(details.addresses.len(), 1);
  assert_eq!(details.addresses[0].street1, "1 Navy Way");
  assert_eq!(details.addresses[0].street2, None);
}

#[tokio::test]
async fn get_contact_missing_returns_none() {
  let s = store().await;
  assert!(s.get_contact(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_orders_by_first_name_ignoring_case() {
  let s = store().await;
  for name in ["grace", "Barbara", "ada"] {
    insert(&s, &contact(name), Vec::new(), Vec::new()).await;
  }
  let names: Vec<String> = s
    .list_contacts()
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.first_name)
    .collect();
  assert_eq!(names, ["ada", "Barbara", "grace"]);
}

// ─── Writes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn commit_replaces_children_and_updates_scalars() {
  let s = store().await;
  let mut grace = contact("Grace");
  let old = email(grace.id, "old@example.com", true);
  let old_address = address(grace.id, "Old Street");
  insert(&s, &grace, vec![old.clone()], vec![old_address.clone()]).await;

  grace.last_name = "Murray".into();
  let mut work = UnitOfWork::new();
  work.clear_children(grace.id);
  work.add_email(email(grace.id, "new@example.com", false));
  work.update_contact(grace.clone());
  s.commit(work).await.unwrap();

  let details = s.get_contact(grace.id).await.unwrap().unwrap();
  assert_eq!(details.contact.last_name, "Murray");
  assert_eq!(details.email_addresses.len(), 1);
  assert_eq!(details.email_addresses[0].email, "new@example.com");
  assert!(details.addresses.is_empty());
}

#[tokio::test]
async fn update_of_missing_contact_rolls_back() {
  let s = store().await;
  let ghost = contact("Ghost");

  let mut work = UnitOfWork::new();
  work.update_contact(ghost.clone());
  let err = s.commit(work).await.unwrap_err();
  assert!(matches!(err, Error::ContactNotFound(id) if id == ghost.id));

  let counts = s.row_counts().await.unwrap();
  assert_eq!(counts, RowCounts { contacts: 0, email_addresses: 0, addresses: 0 });
}

#[tokio::test]
async fn failed_commit_leaves_prior_state() {
  let s = store().await;
  let grace = contact("Grace");
  let kept = email(grace.id, "kept@example.com", true);
  insert(&s, &grace, vec![kept.clone()], Vec::new()).await;

  // The staged removal is undone because the child insert violates the
  // foreign key on an unknown contact.
  let mut work = UnitOfWork::new();
  work.clear_children(grace.id);
  work.add_email(email(Uuid::new_v4(), "orphan@example.com", false));
  assert!(matches!(s.commit(work).await, Err(Error::Database(_))));

  let details = s.get_contact(grace.id).await.unwrap().unwrap();
  assert_eq!(details.email_addresses, vec![kept]);
}

#[tokio::test]
async fn removing_contact_cascades_addresses() {
  let s = store().await;
  let grace = contact("Grace");
  let mail = email(grace.id, "grace@example.com", true);
  insert(&s, &grace, vec![mail], vec![address(grace.id, "1 Navy Way")]).await;

  let mut work = UnitOfWork::new();
  work.clear_children(grace.id);
  work.remove_contact(grace.id);
  s.commit(work).await.unwrap();

  let counts = s.row_counts().await.unwrap();
  assert_eq!(counts, RowCounts { contacts: 0, email_addresses: 0, addresses: 0 });
}

#[tokio::test]
async fn removing_contact_with_emails_left_is_rejected() {
  let s = store().await;
  let grace = contact("Grace");
  insert(&s, &grace, vec![email(grace.id, "grace@example.com", true)], Vec::new()).await;

  let mut work = UnitOfWork::new();
  work.remove_contact(grace.id);
  assert!(s.commit(work).await.is_err());
  assert!(s.get_contact(grace.id).await.unwrap().is_some());
}

#[tokio::test]
async fn clearing_children_removes_rows_the_caller_never_read() {
  let s = store().await;
  let grace = contact("Grace");
  insert(&s, &grace, vec![email(grace.id, "first@example.com", true)], Vec::new()).await;
  let stale = s.get_contact(grace.id).await.unwrap().unwrap();

  // Another writer replaces the children after `stale` was read.
  let mut work = UnitOfWork::new();
  work.clear_children(grace.id);
  work.add_email(email(grace.id, "second@example.com", true));
  work.add_address(address(grace.id, "2 Navy Way"));
  work.update_contact(grace.clone());
  s.commit(work).await.unwrap();

  let mut work = UnitOfWork::new();
  work.clear_children(stale.contact.id);
  work.add_email(email(grace.id, "third@example.com", true));
  work.update_contact(stale.contact);
  s.commit(work).await.unwrap();

  let details = s.get_contact(grace.id).await.unwrap().unwrap();
  let emails: Vec<&str> = details.email_addresses.iter().map(|e| e.email.as_str()).collect();
  assert_eq!(emails, ["third@example.com"]);
  assert!(details.addresses.is_empty());
}

#[tokio::test]
async fn removing_missing_contact_rolls_back() {
  let s = store().await;
  let grace = contact("Grace");
  insert(&s, &grace, vec![email(grace.id, "grace@example.com", true)], Vec::new()).await;
  let before = s.row_counts().await.unwrap();

  let ghost = Uuid::new_v4();
  let mut work = UnitOfWork::new();
  work.clear_children(grace.id);
  work.clear_children(ghost);
  work.remove_contact(ghost);
  let err = s.commit(work).await.unwrap_err();
  assert_eq!(err.missing_contact(), Some(ghost));

  assert_eq!(s.row_counts().await.unwrap(), before);
}

#[test]
fn only_not_found_reports_a_missing_contact() {
  let id = Uuid::new_v4();
  assert_eq!(Error::ContactNotFound(id).missing_contact(), Some(id));
  assert_eq!(Error::Decode("bad".into()).missing_contact(), None);
}

#[tokio::test]
async fn empty_unit_of_work_is_a_no_op() {
  let s = store().await;
  s.commit(UnitOfWork::new()).await.unwrap();
  assert_eq!(s.row_counts().await.unwrap().contacts, 0);
}

// ─── Migrations ──────────────────────────────────────────────────────────────

fn v1_database() -> Connection {
  let mut conn = Connection::open_in_memory().unwrap();
  conn.execute_batch(schema::PRAGMAS).unwrap();
  assert_eq!(schema::migrate_to(&mut conn, 1, &[]).unwrap(), 1);
  conn
    .execute(
      "INSERT INTO contacts VALUES ('c1', 'Dr', 'Ada', 'Lovelace', '1815-12-10')",
      [],
    )
    .unwrap();
  for (id, position) in [("e1", 0), ("e2", 1)] {
    conn
      .execute(
        "INSERT INTO email_addresses (email_id, contact_id, position, kind, email)
         VALUES (?1, 'c1', ?2, 'home', ?1)",
        params![id, position],
      )
      .unwrap();
  }
  conn
}

fn primary_ids(conn: &Connection) -> Vec<String> {
  let mut stmt = conn
    .prepare("SELECT email_id FROM email_addresses WHERE is_primary = 1 ORDER BY email_id")
    .unwrap();
  stmt
    .query_map([], |r| r.get(0))
    .unwrap()
    .collect::<rusqlite::Result<Vec<String>>>()
    .unwrap()
}

#[test]
fn primary_migration_backfills_selected_emails() {
  let mut conn = v1_database();
  let version = schema::migrate(&mut conn, &["e2".to_owned()]).unwrap();
  assert_eq!(version, schema::LATEST_VERSION);
  assert_eq!(primary_ids(&conn), ["e2"]);
}

#[test]
fn primary_backfill_keeps_one_primary_per_contact() {
  let mut conn = v1_database();
  schema::migrate(&mut conn, &["e2".to_owned(), "e1".to_owned()]).unwrap();
  assert_eq!(primary_ids(&conn), ["e2"]);
}

#[test]
fn migrations_are_not_reapplied() {
  let mut conn = v1_database();
  schema::migrate(&mut conn, &[]).unwrap();
  // A second run with a backfill list must not touch existing rows.
  schema::migrate(&mut conn, &["e1".to_owned()]).unwrap();
  assert!(primary_ids(&conn).is_empty());
  assert_eq!(schema::user_version(&conn).unwrap(), schema::LATEST_VERSION);
}

#[tokio::test]
async fn open_with_backfill_on_fresh_database_is_harmless() {
  let dir = std::env::temp_dir().join(format!("rolodex-{}.db", Uuid::new_v4()));
  let s = SqliteStore::open_with(&dir, crate::StoreOptions {
    primary_email_backfill: vec![Uuid::new_v4()],
  })
  .await
  .unwrap();
  assert_eq!(s.row_counts().await.unwrap().email_addresses, 0);
  drop(s);
  let _ = std::fs::remove_file(&dir);
}

#[test]
fn encoded_uuids_are_hyphenated_lowercase() {
  let id = Uuid::parse_str("5111F412-A7F4-4169-BB27-632687569CCD").unwrap();
  assert_eq!(encode_uuid(id), "5111f412-a7f4-4169-bb27-632687569ccd");
}
