//! SQL schema and forward-only migrations for the Rolodex SQLite store.
//!
//! The applied version lives in `PRAGMA user_version`. Each migration runs in
//! its own transaction together with the version bump, so a failed migration
//! leaves the database at the previous version.

use rusqlite::{Connection, Transaction, params};

/// Per-connection settings; executed on every open.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

const V1_TABLES: &str = "
CREATE TABLE IF NOT EXISTS contacts (
    contact_id  TEXT PRIMARY KEY,
    title       TEXT NOT NULL,   -- 'Mr' | 'Mrs' | 'Ms' | 'Dr'
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    dob         TEXT NOT NULL    -- YYYY-MM-DD
);

-- Emails are removed explicitly before their contact; no cascade.
CREATE TABLE IF NOT EXISTS email_addresses (
    email_id    TEXT PRIMARY KEY,
    contact_id  TEXT NOT NULL REFERENCES contacts(contact_id),
    position    INTEGER NOT NULL,
    kind        TEXT NOT NULL,
    email       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS addresses (
    address_id  TEXT PRIMARY KEY,
    contact_id  TEXT NOT NULL REFERENCES contacts(contact_id) ON DELETE CASCADE,
    position    INTEGER NOT NULL,
    kind        TEXT NOT NULL,
    street1     TEXT NOT NULL,
    street2     TEXT,
    city        TEXT NOT NULL,
    state       TEXT NOT NULL,
    zip         TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS contacts_first_name_idx ON contacts(first_name COLLATE NOCASE);
CREATE INDEX IF NOT EXISTS emails_contact_idx      ON email_addresses(contact_id);
CREATE INDEX IF NOT EXISTS addresses_contact_idx   ON addresses(contact_id);
";

const V2_ADD_PRIMARY: &str = "
ALTER TABLE email_addresses ADD COLUMN is_primary INTEGER NOT NULL DEFAULT 0;
";

// Skips emails whose contact already has a primary.
const V2_BACKFILL_PRIMARY: &str = "
UPDATE email_addresses
   SET is_primary = 1
 WHERE email_id = ?1
   AND NOT EXISTS (
         SELECT 1 FROM email_addresses p
          WHERE p.contact_id = email_addresses.contact_id
            AND p.is_primary = 1
       )
";

type Migration = fn(&Transaction<'_>, &[String]) -> rusqlite::Result<()>;

/// Migrations in order; entry `i` brings the schema to version `i + 1`.
const MIGRATIONS: &[Migration] = &[create_tables, add_primary_flag];

pub const LATEST_VERSION: u32 = MIGRATIONS.len() as u32;

fn create_tables(tx: &Transaction<'_>, _: &[String]) -> rusqlite::Result<()> {
  tx.execute_batch(V1_TABLES)
}

fn add_primary_flag(tx: &Transaction<'_>, primary_backfill: &[String]) -> rusqlite::Result<()> {
  tx.execute_batch(V2_ADD_PRIMARY)?;
  let mut stmt = tx.prepare(V2_BACKFILL_PRIMARY)?;
  for email_id in primary_backfill {
    stmt.execute(params![email_id])?;
  }
  Ok(())
}

pub fn user_version(conn: &Connection) -> rusqlite::Result<u32> {
  conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

/// Bring the schema up to [`LATEST_VERSION`].
///
/// `primary_backfill` lists hyphenated email ids to flag as primary when the
/// `is_primary` column is introduced; it is ignored once that version has
/// been applied.
pub fn migrate(conn: &mut Connection, primary_backfill: &[String]) -> rusqlite::Result<u32> {
  migrate_to(conn, LATEST_VERSION, primary_backfill)
}

pub fn migrate_to(
  conn: &mut Connection,
  target: u32,
  primary_backfill: &[String],
) -> rusqlite::Result<u32> {
  let current = user_version(conn)?;

  for (index, migration) in MIGRATIONS.iter().enumerate() {
    let version = index as u32 + 1;
    if version <= current || version > target {
      continue;
    }
    let tx = conn.transaction()?;
    migration(&tx, primary_backfill)?;
    tx.pragma_update(None, "user_version", version)?;
    tx.commit()?;
    tracing::info!(version, "applied schema migration");
  }

  user_version(conn)
}
