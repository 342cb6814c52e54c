//! Wiring for the Rolodex server binary: configuration and the SMTP notifier.

pub mod mail;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use uuid::Uuid;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROLODEX_*` environment variables. Every key has a default.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                   String,
  pub port:                   u16,
  pub store_path:             PathBuf,
  /// Email ids promoted to primary when the `is_primary` column is added.
  pub primary_email_backfill: Vec<Uuid>,
  pub mail:                   MailConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                   "127.0.0.1".to_owned(),
      port:                   8080,
      store_path:             PathBuf::from("contacts.db"),
      primary_email_backfill: Vec::new(),
      mail:                   MailConfig::default(),
    }
  }
}

/// The `[mail]` table.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MailConfig {
  pub enabled:      bool,
  pub relay_host:   String,
  pub relay_port:   u16,
  pub tls:          MailTls,
  pub from:         String,
  pub to:           String,
  pub subject:      String,
  pub timeout_secs: u64,
}

impl Default for MailConfig {
  fn default() -> Self {
    Self {
      enabled:      true,
      relay_host:   "127.0.0.1".to_owned(),
      relay_port:   25,
      tls:          MailTls::Opportunistic,
      from:         "noreply <noreply@contactmanager.com>".to_owned(),
      to:           "SysAdmin <Admin@contactmanager.com>".to_owned(),
      subject:      "ContactManager System Alert".to_owned(),
      timeout_secs: 10,
    }
  }
}

/// How the relay connection is secured.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailTls {
  /// Plain text only.
  None,
  /// STARTTLS when the relay offers it.
  #[default]
  Opportunistic,
  /// STARTTLS or fail.
  Required,
  /// TLS from the first byte (SMTPS).
  Wrapper,
}

/// Load configuration from `path` (optional) layered under the process
/// environment.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  load_config_with(path, environment())
}

fn environment() -> config::Environment {
  config::Environment::with_prefix("ROLODEX")
    .prefix_separator("_")
    .separator("__")
    .try_parsing(true)
    .list_separator(",")
    .with_list_parse_key("primary_email_backfill")
}

fn load_config_with(
  path: &Path,
  env: config::Environment,
) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(env)
    .build()?
    .try_deserialize()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests;
