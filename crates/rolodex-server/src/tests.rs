use std::path::{Path, PathBuf};

use rolodex_core::notify::MailNotifier as _;
use uuid::Uuid;

use crate::{
  MailConfig, MailTls, ServerConfig, expand_tilde, load_config_with,
  mail::{DisabledNotifier, MailError, SmtpNotifier, alert_body},
};

fn env_with(vars: &[(&str, &str)]) -> config::Environment {
  let map: config::Map<String, String> =
    vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
  super::environment().source(Some(map))
}

fn write_temp_config(contents: &str) -> PathBuf {
  let path = std::env::temp_dir().join(format!("rolodex-{}.toml", Uuid::new_v4()));
  std::fs::write(&path, contents).unwrap();
  path
}

// ─── Configuration ────────────────────────────────────────────────────────────

#[test]
fn missing_file_yields_defaults() {
  let cfg = load_config_with(Path::new("/nonexistent/rolodex.toml"), env_with(&[])).unwrap();
  assert_eq!(cfg, ServerConfig::default());
  assert_eq!(cfg.port, 8080);
  assert_eq!(cfg.store_path, PathBuf::from("contacts.db"));
  assert!(cfg.mail.enabled);
  assert_eq!(cfg.mail.relay_port, 25);
  assert_eq!(cfg.mail.tls, MailTls::Opportunistic);
}

#[test]
fn file_values_override_defaults() {
  let path = write_temp_config(
    r#"
port = 9000
store_path = "/var/lib/rolodex/contacts.db"

[mail]
enabled = false
tls = "wrapper"
relay_port = 465
"#,
  );
  let cfg = load_config_with(&path, env_with(&[])).unwrap();
  std::fs::remove_file(&path).ok();

  assert_eq!(cfg.port, 9000);
  assert_eq!(cfg.host, "127.0.0.1");
  assert_eq!(cfg.store_path, PathBuf::from("/var/lib/rolodex/contacts.db"));
  assert!(!cfg.mail.enabled);
  assert_eq!(cfg.mail.tls, MailTls::Wrapper);
  assert_eq!(cfg.mail.relay_port, 465);
  assert_eq!(cfg.mail.subject, "ContactManager System Alert");
}

#[test]
fn environment_overrides_file() {
  let path = write_temp_config("port = 9000\n");
  let id = Uuid::new_v4();
  let id_str = id.to_string();
  let cfg = load_config_with(
    &path,
    env_with(&[
      ("ROLODEX_PORT", "9100"),
      ("ROLODEX_MAIL__RELAY_HOST", "smtp.internal"),
      ("ROLODEX_PRIMARY_EMAIL_BACKFILL", id_str.as_str()),
    ]),
  )
  .unwrap();
  std::fs::remove_file(&path).ok();

  assert_eq!(cfg.port, 9100);
  assert_eq!(cfg.mail.relay_host, "smtp.internal");
  assert_eq!(cfg.primary_email_backfill, vec![id]);
}

#[test]
fn unknown_tls_mode_is_rejected() {
  let path = write_temp_config("[mail]\ntls = \"sometimes\"\n");
  let res = load_config_with(&path, env_with(&[]));
  std::fs::remove_file(&path).ok();
  assert!(res.is_err());
}

#[test]
fn tilde_expands_to_home() {
  let Ok(home) = std::env::var("HOME") else { return };
  assert_eq!(expand_tilde(Path::new("~/contacts.db")), PathBuf::from(home).join("contacts.db"));
  assert_eq!(expand_tilde(Path::new("/abs/contacts.db")), PathBuf::from("/abs/contacts.db"));
}

// ─── Mail ─────────────────────────────────────────────────────────────────────

#[test]
fn alert_message_carries_defaults() {
  let notifier = SmtpNotifier::new(&MailConfig::default()).unwrap();
  let id = Uuid::new_v4();
  let message = notifier.compose(id).unwrap();

  let envelope = message.envelope();
  assert_eq!(envelope.from().unwrap().to_string(), "noreply@contactmanager.com");
  assert_eq!(envelope.to()[0].to_string(), "Admin@contactmanager.com");

  let text = String::from_utf8(message.formatted()).unwrap();
  assert!(text.contains("Subject: ContactManager System Alert"), "{text}");
  assert!(text.contains("Content-Type: text/plain"), "{text}");
  assert!(text.contains(&format!("Contact with id:{id} was updated")), "{text}");
}

#[test]
fn alert_body_names_the_contact() {
  let id = Uuid::nil();
  assert_eq!(alert_body(id), "Contact with id:00000000-0000-0000-0000-000000000000 was updated");
}

#[test]
fn bad_mailbox_fails_construction() {
  let cfg = MailConfig { to: "not an address".to_owned(), ..MailConfig::default() };
  match SmtpNotifier::new(&cfg) {
    Err(MailError::Address { field, .. }) => assert_eq!(field, "to"),
    Err(e) => panic!("unexpected error: {e}"),
    Ok(_) => panic!("expected an address error"),
  }
}

#[test]
fn plain_transport_builds_without_tls() {
  let cfg = MailConfig { tls: MailTls::None, ..MailConfig::default() };
  assert!(SmtpNotifier::new(&cfg).is_ok());
}

#[tokio::test]
async fn disabled_notifier_succeeds() {
  assert!(DisabledNotifier.contact_saved(Uuid::new_v4()).await.is_ok());
}
