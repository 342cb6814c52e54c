//! rolodex-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and serves the contact API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use rolodex_api::{AppState, ChangeFeed};
use rolodex_core::{notify::MailNotifier, service::ContactService};
use rolodex_server::{
  expand_tilde, load_config,
  mail::{DisabledNotifier, SmtpNotifier},
};
use rolodex_store_sqlite::{SqliteStore, StoreOptions};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Rolodex contact server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = load_config(&cli.config).context("failed to load configuration")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let options = StoreOptions {
    primary_email_backfill: server_cfg.primary_email_backfill.clone(),
  };
  let store = SqliteStore::open_with(&store_path, options)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let mailer: Arc<dyn MailNotifier> = if server_cfg.mail.enabled {
    let notifier = SmtpNotifier::new(&server_cfg.mail).context("invalid mail configuration")?;
    tracing::info!(
      relay = %server_cfg.mail.relay_host,
      port = server_cfg.mail.relay_port,
      "mail alerts enabled"
    );
    Arc::new(notifier)
  } else {
    tracing::info!("mail alerts disabled");
    Arc::new(DisabledNotifier)
  };

  let feed = ChangeFeed::default();
  let service = ContactService::new(Arc::new(store), Arc::new(feed.clone()), mailer);
  let state = AppState { service: Arc::new(service), feed };

  let app = rolodex_api::api_router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
