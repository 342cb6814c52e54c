//! JSON REST API for Rolodex.
//!
//! Exposes an axum [`Router`] backed by a [`ContactService`] over any
//! [`ContactStore`], plus a Server-Sent-Events stream of change signals.
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(rolodex_api::api_router(AppState { service, feed }))
//! ```

pub mod contacts;
pub mod error;
pub mod events;

use std::sync::Arc;

use axum::{Router, routing::get};
use rolodex_core::{service::ContactService, store::ContactStore};

pub use error::ApiError;
pub use events::ChangeFeed;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct AppState<S: ContactStore> {
  pub service: Arc<ContactService<S>>,
  /// The same feed the service announces on; SSE clients subscribe here.
  pub feed:    ChangeFeed,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/contacts", get(contacts::list::<S>).post(contacts::save::<S>))
    .route("/contacts/new", get(contacts::new_form::<S>))
    .route("/contacts/events", get(events::stream::<S>))
    .route("/contacts/{id}", axum::routing::delete(contacts::delete::<S>))
    .route("/contacts/{id}/edit", get(contacts::edit_form::<S>))
    .with_state(state)
}
