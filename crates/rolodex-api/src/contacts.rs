//! Handlers for `/contacts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/contacts` | All contacts by first name, without children |
//! | `GET`    | `/contacts/new` | Empty edit form with title choices |
//! | `GET`    | `/contacts/{id}/edit` | Contact with children and title choices; 404 if not found |
//! | `POST`   | `/contacts` | Body: [`SaveContactRequest`]; 200 with empty body |
//! | `DELETE` | `/contacts/{id}` | 200 with empty body; 400 if not found |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
};
use rolodex_core::{
  contact::Contact, request::SaveContactRequest, store::ContactStore, view::EditContactView,
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /contacts`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  Ok(Json(state.service.list().await?))
}

// ─── Edit forms ───────────────────────────────────────────────────────────────

/// `GET /contacts/new`
pub async fn new_form<S>(State(state): State<AppState<S>>) -> Json<EditContactView>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  Json(state.service.new_contact())
}

/// `GET /contacts/{id}/edit`
pub async fn edit_form<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<EditContactView>, ApiError>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  Ok(Json(state.service.fetch_for_edit(id).await?))
}

// ─── Save ─────────────────────────────────────────────────────────────────────

/// `POST /contacts`: create when `contact_id` is absent, otherwise update.
///
/// Clients re-fetch the list afterwards; the response body is empty.
pub async fn save<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<SaveContactRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let Json(request) = body?;
  state.service.save(request).await?;
  Ok(StatusCode::OK)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /contacts/{id}`
///
/// An unknown id is answered with 400 rather than 404.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  match state.service.delete(id).await {
    Ok(()) => Ok(StatusCode::OK),
    Err(rolodex_core::Error::ContactNotFound(id)) => {
      Err(ApiError::BadRequest(format!("contact {id} does not exist")))
    }
    Err(e) => Err(e.into()),
  }
}
