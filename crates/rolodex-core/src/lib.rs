//! Core types and trait definitions for the Rolodex contact manager.
//!
//! This crate has no HTTP or database dependencies.
//! All other crates depend on it; the save/delete orchestration lives in
//! [`service::ContactService`] and talks to storage and notification sinks
//! only through the traits defined here.

// Native `async fn` in traits; the store trait spells out its `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod contact;
pub mod error;
pub mod notify;
pub mod request;
pub mod service;
pub mod store;
pub mod view;

pub use error::{Error, Result};
