//! HTTP surface for askrelay.
//!
//! Axum JSON API: `POST /ask` (and the `/chat/ask` alias) plus `GET /health`.

pub mod error;
pub mod handlers;
pub mod router;
