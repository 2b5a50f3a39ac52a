//! # smartlight-adapter-http-axum
//!
//! Local network control surface built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Decode local `/light` requests into unconditional change requests
//!   ([`surface::LocalSurface`]) and answer with `{"status": <power>}`
//! - Expose the transport-agnostic entry point
//!   [`local::handle_local_request`] that the router (or any other HTTP
//!   stack) forwards to
//! - Stream committed changes as Server-Sent Events (`/light/events`)
//! - Map core errors into HTTP status codes ([`error::ApiError`])
//!
//! ## Dependency rule
//! Depends on `smartlight-app` (core + ports) and `smartlight-domain`.
//! Never leaks axum types into the domain.

pub mod error;
pub mod local;
pub mod router;
pub mod sse;
pub mod state;
pub mod surface;
