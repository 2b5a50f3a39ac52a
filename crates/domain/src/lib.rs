//! # smartlight-domain
//!
//! Pure domain model for the smartlight bulb controller.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers and the error taxonomy
//! - Define the canonical [`LightState`](light::LightState) and who wrote it
//! - Define the value objects exchanged with the core:
//!   [`ChangeRequest`](change::ChangeRequest) in, [`ChangeEvent`](change::ChangeEvent) out
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod change;
pub mod light;
