//! # smartlight-adapter-virtual
//!
//! Simulated hardware for running the controller without a board.
//!
//! | Device | Role |
//! |--------|------|
//! | [`VirtualLamp`] | implements the `LightOutput` port in memory |
//! | [`PushButton`] | a short press toggles the light as a local write |
//!
//! ## Dependency rule
//!
//! Depends on `smartlight-app` (port traits) and `smartlight-domain` only.

mod button;
mod lamp;

pub use button::PushButton;
pub use lamp::VirtualLamp;
