//! # smartlight-adapter-scene
//!
//! Scene and schedule control surface.
//!
//! ## Responsibilities
//! - Hold the named scenes of the device (power presets)
//! - Apply a scene as a **conditional** write against the revision current
//!   at activation time ([`surface::SceneSurface`])
//! - Fire scenes periodically ([`schedule::spawn_schedule`])
//!
//! ## Dependency rule
//! Depends on `smartlight-app` and `smartlight-domain` only.

pub mod schedule;
pub mod surface;
