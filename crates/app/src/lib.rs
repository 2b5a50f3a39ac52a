//! # smartlight-app
//!
//! Application layer: the state reconciliation core and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Own the canonical light state ([`state_store::StateStore`])
//! - Serialize every write through one exclusive section
//!   ([`reconciler::Reconciler`]), whichever transport it came from
//! - Fan committed changes out to every control surface ([`notifier::Notifier`])
//! - Define the contract each control surface implements
//!   ([`surface::ControlSurface`])
//! - Define **port traits** for the external collaborators:
//!   - `ChangePublisher`: where committed changes go
//!   - `CloudReporter`: pushes state to the cloud agent
//!   - `LightOutput`: drives the physical light
//!
//! ## Dependency rule
//! Depends on `smartlight-domain` only (plus `tokio` for synchronization).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod driver;
pub mod notifier;
pub mod ports;
pub mod reconciler;
pub mod state_store;
pub mod surface;
