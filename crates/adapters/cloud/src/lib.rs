//! # smartlight-adapter-cloud
//!
//! Cloud parameter service surface.
//!
//! ## Responsibilities
//! - Turn the agent's parameter-update callback into a **conditional**
//!   change request and answer accept/reject ([`surface::CloudSurface`])
//! - Serve the set-params command (`{"params": {"Light": {"Power": …}}}`)
//!   and answer with the committed parameters
//! - Report every committed change back to the agent through the
//!   [`CloudReporter`](smartlight_app::ports::CloudReporter) port
//!
//! The agent transport itself (MQTT, TLS, authentication) is an external
//! collaborator; [`reporter::TracingReporter`] stands in when none is attached.
//!
//! ## Dependency rule
//! Depends on `smartlight-app` and `smartlight-domain` only.

pub mod params;
pub mod reporter;
pub mod surface;
