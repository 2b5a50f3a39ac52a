//! The local network control surface.

use axum::body::Bytes;
use serde::{Deserialize, Serialize};

use smartlight_app::surface::ControlSurface;
use smartlight_domain::change::{ChangeEvent, ChangeRequest};
use smartlight_domain::error::DecodeError;
use smartlight_domain::light::{LightState, WriteSource};

/// Body returned by every successful `/light` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBody {
    pub status: bool,
}

/// Adapts local HTTP bodies to the core.
///
/// A local client does not know the current revision, so every write it
/// sends is unconditional.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSurface;

impl ControlSurface for LocalSurface {
    type Request = Bytes;
    type Response = StatusBody;

    fn source(&self) -> WriteSource {
        WriteSource::Local
    }

    fn decode(&self, raw: Bytes) -> Result<ChangeRequest, DecodeError> {
        let payload: serde_json::Value =
            serde_json::from_slice(&raw).map_err(DecodeError::InvalidJson)?;
        let power = payload
            .get("power")
            .ok_or(DecodeError::MissingField("power"))?
            .as_bool()
            .ok_or(DecodeError::InvalidParam {
                field: "power",
                expected: "boolean",
            })?;
        Ok(ChangeRequest::unconditional(power, self.source()))
    }

    fn encode(&self, state: &LightState) -> StatusBody {
        StatusBody {
            status: state.power,
        }
    }

    // Local clients poll; nothing to push.
    async fn on_event(&self, event: ChangeEvent) {
        tracing::trace!(revision = event.state.revision, "local surface observed change");
    }
}
