//! Value objects exchanged with the reconciliation core.

use serde::{Deserialize, Serialize};

use crate::light::{LightState, WriteSource};

/// A request to set the light's power, submitted by one control surface.
///
/// Requests are moved into the reconciler and consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRequest {
    pub requested_power: bool,
    pub source: WriteSource,
    /// Revision the writer based its decision on. `None` means the write
    /// applies whatever the current revision is.
    pub observed_revision: Option<u64>,
}

impl ChangeRequest {
    /// A write applied regardless of the current revision.
    #[must_use]
    pub fn unconditional(requested_power: bool, source: WriteSource) -> Self {
        Self {
            requested_power,
            source,
            observed_revision: None,
        }
    }

    /// A write that only applies if the store is still at `revision`.
    #[must_use]
    pub fn conditional(requested_power: bool, source: WriteSource, revision: u64) -> Self {
        Self {
            requested_power,
            source,
            observed_revision: Some(revision),
        }
    }

    /// Whether the write carries an optimistic-concurrency token.
    #[must_use]
    pub fn is_conditional(&self) -> bool {
        self.observed_revision.is_some()
    }
}

/// Emitted after every committed write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub state: LightState,
    pub previous_power: bool,
}

impl ChangeEvent {
    /// Event describing `state` as it stands, without a preceding write.
    ///
    /// Used to seed new subscribers so they never start stale.
    #[must_use]
    pub fn snapshot(state: LightState) -> Self {
        let previous_power = state.power;
        Self {
            state,
            previous_power,
        }
    }

    /// Whether the write flipped the light.
    #[must_use]
    pub fn power_changed(&self) -> bool {
        self.previous_power != self.state.power
    }
}
