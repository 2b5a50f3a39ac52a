//! Light state: the single canonical entity of the device.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// UTC timestamp recorded on every committed write.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// The closed set of actors allowed to write the light state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteSource {
    /// Same-device actor: local network endpoint or the physical push-button.
    Local,
    /// The cloud agent's parameter service.
    Cloud,
    /// A scene activation or a schedule firing.
    Scene,
}

impl fmt::Display for WriteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Cloud => f.write_str("cloud"),
            Self::Scene => f.write_str("scene"),
        }
    }
}

/// Snapshot of the light.
///
/// `power` and `revision` always travel together: a snapshot is either the
/// state before a write or the state after it, never a mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightState {
    pub power: bool,
    /// Strictly increasing on every committed write, starting at `0`.
    pub revision: u64,
    /// `None` until the first write commits.
    pub last_writer: Option<WriteSource>,
    pub updated_at: Timestamp,
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            power: false,
            revision: 0,
            last_writer: None,
            updated_at: now(),
        }
    }
}

impl LightState {
    /// The boot state: off, revision `0`, never written.
    #[must_use]
    pub fn initial() -> Self {
        Self::default()
    }

    /// Build the state that follows `self` once `source` writes `power`.
    ///
    /// The revision is bumped even when `power` is unchanged: every write
    /// that passes the revision check is a distinct version.
    #[must_use]
    pub fn successor(&self, power: bool, source: WriteSource, at: Timestamp) -> Self {
        Self {
            power,
            revision: self.revision + 1,
            last_writer: Some(source),
            updated_at: at,
        }
    }
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let power = if self.power { "on" } else { "off" };
        write!(f, "{power} (rev {})", self.revision)
    }
}
