//! Typed identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one registered control surface (a notifier subscriber).
///
/// Two surfaces of the same kind (e.g. two SSE clients) get distinct ids, so
/// logs can tell their subscriptions apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(uuid::Uuid);

impl Default for SurfaceId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl SurfaceId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_generate_unique_ids_when_called_twice() {
        assert_ne!(SurfaceId::new(), SurfaceId::new());
    }

    #[test]
    fn should_display_as_hyphenated_uuid() {
        let shown = SurfaceId::new().to_string();
        assert_eq!(shown.len(), 36);
        assert_eq!(shown.matches('-').count(), 4);
    }
}
