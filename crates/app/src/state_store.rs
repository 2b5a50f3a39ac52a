//! Canonical light state holder.

use std::sync::{PoisonError, RwLock};

use smartlight_domain::error::ConflictError;
use smartlight_domain::light::{LightState, WriteSource, now};

/// Owns the one [`LightState`] of the device.
///
/// Reads run concurrently; a write holds the lock for the duration of the
/// revision check and the swap, so a reader sees either the state before the
/// write or the state after it. The store never retries: deciding what to do
/// with a [`ConflictError`] belongs to the reconciler.
#[derive(Debug, Default)]
pub struct StateStore {
    state: RwLock<LightState>,
}

impl StateStore {
    /// Create a store holding the boot state (off, revision `0`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consistent snapshot of the current state.
    #[must_use]
    pub fn read(&self) -> LightState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `new_power` if `expected_revision` is `None` or still current.
    ///
    /// On success the revision is bumped and `source` recorded as the last
    /// writer, even when `new_power` equals the current power.
    ///
    /// # Errors
    ///
    /// Returns [`ConflictError`] carrying the current state when
    /// `expected_revision` does not match it.
    pub fn compare_and_set(
        &self,
        expected_revision: Option<u64>,
        new_power: bool,
        source: WriteSource,
    ) -> Result<LightState, ConflictError> {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(expected) = expected_revision
            && expected != state.revision
        {
            return Err(ConflictError {
                current: state.clone(),
            });
        }

        let next = state.successor(new_power, source, now());
        *state = next.clone();
        Ok(next)
    }
}
