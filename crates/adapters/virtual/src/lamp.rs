//! Virtual lamp: remembers what it was told to emit.

use std::sync::Mutex;

use smartlight_app::ports::LightOutput;
use smartlight_domain::error::PortError;

/// A simulated bulb.
///
/// Starts dark, like a driver that has been initialised but not yet told
/// anything by the core.
#[derive(Debug, Default)]
pub struct VirtualLamp {
    on: Mutex<bool>,
    switches: Mutex<u64>,
}

impl VirtualLamp {
    /// How many times the output actually changed.
    #[must_use]
    pub fn switch_count(&self) -> u64 {
        *self
            .switches
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lock_on(&self) -> std::sync::MutexGuard<'_, bool> {
        self.on
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl LightOutput for VirtualLamp {
    fn set_output(&self, on: bool) -> Result<(), PortError> {
        let mut current = self.lock_on();
        if *current != on {
            *current = on;
            *self
                .switches
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner) += 1;
            tracing::info!(on, "virtual lamp switched");
        }
        Ok(())
    }

    fn output(&self) -> bool {
        *self.lock_on()
    }
}
