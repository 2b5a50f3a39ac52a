//! Output port: the physical light driver.

use smartlight_domain::error::PortError;

/// Drives the bulb hardware (GPIO/PWM behind the scenes).
pub trait LightOutput: Send + Sync {
    /// Switch the light on or off.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the driver rejects the command.
    fn set_output(&self, on: bool) -> Result<(), PortError>;

    /// What the driver is currently emitting.
    fn output(&self) -> bool;
}
