//! Cloud port: pushes the light state to the cloud agent.

use std::future::Future;
use std::sync::Arc;

use smartlight_domain::error::PortError;
use smartlight_domain::light::LightState;

/// Reports state to the cloud parameter service.
///
/// The agent's transport and authentication live behind this trait.
pub trait CloudReporter: Send + Sync {
    /// Push `state` as the device's reported parameters.
    fn report_state(
        &self,
        state: &LightState,
    ) -> impl Future<Output = Result<(), PortError>> + Send;
}

impl<T: CloudReporter> CloudReporter for Arc<T> {
    fn report_state(
        &self,
        state: &LightState,
    ) -> impl Future<Output = Result<(), PortError>> + Send {
        (**self).report_state(state)
    }
}
