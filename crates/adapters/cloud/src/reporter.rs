//! Reporter used when no cloud agent transport is attached.

use smartlight_app::ports::CloudReporter;
use smartlight_domain::error::PortError;
use smartlight_domain::light::LightState;

use crate::params::to_params;

/// Logs every report instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl CloudReporter for TracingReporter {
    async fn report_state(&self, state: &LightState) -> Result<(), PortError> {
        tracing::info!(
            revision = state.revision,
            params = %to_params(state),
            "reporting params to cloud"
        );
        Ok(())
    }
}
