//! Simulated push-button wired to the reconciler.

use std::sync::Arc;

use smartlight_app::ports::ChangePublisher;
use smartlight_app::reconciler::Reconciler;
use smartlight_domain::error::LightError;
use smartlight_domain::light::{LightState, WriteSource};

/// A physical button on the device: each short press flips the light.
///
/// A press is a same-device action, so it writes as [`WriteSource::Local`].
pub struct PushButton<P> {
    reconciler: Arc<Reconciler<P>>,
}

impl<P> PushButton<P>
where
    P: ChangePublisher + Send + Sync + 'static,
{
    /// Wire the button to `reconciler`.
    pub fn new(reconciler: Arc<Reconciler<P>>) -> Self {
        Self { reconciler }
    }

    /// Handle one short press.
    ///
    /// # Errors
    ///
    /// Returns [`LightError::StoreUnavailable`] if write access timed out.
    pub async fn press(&self) -> Result<LightState, LightError> {
        let state = self.reconciler.toggle(WriteSource::Local).await?;
        tracing::debug!(power = state.power, revision = state.revision, "button pressed");
        Ok(state)
    }
}
