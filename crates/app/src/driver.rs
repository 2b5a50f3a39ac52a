//! Keeps the light driver in step with the committed state.

use std::sync::Arc;

use tokio::task::JoinHandle;

use smartlight_domain::id::SurfaceId;

use crate::notifier::Notifier;
use crate::ports::LightOutput;

/// Follow `notifier` and drive `output` on a background task.
///
/// The driver is only called when the committed power differs from what it
/// currently emits, so repeated writes of the same power do not re-trigger
/// the fade. Driver failures are logged; the committed state stands.
pub fn spawn_output_driver<O>(output: Arc<O>, notifier: &Notifier) -> JoinHandle<()>
where
    O: LightOutput + 'static,
{
    let mut subscription = notifier.subscribe(SurfaceId::new());

    tokio::spawn(async move {
        while let Some(event) = subscription.next().await {
            let wanted = event.state.power;
            if output.output() == wanted {
                continue;
            }
            match output.set_output(wanted) {
                Ok(()) => tracing::info!(
                    power = wanted,
                    revision = event.state.revision,
                    "light output switched"
                ),
                Err(err) => tracing::warn!(
                    error = %err,
                    revision = event.state.revision,
                    "light driver rejected command"
                ),
            }
        }
        tracing::debug!(subscriber = %subscription.surface(), "output driver stopped");
    })
}
