//! Periodic scene activation.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use smartlight_app::ports::ChangePublisher;
use smartlight_domain::error::LightError;

use crate::surface::SceneSurface;

/// Fires `scene` every `interval_secs` seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Schedule {
    pub name: String,
    pub scene: String,
    pub interval_secs: u64,
}

impl Schedule {
    /// Period between two activations.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Run `schedule` on a background task until the handle is aborted.
///
/// The first activation happens one interval after spawning. Missed ticks
/// are skipped rather than replayed in a burst. A schedule with a zero
/// interval never fires: the task logs it and ends immediately.
pub fn spawn_schedule<P>(surface: Arc<SceneSurface<P>>, schedule: Schedule) -> JoinHandle<()>
where
    P: ChangePublisher + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let period = schedule.interval();
        if period.is_zero() {
            tracing::warn!(schedule = %schedule.name, "zero interval, schedule disabled");
            return;
        }
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            match surface.activate(&schedule.scene).await {
                Ok(state) => tracing::debug!(
                    schedule = %schedule.name,
                    revision = state.revision,
                    "schedule fired"
                ),
                Err(LightError::Conflict(err)) => tracing::info!(
                    schedule = %schedule.name,
                    current = err.current.revision,
                    "schedule lost to a concurrent write"
                ),
                Err(err) => tracing::warn!(
                    schedule = %schedule.name,
                    error = %err,
                    "schedule failed"
                ),
            }
        }
    })
}
