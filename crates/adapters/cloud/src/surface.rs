//! The cloud control surface.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::{Value, json};

use smartlight_app::ports::{ChangePublisher, CloudReporter};
use smartlight_app::reconciler::Reconciler;
use smartlight_app::surface::ControlSurface;
use smartlight_domain::change::{ChangeEvent, ChangeRequest};
use smartlight_domain::error::{DecodeError, LightError};
use smartlight_domain::light::{LightState, WriteSource};

use crate::params::{power_from_params, to_params};

/// Answer to a parameter update from the cloud agent.
#[derive(Debug)]
pub enum CloudAck {
    /// The write committed; carries the new state.
    Accepted(LightState),
    /// The write did not commit. A conflict carries the current state.
    Rejected(LightError),
}

impl CloudAck {
    /// Whether the update committed.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The state the agent should now consider current, if known.
    #[must_use]
    pub fn state(&self) -> Option<&LightState> {
        match self {
            Self::Accepted(state) => Some(state),
            Self::Rejected(err) => err.current(),
        }
    }
}

/// Adapts cloud parameter updates to the core.
///
/// Cloud writes are conditional: each one names the revision it was based
/// on, and loses to anything that committed since. A set-params command
/// without an explicit revision is based on the last state this surface
/// reported to the cloud.
pub struct CloudSurface<R, P> {
    reporter: R,
    reconciler: Arc<Reconciler<P>>,
    last_reported: AtomicU64,
}

impl<R, P> CloudSurface<R, P>
where
    R: CloudReporter,
    P: ChangePublisher + Send + Sync + 'static,
{
    /// Create a surface reporting through `reporter` and writing through
    /// `reconciler`.
    pub fn new(reporter: R, reconciler: Arc<Reconciler<P>>) -> Self {
        let known = reconciler.state().revision;
        Self {
            reporter,
            reconciler,
            last_reported: AtomicU64::new(known),
        }
    }

    /// Revision of the last state successfully reported to the cloud.
    #[must_use]
    pub fn last_reported(&self) -> u64 {
        self.last_reported.load(Ordering::Acquire)
    }

    /// Agent callback: the cloud wants the light at `desired_power`, based on
    /// the state it saw at `reported_revision`.
    pub async fn on_cloud_param_update(
        &self,
        desired_power: bool,
        reported_revision: u64,
    ) -> CloudAck {
        let req =
            ChangeRequest::conditional(desired_power, WriteSource::Cloud, reported_revision);
        match self.reconciler.apply(req).await {
            Ok(state) => CloudAck::Accepted(state),
            Err(err) => {
                tracing::info!(
                    error = %err,
                    desired_power,
                    reported_revision,
                    "cloud param update rejected"
                );
                CloudAck::Rejected(err)
            }
        }
    }

    /// Serve a set-params command and build its response document.
    ///
    /// The response always carries `status` (`"success"` or `"fail"`) and,
    /// whenever the current state is known, the committed `params`.
    pub async fn handle_set_params(&self, payload: &[u8]) -> Value {
        let request = serde_json::from_slice::<Value>(payload)
            .map_err(DecodeError::InvalidJson)
            .and_then(|raw| self.decode(raw));

        let ack = match request {
            Ok(req) => match self.reconciler.apply(req).await {
                Ok(state) => CloudAck::Accepted(state),
                Err(err) => CloudAck::Rejected(err),
            },
            Err(err) => {
                tracing::warn!(error = %err, "malformed set-params command");
                return json!({ "status": "fail" });
            }
        };

        let status = if ack.is_accepted() { "success" } else { "fail" };
        match ack.state() {
            Some(state) => json!({ "status": status, "params": self.encode(state) }),
            None => json!({ "status": status }),
        }
    }
}

impl<R, P> ControlSurface for CloudSurface<R, P>
where
    R: CloudReporter,
    P: ChangePublisher + Send + Sync + 'static,
{
    type Request = Value;
    type Response = Value;

    fn source(&self) -> WriteSource {
        WriteSource::Cloud
    }

    fn decode(&self, raw: Value) -> Result<ChangeRequest, DecodeError> {
        let params = raw.get("params").ok_or(DecodeError::MissingField("params"))?;
        let power = power_from_params(params)?;
        let revision = match raw.get("revision") {
            None | Some(Value::Null) => self.last_reported(),
            Some(value) => value.as_u64().ok_or(DecodeError::InvalidParam {
                field: "revision",
                expected: "unsigned integer",
            })?,
        };
        Ok(ChangeRequest::conditional(power, self.source(), revision))
    }

    fn encode(&self, state: &LightState) -> Value {
        to_params(state)
    }

    async fn on_event(&self, event: ChangeEvent) {
        let revision = event.state.revision;
        match self.reporter.report_state(&event.state).await {
            Ok(()) => {
                self.last_reported.fetch_max(revision, Ordering::AcqRel);
                tracing::debug!(revision, "state reported to cloud");
            }
            Err(err) => tracing::warn!(error = %err, revision, "cloud report failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartlight_app::notifier::Notifier;
    use smartlight_app::state_store::StateStore;
    use smartlight_domain::error::PortError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingReporter {
        reports: Mutex<Vec<LightState>>,
        fail: bool,
    }

    impl CloudReporter for RecordingReporter {
        async fn report_state(&self, state: &LightState) -> Result<(), PortError> {
            if self.fail {
                return Err(PortError::new("cloud reporter", "agent offline"));
            }
            self.reports.lock().unwrap().push(state.clone());
            Ok(())
        }
    }

    type TestSurface = CloudSurface<Arc<RecordingReporter>, Arc<Notifier>>;

    fn make_surface(
        reporter: Arc<RecordingReporter>,
    ) -> (TestSurface, Arc<Reconciler<Arc<Notifier>>>) {
        let store = Arc::new(StateStore::new());
        let notifier = Arc::new(Notifier::new(store.read()));
        let reconciler = Arc::new(Reconciler::new(store, notifier));
        (CloudSurface::new(reporter, Arc::clone(&reconciler)), reconciler)
    }

    #[tokio::test]
    async fn should_accept_update_based_on_current_revision() {
        let (surface, reconciler) = make_surface(Arc::default());
        let ack = surface.on_cloud_param_update(true, 0).await;
        assert!(ack.is_accepted());
        let state = reconciler.state();
        assert!(state.power);
        assert_eq!(state.last_writer, Some(WriteSource::Cloud));
    }

    #[tokio::test]
    async fn should_reject_update_based_on_stale_revision_with_current_state() {
        let (surface, reconciler) = make_surface(Arc::default());
        reconciler
            .apply(ChangeRequest::unconditional(true, WriteSource::Local))
            .await
            .unwrap();

        let ack = surface.on_cloud_param_update(false, 0).await;
        assert!(!ack.is_accepted());
        let current = ack.state().unwrap();
        assert_eq!(current.revision, 1);
        assert!(current.power);
        assert!(reconciler.state().power);
    }

    #[tokio::test]
    async fn should_answer_set_params_with_committed_params() {
        let (surface, _) = make_surface(Arc::default());
        let response = surface
            .handle_set_params(br#"{"params": {"Light": {"Power": true}}}"#)
            .await;
        assert_eq!(
            response,
            json!({"status": "success", "params": {"Light": {"Power": true}}})
        );
    }

    #[tokio::test]
    async fn should_fail_set_params_with_current_params_on_conflict() {
        let (surface, reconciler) = make_surface(Arc::default());
        reconciler
            .apply(ChangeRequest::unconditional(true, WriteSource::Local))
            .await
            .unwrap();

        // nothing reported yet: the command is based on revision 0
        let response = surface
            .handle_set_params(br#"{"params": {"Light": {"Power": false}}}"#)
            .await;
        assert_eq!(
            response,
            json!({"status": "fail", "params": {"Light": {"Power": true}}})
        );
    }

    #[tokio::test]
    async fn should_fail_set_params_without_params_object() {
        let (surface, reconciler) = make_surface(Arc::default());
        let response = surface.handle_set_params(br#"{"Light": {"Power": true}}"#).await;
        assert_eq!(response, json!({"status": "fail"}));
        assert_eq!(reconciler.state().revision, 0);
    }

    #[tokio::test]
    async fn should_use_explicit_revision_from_command() {
        let (surface, _) = make_surface(Arc::default());
        let req = surface
            .decode(json!({"params": {"Light": {"Power": true}}, "revision": 3}))
            .unwrap();
        assert_eq!(req.observed_revision, Some(3));
        assert_eq!(req.source, WriteSource::Cloud);
    }

    #[tokio::test]
    async fn should_report_state_and_remember_revision() {
        let reporter = Arc::new(RecordingReporter::default());
        let (surface, reconciler) = make_surface(Arc::clone(&reporter));
        let state = reconciler
            .apply(ChangeRequest::unconditional(true, WriteSource::Local))
            .await
            .unwrap();

        surface
            .on_event(ChangeEvent {
                state: state.clone(),
                previous_power: false,
            })
            .await;

        assert_eq!(surface.last_reported(), 1);
        assert_eq!(*reporter.reports.lock().unwrap(), vec![state]);
    }

    #[tokio::test]
    async fn should_keep_last_reported_revision_when_report_fails() {
        let reporter = Arc::new(RecordingReporter {
            fail: true,
            ..RecordingReporter::default()
        });
        let (surface, reconciler) = make_surface(reporter);
        let state = reconciler.toggle(WriteSource::Local).await.unwrap();

        surface.on_event(ChangeEvent::snapshot(state)).await;
        assert_eq!(surface.last_reported(), 0);
    }
}
