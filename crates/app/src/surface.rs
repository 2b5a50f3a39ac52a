//! Control surface contract and the listener that feeds it.
//!
//! A control surface adapts one transport to the core: it decodes inbound
//! requests into [`ChangeRequest`]s, encodes [`LightState`]s into responses,
//! and reacts to changes committed by anyone (including other surfaces).
//! The set of surfaces is closed: each one is a [`WriteSource`] variant.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;

use smartlight_domain::change::{ChangeEvent, ChangeRequest};
use smartlight_domain::error::DecodeError;
use smartlight_domain::id::SurfaceId;
use smartlight_domain::light::{LightState, WriteSource};

use crate::notifier::Notifier;

/// One transport's adapter to the reconciliation core.
pub trait ControlSurface: Send + Sync {
    /// Transport-specific inbound payload.
    type Request;
    /// Transport-specific outbound payload.
    type Response;

    /// Which variant of the closed surface set this is.
    fn source(&self) -> WriteSource;

    /// Turn a raw request into a change request. Never touches state.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the payload is malformed.
    fn decode(&self, raw: Self::Request) -> Result<ChangeRequest, DecodeError>;

    /// Render `state` for this transport.
    fn encode(&self, state: &LightState) -> Self::Response;

    /// React to a committed change. Push-style surfaces report it upstream;
    /// poll-style surfaces can ignore it.
    fn on_event(&self, event: ChangeEvent) -> impl Future<Output = ()> + Send;
}

/// Subscribe `surface` to `notifier` and drive its
/// [`on_event`](ControlSurface::on_event) on a background task.
///
/// The first call receives the current state. The task ends when the
/// notifier is dropped.
pub fn spawn_listener<S>(surface: Arc<S>, notifier: &Notifier) -> JoinHandle<()>
where
    S: ControlSurface + 'static,
{
    let mut subscription = notifier.subscribe(SurfaceId::new());
    tracing::info!(
        surface = %subscription.surface(),
        source = %surface.source(),
        "listener started"
    );

    tokio::spawn(async move {
        while let Some(event) = subscription.next().await {
            surface.on_event(event).await;
        }
        tracing::debug!(
            surface = %subscription.surface(),
            "notifier closed, listener stopped"
        );
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ChangePublisher;
    use smartlight_domain::light::now;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    struct EchoSurface {
        seen: Mutex<Vec<u64>>,
        done: mpsc::UnboundedSender<u64>,
    }

    impl ControlSurface for EchoSurface {
        type Request = bool;
        type Response = String;

        fn source(&self) -> WriteSource {
            WriteSource::Scene
        }

        fn decode(&self, raw: bool) -> Result<ChangeRequest, DecodeError> {
            Ok(ChangeRequest::unconditional(raw, self.source()))
        }

        fn encode(&self, state: &LightState) -> String {
            state.to_string()
        }

        async fn on_event(&self, event: ChangeEvent) {
            self.seen.lock().unwrap().push(event.state.revision);
            let _ = self.done.send(event.state.revision);
        }
    }

    #[tokio::test]
    async fn should_feed_current_state_then_changes_to_surface() {
        let notifier = Notifier::new(LightState::initial());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let surface = Arc::new(EchoSurface {
            seen: Mutex::new(Vec::new()),
            done: tx,
        });

        let handle = spawn_listener(Arc::clone(&surface), &notifier);
        assert_eq!(rx.recv().await, Some(0));

        let state = LightState::initial().successor(true, WriteSource::Cloud, now());
        notifier.publish(ChangeEvent {
            state,
            previous_power: false,
        });
        assert_eq!(rx.recv().await, Some(1));

        drop(notifier);
        handle.await.unwrap();
        assert_eq!(*surface.seen.lock().unwrap(), vec![0, 1]);
    }

    #[test]
    fn should_decode_with_own_source() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let surface = EchoSurface {
            seen: Mutex::new(Vec::new()),
            done: tx,
        };
        let req = surface.decode(true).unwrap();
        assert_eq!(req.source, WriteSource::Scene);
        assert!(req.requested_power);
    }
}
