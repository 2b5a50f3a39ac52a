//! Change fan-out backed by a tokio [`watch`] channel.

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use smartlight_domain::change::ChangeEvent;
use smartlight_domain::id::SurfaceId;
use smartlight_domain::light::LightState;

use crate::ports::ChangePublisher;

/// Delivers committed changes to every subscribed control surface.
///
/// The channel keeps only the latest event: a subscriber that falls behind
/// skips intermediate revisions but always catches up to the newest one, and
/// publishing never waits on anybody.
pub struct Notifier {
    sender: watch::Sender<ChangeEvent>,
}

impl Notifier {
    /// Create a notifier whose subscribers start from `initial`.
    #[must_use]
    pub fn new(initial: LightState) -> Self {
        let (sender, _) = watch::channel(ChangeEvent::snapshot(initial));
        Self { sender }
    }

    /// Register a surface.
    ///
    /// The first item of the returned subscription is the latest event, even
    /// if nothing is written after subscribing.
    #[must_use]
    pub fn subscribe(&self, surface: SurfaceId) -> Subscription {
        let mut receiver = self.sender.subscribe();
        receiver.mark_changed();
        tracing::debug!(
            %surface,
            subscribers = self.sender.receiver_count(),
            "surface subscribed"
        );
        Subscription { surface, receiver }
    }

    /// The most recently published event.
    #[must_use]
    pub fn latest(&self) -> ChangeEvent {
        self.sender.borrow().clone()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ChangePublisher for Notifier {
    fn publish(&self, event: ChangeEvent) {
        // works with zero subscribers too: the value is kept for late joiners
        self.sender.send_replace(event);
    }
}

/// One surface's view of the change sequence.
pub struct Subscription {
    surface: SurfaceId,
    receiver: watch::Receiver<ChangeEvent>,
}

impl Subscription {
    /// The surface this subscription was registered for.
    #[must_use]
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Wait for the next unseen event.
    ///
    /// Returns `None` once the notifier is gone.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Turn the subscription into a [`Stream`](tokio_stream::Stream) that
    /// starts with the latest event.
    #[must_use]
    pub fn into_stream(self) -> WatchStream<ChangeEvent> {
        WatchStream::new(self.receiver)
    }
}
