//! Shared application state for axum handlers.

use std::sync::Arc;

use smartlight_app::notifier::Notifier;
use smartlight_app::ports::ChangePublisher;
use smartlight_app::reconciler::Reconciler;

use crate::surface::LocalSurface;

/// State shared across all axum handlers.
///
/// Generic over the reconciler's publisher to avoid dynamic dispatch.
/// `Clone` is implemented manually so only the `Arc` wrappers are cloned.
pub struct AppState<P> {
    /// The write path every request goes through.
    pub reconciler: Arc<Reconciler<P>>,
    /// Source of the SSE feed.
    pub notifier: Arc<Notifier>,
    /// Decoder/encoder for `/light` bodies.
    pub surface: LocalSurface,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            reconciler: Arc::clone(&self.reconciler),
            notifier: Arc::clone(&self.notifier),
            surface: self.surface,
        }
    }
}

impl<P> AppState<P>
where
    P: ChangePublisher + Send + Sync + 'static,
{
    /// Create the state from the shared core components.
    pub fn new(reconciler: Arc<Reconciler<P>>, notifier: Arc<Notifier>) -> Self {
        Self {
            reconciler,
            notifier,
            surface: LocalSurface,
        }
    }
}
