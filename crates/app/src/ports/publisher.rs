//! Publisher port: where committed changes are handed off.

use std::sync::Arc;

use smartlight_domain::change::ChangeEvent;

/// Receives every committed [`ChangeEvent`], in commit order.
///
/// Called from inside the reconciler's exclusive section, so implementations
/// must return immediately: no IO, no waiting on subscribers.
pub trait ChangePublisher {
    fn publish(&self, event: ChangeEvent);
}

impl<T: ChangePublisher + ?Sized> ChangePublisher for Arc<T> {
    fn publish(&self, event: ChangeEvent) {
        (**self).publish(event);
    }
}
