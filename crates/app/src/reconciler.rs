//! The single serialization point for every write to the light state.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};

use smartlight_domain::change::{ChangeEvent, ChangeRequest};
use smartlight_domain::error::{LightError, StoreUnavailableError};
use smartlight_domain::light::{LightState, WriteSource};

use crate::ports::ChangePublisher;
use crate::state_store::StateStore;

/// How long a writer waits for the write gate before giving up.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Mediates concurrent writes from every control surface.
///
/// At most one write is in flight at a time. Inside the exclusive section the
/// reconciler checks the revision, commits, and hands the resulting
/// [`ChangeEvent`] to the publisher, so events leave in commit order.
///
/// Conflict policy: a conditional write (`observed_revision = Some(_)`) that
/// lost the race is returned to the caller untouched. An unconditional write
/// is first tried against the revision it was submitted at and, if something
/// committed in between, retried once regardless of revision: same-device
/// actions win over the state they raced with.
pub struct Reconciler<P> {
    store: Arc<StateStore>,
    publisher: P,
    write_gate: Mutex<()>,
    lock_timeout: Duration,
}

impl<P: ChangePublisher + Send + Sync> Reconciler<P> {
    /// Create a reconciler writing to `store` and publishing to `publisher`.
    pub fn new(store: Arc<StateStore>, publisher: P) -> Self {
        Self {
            store,
            publisher,
            write_gate: Mutex::new(()),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Override the bounded wait for exclusive write access.
    #[must_use]
    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }

    /// Snapshot of the current state. Never waits on writers.
    #[must_use]
    pub fn state(&self) -> LightState {
        self.store.read()
    }

    /// Apply one change request.
    ///
    /// # Errors
    ///
    /// - [`LightError::Conflict`] when a conditional write observed a stale
    ///   revision; carries the current state.
    /// - [`LightError::StoreUnavailable`] when write access was not granted
    ///   within the lock timeout.
    pub async fn apply(&self, req: ChangeRequest) -> Result<LightState, LightError> {
        // the revision an unconditional writer saw when it came in
        let basis = req
            .observed_revision
            .unwrap_or_else(|| self.store.read().revision);

        let _gate = self.acquire().await?;
        let previous = self.store.read();

        let attempt = self
            .store
            .compare_and_set(Some(basis), req.requested_power, req.source);
        let committed = match attempt {
            Ok(state) => state,
            Err(conflict) if !req.is_conditional() => {
                tracing::debug!(
                    source = %req.source,
                    submitted_at = basis,
                    current = conflict.current.revision,
                    "unconditional write raced a newer state, overriding"
                );
                self.store
                    .compare_and_set(None, req.requested_power, req.source)?
            }
            Err(conflict) => {
                tracing::info!(
                    source = %req.source,
                    observed = basis,
                    current = conflict.current.revision,
                    "conditional write rejected"
                );
                return Err(conflict.into());
            }
        };

        Ok(self.commit(previous.power, committed))
    }

    /// Invert the current power on behalf of `source`.
    ///
    /// Reading and writing happen in the same exclusive section, so two
    /// concurrent toggles always yield two flips.
    ///
    /// # Errors
    ///
    /// Returns [`LightError::StoreUnavailable`] when write access was not
    /// granted within the lock timeout.
    pub async fn toggle(&self, source: WriteSource) -> Result<LightState, LightError> {
        let _gate = self.acquire().await?;
        let previous = self.store.read();
        let committed =
            self.store
                .compare_and_set(Some(previous.revision), !previous.power, source)?;
        Ok(self.commit(previous.power, committed))
    }

    /// Like [`apply`](Self::apply), but on a task of its own.
    ///
    /// Dropping the returned future (e.g. because the client hung up) does
    /// not cancel the write: it still commits and is still published.
    ///
    /// # Errors
    ///
    /// Same as [`apply`](Self::apply), plus [`LightError::Shutdown`] when the
    /// runtime stops before the write ran.
    pub async fn apply_detached(
        self: Arc<Self>,
        req: ChangeRequest,
    ) -> Result<LightState, LightError>
    where
        P: 'static,
    {
        detached(async move { self.apply(req).await }).await
    }

    /// Like [`toggle`](Self::toggle), but on a task of its own.
    ///
    /// # Errors
    ///
    /// Same as [`toggle`](Self::toggle), plus [`LightError::Shutdown`] when
    /// the runtime stops before the write ran.
    pub async fn toggle_detached(
        self: Arc<Self>,
        source: WriteSource,
    ) -> Result<LightState, LightError>
    where
        P: 'static,
    {
        detached(async move { self.toggle(source).await }).await
    }

    async fn acquire(&self) -> Result<MutexGuard<'_, ()>, StoreUnavailableError> {
        tokio::time::timeout(self.lock_timeout, self.write_gate.lock())
            .await
            .map_err(|_| StoreUnavailableError {
                waited: self.lock_timeout,
            })
    }

    fn commit(&self, previous_power: bool, state: LightState) -> LightState {
        tracing::info!(
            revision = state.revision,
            power = state.power,
            source = ?state.last_writer,
            "light state committed"
        );
        self.publisher.publish(ChangeEvent {
            state: state.clone(),
            previous_power,
        });
        state
    }
}

/// Run `write` on its own task so the caller going away cannot cancel it.
async fn detached<F>(write: F) -> Result<LightState, LightError>
where
    F: Future<Output = Result<LightState, LightError>> + Send + 'static,
{
    match tokio::spawn(write).await {
        Ok(result) => result,
        Err(err) => match err.try_into_panic() {
            Ok(payload) => std::panic::resume_unwind(payload),
            Err(_) => Err(LightError::Shutdown),
        },
    }
}
