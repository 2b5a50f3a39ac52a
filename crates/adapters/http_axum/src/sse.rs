//! Server-Sent Events (SSE) stream of committed changes.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::{Stream, StreamExt};

use smartlight_app::ports::ChangePublisher;
use smartlight_domain::id::SurfaceId;

use crate::state::AppState;

/// `GET /light/events`: SSE stream of `ChangeEvent`s.
///
/// The first frame is the current state. A slow client skips intermediate
/// changes but always receives the latest one. The stream ends when the
/// client disconnects.
pub async fn stream<P>(
    State(state): State<AppState<P>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    P: ChangePublisher + Send + Sync + 'static,
{
    let subscriber = SurfaceId::new();
    let changes = state.notifier.subscribe(subscriber).into_stream();
    let frames = changes.filter_map(move |change| match serde_json::to_string(&change) {
        Ok(json) => Some(Ok(Event::default().event("change").data(json))),
        Err(err) => {
            tracing::warn!(%err, %subscriber, "failed to serialize change for SSE stream");
            None
        }
    });

    Sse::new(frames).keep_alive(KeepAlive::default())
}
