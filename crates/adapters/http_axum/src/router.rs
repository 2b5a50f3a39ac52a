//! Axum router assembly.

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use tower_http::trace::TraceLayer;

use smartlight_app::ports::ChangePublisher;
use smartlight_domain::light::LightState;

use crate::local::handle_local_request;
use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// `/light` and `/light/toggle` are served by the fallback, which forwards
/// to [`handle_local_request`]. Includes a [`TraceLayer`] that logs each
/// HTTP request/response at the `DEBUG` level.
pub fn build<P>(state: AppState<P>) -> Router
where
    P: ChangePublisher + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(index::<P>))
        .route("/health", get(health_check))
        .route("/light/state", get(full_state::<P>))
        .route("/light/events", get(crate::sse::stream::<P>))
        .fallback(dispatch::<P>)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

/// `GET /`: plain banner page showing the current state.
async fn index<P>(State(state): State<AppState<P>>) -> Html<String>
where
    P: ChangePublisher + Send + Sync + 'static,
{
    let light = state.reconciler.state();
    let power = if light.power { "on" } else { "off" };
    Html(format!(
        "<h1>smartlight</h1><p>The light is <strong>{power}</strong> (revision {}).</p>",
        light.revision
    ))
}

/// `GET /light/state`: the full [`LightState`], revision included.
async fn full_state<P>(State(state): State<AppState<P>>) -> Json<LightState>
where
    P: ChangePublisher + Send + Sync + 'static,
{
    Json(state.reconciler.state())
}

async fn dispatch<P>(
    State(state): State<AppState<P>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response
where
    P: ChangePublisher + Send + Sync + 'static,
{
    let (status, body) = handle_local_request(&state, &method, uri.path(), body).await;
    (status, Json(body)).into_response()
}
