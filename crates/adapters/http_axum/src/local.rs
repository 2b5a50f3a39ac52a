//! Transport-agnostic entry point of the local surface.

use axum::body::Bytes;
use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use smartlight_app::ports::ChangePublisher;
use smartlight_app::surface::ControlSurface;
use smartlight_domain::error::LightError;
use smartlight_domain::light::WriteSource;

use crate::error::ApiError;
use crate::state::AppState;

/// Path of the light resource.
pub const LIGHT_PATH: &str = "/light";
/// Path of the toggle action.
pub const TOGGLE_PATH: &str = "/light/toggle";

/// Serve one local request.
///
/// | method | path            | effect                         |
/// |--------|-----------------|--------------------------------|
/// | GET    | `/light`        | read                           |
/// | POST   | `/light`        | unconditional write `{"power"}`|
/// | POST   | `/light/toggle` | flip                           |
///
/// Successful calls answer `200 {"status": <power>}`. Writes run detached
/// from the caller, so a client hanging up mid-request does not leave the
/// write half done.
pub async fn handle_local_request<P>(
    state: &AppState<P>,
    method: &Method,
    path: &str,
    body: Bytes,
) -> (StatusCode, Value)
where
    P: ChangePublisher + Send + Sync + 'static,
{
    let result = match (path, method) {
        (LIGHT_PATH, &Method::GET) => Ok(state.reconciler.state()),
        (LIGHT_PATH, &Method::POST) => match state.surface.decode(body) {
            Ok(req) => state.reconciler.clone().apply_detached(req).await,
            Err(err) => Err(LightError::from(err)),
        },
        (TOGGLE_PATH, &Method::POST) => {
            state.reconciler.clone().toggle_detached(WriteSource::Local).await
        }
        (LIGHT_PATH | TOGGLE_PATH, _) => {
            return (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": "method not allowed" }),
            );
        }
        _ => return (StatusCode::NOT_FOUND, json!({ "error": "not found" })),
    };

    match result {
        Ok(light) => (StatusCode::OK, json!(state.surface.encode(&light))),
        Err(err) => {
            let (status, body) = ApiError::from(err).parts();
            (status, json!(body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartlight_app::notifier::Notifier;
    use smartlight_app::reconciler::Reconciler;
    use smartlight_app::state_store::StateStore;
    use smartlight_domain::change::{ChangeEvent, ChangeRequest};
    use std::sync::Arc;
    use std::time::Duration;

    fn test_state() -> AppState<Arc<Notifier>> {
        let store = Arc::new(StateStore::new());
        let notifier = Arc::new(Notifier::new(store.read()));
        let reconciler = Arc::new(Reconciler::new(store, Arc::clone(&notifier)));
        AppState::new(reconciler, notifier)
    }

    #[tokio::test]
    async fn should_turn_on_then_report_status() {
        let state = test_state();

        let (status, body) = handle_local_request(
            &state,
            &Method::POST,
            "/light",
            Bytes::from_static(br#"{"power": true}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": true}));
        assert_eq!(state.reconciler.state().revision, 1);

        let (status, body) =
            handle_local_request(&state, &Method::GET, "/light", Bytes::new()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": true}));
    }

    #[tokio::test]
    async fn should_leave_state_untouched_when_power_missing() {
        let state = test_state();

        let (status, body) = handle_local_request(
            &state,
            &Method::POST,
            "/light",
            Bytes::from_static(br#"{"brightness": 10}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing field `power`");

        let light = state.reconciler.state();
        assert!(!light.power);
        assert_eq!(light.revision, 0);
    }

    #[tokio::test]
    async fn should_toggle_light() {
        let state = test_state();
        let (status, body) =
            handle_local_request(&state, &Method::POST, "/light/toggle", Bytes::new()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": true}));
    }

    struct SlowPublisher;

    impl ChangePublisher for SlowPublisher {
        fn publish(&self, _event: ChangeEvent) {
            std::thread::sleep(Duration::from_millis(100));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn should_finish_toggle_when_client_hangs_up() {
        let store = Arc::new(StateStore::new());
        let notifier = Arc::new(Notifier::new(store.read()));
        let reconciler = Arc::new(Reconciler::new(store, SlowPublisher));
        let state = AppState::new(Arc::clone(&reconciler), notifier);

        // an earlier write keeps the gate busy while publishing
        let busy = {
            let reconciler = Arc::clone(&reconciler);
            tokio::spawn(async move {
                reconciler
                    .apply(ChangeRequest::unconditional(false, WriteSource::Cloud))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let request = {
            let state = state.clone();
            tokio::spawn(async move {
                handle_local_request(&state, &Method::POST, TOGGLE_PATH, Bytes::new()).await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        request.abort();

        busy.await.unwrap().unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;

        let light = reconciler.state();
        assert_eq!(light.revision, 2);
        assert!(light.power);
        assert_eq!(light.last_writer, Some(WriteSource::Local));
    }

    #[tokio::test]
    async fn should_reject_unsupported_method() {
        let state = test_state();
        let (status, _) =
            handle_local_request(&state, &Method::DELETE, "/light", Bytes::new()).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_path() {
        let state = test_state();
        let (status, _) =
            handle_local_request(&state, &Method::GET, "/lamp", Bytes::new()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
