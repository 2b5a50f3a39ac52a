//! # smartlightd: smart light daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and initialise logging
//! - Construct the state store, notifier and reconciler
//! - Attach the virtual lamp as the light output
//! - Start the cloud reporter listener and scene schedules
//! - Build the axum router and serve the local endpoint
//! - Handle graceful shutdown (Ctrl-C)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

use smartlight_adapter_cloud::reporter::TracingReporter;
use smartlight_adapter_cloud::surface::CloudSurface;
use smartlight_adapter_http_axum::state::AppState;
use smartlight_adapter_scene::schedule::spawn_schedule;
use smartlight_adapter_scene::surface::SceneSurface;
use smartlight_adapter_virtual::{PushButton, VirtualLamp};
use smartlight_app::driver::spawn_output_driver;
use smartlight_app::notifier::Notifier;
use smartlight_app::reconciler::Reconciler;
use smartlight_app::state_store::StateStore;
use smartlight_app::surface::spawn_listener;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Core
    let store = Arc::new(StateStore::new());
    let notifier = Arc::new(Notifier::new(store.read()));
    let reconciler = Arc::new(
        Reconciler::new(Arc::clone(&store), Arc::clone(&notifier))
            .with_lock_timeout(config.lock_timeout()),
    );

    // Hardware
    let lamp = Arc::new(VirtualLamp::default());
    let mut tasks: Vec<JoinHandle<()>> = vec![spawn_output_driver(lamp, &notifier)];
    if config.hardware.stdin_button {
        tasks.push(spawn_stdin_button(PushButton::new(Arc::clone(&reconciler))));
    }

    // Cloud
    if config.cloud.enabled {
        let cloud = Arc::new(CloudSurface::new(TracingReporter, Arc::clone(&reconciler)));
        tasks.push(spawn_listener(cloud, &notifier));
    } else {
        tracing::info!("cloud reporting disabled");
    }

    // Scenes
    let scenes = Arc::new(SceneSurface::new(
        std::mem::take(&mut config.scenes),
        Arc::clone(&reconciler),
    ));
    for schedule in std::mem::take(&mut config.schedules) {
        tasks.push(spawn_schedule(Arc::clone(&scenes), schedule));
    }

    // HTTP
    let state = AppState::new(Arc::clone(&reconciler), Arc::clone(&notifier));
    let app = smartlight_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "smartlightd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    for task in tasks {
        task.abort();
    }
    tracing::info!(state = %reconciler.state(), "smartlightd stopped");

    Ok(())
}

/// Treat every line on stdin as a short press of the push-button.
fn spawn_stdin_button<P>(button: PushButton<P>) -> JoinHandle<()>
where
    P: smartlight_app::ports::ChangePublisher + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(_)) = lines.next_line().await {
            match button.press().await {
                Ok(state) => tracing::info!(%state, "button pressed"),
                Err(err) => tracing::warn!(error = %err, "button press rejected"),
            }
        }
        tracing::debug!("stdin closed, button detached");
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
