//! The scene control surface.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use smartlight_app::ports::ChangePublisher;
use smartlight_app::reconciler::Reconciler;
use smartlight_app::surface::ControlSurface;
use smartlight_domain::change::{ChangeEvent, ChangeRequest};
use smartlight_domain::error::{DecodeError, LightError};
use smartlight_domain::light::{LightState, WriteSource};

/// A named power preset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Scene {
    pub name: String,
    pub power: bool,
}

/// Request to activate a scene, pinned to the revision it was decided on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneTrigger {
    pub scene: String,
    pub observed_revision: u64,
}

/// Applies scenes through the reconciler.
///
/// Scene writes are conditional: if anything commits between the moment a
/// scene is triggered and the moment it applies, the scene loses.
pub struct SceneSurface<P> {
    scenes: HashMap<String, Scene>,
    reconciler: Arc<Reconciler<P>>,
}

impl<P> SceneSurface<P>
where
    P: ChangePublisher + Send + Sync + 'static,
{
    /// Create a surface knowing `scenes`. Later duplicates of a name win.
    pub fn new(scenes: impl IntoIterator<Item = Scene>, reconciler: Arc<Reconciler<P>>) -> Self {
        let scenes = scenes
            .into_iter()
            .map(|scene| (scene.name.clone(), scene))
            .collect();
        Self { scenes, reconciler }
    }

    /// Activate `name` against the current revision.
    ///
    /// # Errors
    ///
    /// - [`LightError::Decode`] for an unknown scene
    /// - [`LightError::Conflict`] if another write committed meanwhile
    /// - [`LightError::StoreUnavailable`] if write access timed out
    pub async fn activate(&self, name: &str) -> Result<LightState, LightError> {
        let trigger = SceneTrigger {
            scene: name.to_string(),
            observed_revision: self.reconciler.state().revision,
        };
        let req = self.decode(trigger)?;
        let state = self.reconciler.apply(req).await?;
        tracing::info!(scene = name, revision = state.revision, "scene applied");
        Ok(state)
    }
}

impl<P> ControlSurface for SceneSurface<P>
where
    P: ChangePublisher + Send + Sync + 'static,
{
    type Request = SceneTrigger;
    /// A scene only cares about power.
    type Response = bool;

    fn source(&self) -> WriteSource {
        WriteSource::Scene
    }

    fn decode(&self, raw: SceneTrigger) -> Result<ChangeRequest, DecodeError> {
        let scene = self
            .scenes
            .get(&raw.scene)
            .ok_or(DecodeError::UnknownScene(raw.scene))?;
        Ok(ChangeRequest::conditional(
            scene.power,
            self.source(),
            raw.observed_revision,
        ))
    }

    fn encode(&self, state: &LightState) -> bool {
        state.power
    }

    async fn on_event(&self, _event: ChangeEvent) {}
}
