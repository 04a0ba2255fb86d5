//! DOM-free core of a mesh viewer instance: load phase, fan-in and scene.
//!
//! The browser binding drives this with fetch results and reacts to the
//! returned [`Delivery`]; the headless harness drives it directly.

use crate::config::ViewerConfig;
use crate::error::{ConfigError, LoadError, LoadResult};
use crate::loader::{FanIn, FanInEvent};
use crate::mesh::Mesh;
use crate::scene::Scene;

/// Lifecycle of a viewer.
pub enum Phase {
    Idle,
    Loading(FanIn<Mesh>),
    Ready(Scene),
    Failed(String),
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Loading(_) => "loading",
            Phase::Ready(_) => "ready",
            Phase::Failed(_) => "failed",
        }
    }
}

/// What the caller should do after a delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// More sources outstanding.
    Waiting { received: usize, expected: usize },
    /// All sources loaded and the scene is built: run the render pipeline.
    Ready,
    /// Loading aborted; show the message.
    Failed(String),
    /// Nothing to do.
    Ignored,
}

pub struct ViewerCore {
    name: String,
    config: ViewerConfig,
    phase: Phase,
}

impl ViewerCore {
    pub fn new(name: &str, config: ViewerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            name: name.to_string(),
            config,
            phase: Phase::Idle,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn scene(&self) -> Option<&Scene> {
        match &self.phase {
            Phase::Ready(scene) => Some(scene),
            _ => None,
        }
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        match &mut self.phase {
            Phase::Ready(scene) => Some(scene),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Name of requested source `index` while loading.
    pub fn source(&self, index: usize) -> Option<&str> {
        match &self.phase {
            Phase::Loading(fan_in) => fan_in.sources().get(index).map(String::as_str),
            _ => None,
        }
    }

    /// Start loading `sources`. Only an idle viewer can load; meshes are
    /// loaded once per instance.
    pub fn begin_load(&mut self, sources: Vec<String>) -> LoadResult<()> {
        if !matches!(self.phase, Phase::Idle) {
            return Err(LoadError::AlreadyStarted(self.phase.label()));
        }
        match FanIn::new(sources) {
            Ok(fan_in) => {
                tracing::info!(viewer = %self.name, sources = fan_in.expected(), "loading mesh data");
                self.phase = Phase::Loading(fan_in);
                Ok(())
            }
            Err(err) => {
                self.phase = Phase::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Deliver the raw payload (or transport error) for source `index`.
    pub fn deliver(&mut self, index: usize, payload: LoadResult<String>) -> Delivery {
        let Phase::Loading(fan_in) = &mut self.phase else {
            return Delivery::Ignored;
        };
        let source_id = match fan_in.sources().get(index) {
            Some(id) => id.clone(),
            None => return Delivery::Ignored,
        };
        let mesh = payload.and_then(|text| Mesh::from_json(&source_id, &text));

        match fan_in.deliver(index, mesh) {
            FanInEvent::Waiting { received, expected } => {
                tracing::debug!(source = %source_id, received, expected, "mesh loaded");
                Delivery::Waiting { received, expected }
            }
            FanInEvent::Ready(meshes) => match Scene::build(&self.name, meshes, self.config.clone()) {
                Ok(scene) => {
                    self.phase = Phase::Ready(scene);
                    Delivery::Ready
                }
                Err(err) => self.abort(err.to_string()),
            },
            FanInEvent::Failed(err) => self.abort(err.to_string()),
            FanInEvent::Ignored => Delivery::Ignored,
        }
    }

    fn abort(&mut self, message: String) -> Delivery {
        tracing::error!(viewer = %self.name, %message, "mesh load failed");
        self.phase = Phase::Failed(message.clone());
        Delivery::Failed(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_invalid_config_rejected() {
        let config = ViewerConfig {
            shrink: 2.0,
            ..ViewerConfig::default()
        };
        assert!(ViewerCore::new("mv", config).is_err());
    }

    #[test]
    fn test_load_twice_rejected() {
        let mut core = ViewerCore::new("mv", ViewerConfig::default()).unwrap();
        core.begin_load(vec!["a.json".into()]).unwrap();
        assert!(core.begin_load(vec!["b.json".into()]).is_err());
    }

    #[test]
    fn test_no_sources_fails() {
        let mut core = ViewerCore::new("mv", ViewerConfig::default()).unwrap();
        assert!(matches!(core.begin_load(vec![]), Err(LoadError::NoSources)));
        assert_eq!(core.phase().label(), "failed");
        assert!(core.error().is_some());
    }

    #[test]
    fn test_parse_failure_aborts() {
        let mut core = ViewerCore::new("mv", ViewerConfig::default()).unwrap();
        core.begin_load(vec!["a.json".into(), "b.json".into()]).unwrap();
        let json = fixtures::triangle_json(0, [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
        assert!(matches!(core.deliver(0, Ok(json)), Delivery::Waiting { .. }));

        match core.deliver(1, Ok("not json".into())) {
            Delivery::Failed(msg) => assert!(msg.contains("b.json")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(core.scene().is_none());
    }
}
