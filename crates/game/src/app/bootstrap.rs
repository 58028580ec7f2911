use flagrun_engine::{LoopConfig, Scene};
use tracing::info;

use super::gameplay;
use super::levelgen::GenerationConfig;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

/// Resolves generation settings from the environment and wires up the scene.
pub(crate) fn build_app() -> AppWiring {
    let generation = GenerationConfig::from_env();
    info!(
        api_key_configured = generation.api_key.is_some(),
        model = %generation.model,
        "levelgen_config"
    );

    AppWiring {
        config: LoopConfig::default(),
        scene: gameplay::build_scene(generation),
    }
}
