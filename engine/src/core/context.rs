use crate::{
    core::{config::EngineConfig, flags::FlagRegistry},
    ecs::schedule::TaskRegistry,
};

/// Everything a running engine shares with its tasks: the registered tasks, flag definitions
/// and configuration. Built once at startup and passed explicitly instead of living in globals.
#[derive(Default)]
pub struct EngineContext {
    pub tasks: TaskRegistry,
    pub flags: FlagRegistry,
    pub config: EngineConfig,
}

impl EngineContext {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            tasks: TaskRegistry::new(),
            flags: FlagRegistry::new(),
            config,
        }
    }
}
