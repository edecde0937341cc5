use crate::{
    core::{config::EngineConfig, context::EngineContext, flags::FlagRegistry},
    ecs::{command::Commands, world::WorldManager},
};

/// The view of the engine a task gets while it executes.
pub struct Frame<'a> {
    worlds: &'a mut WorldManager,
    context: &'a EngineContext,
    commands: &'a Commands,
}

impl<'a> Frame<'a> {
    pub fn new(
        worlds: &'a mut WorldManager,
        context: &'a EngineContext,
        commands: &'a Commands,
    ) -> Self {
        Self {
            worlds,
            context,
            commands,
        }
    }

    #[inline]
    pub fn worlds(&mut self) -> &mut WorldManager {
        self.worlds
    }

    #[inline]
    pub fn context(&self) -> &'a EngineContext {
        self.context
    }

    #[inline]
    pub fn config(&self) -> &'a EngineConfig {
        &self.context.config
    }

    #[inline]
    pub fn flags(&self) -> &'a FlagRegistry {
        &self.context.flags
    }

    #[inline]
    pub fn commands(&self) -> &'a Commands {
        self.commands
    }

    /// Seconds elapsed over the current frame.
    #[inline]
    pub fn delta_seconds(&self) -> f32 {
        self.worlds.frame_delta_seconds()
    }
}
