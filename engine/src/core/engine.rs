use log::info;

use crate::{
    core::context::EngineContext,
    ecs::{
        command::Commands,
        schedule::{self, Schedule},
        world::WorldManager,
    },
};

/// Drives the frame: owns the worlds, the engine context and the schedule built from the
/// context's tasks.
///
/// ```rust,ignore
/// let mut context = EngineContext::new(EngineConfig::default());
/// physics::register_tasks(&mut context.tasks)?;
///
/// let mut engine = Engine::new(context)?;
/// let scene = engine.worlds_mut().create_world();
///
/// loop {
///     engine.tick(frame_seconds);
/// }
/// ```
pub struct Engine {
    context: EngineContext,
    schedule: Schedule,
    worlds: WorldManager,
    commands: Commands,
}

impl Engine {
    /// Build the schedule once. Contract errors are configuration bugs and surface here.
    pub fn new(context: EngineContext) -> Result<Self, schedule::Error> {
        let schedule = context.tasks.build_schedule()?;
        info!("engine started with {} tasks", schedule.len());
        Ok(Self {
            context,
            schedule,
            worlds: WorldManager::new(),
            commands: Commands::new(),
        })
    }

    /// Advance frame time by `delta_seconds` and run every scheduled task once.
    pub fn tick(&mut self, delta_seconds: f32) {
        self.worlds.advance(delta_seconds);
        // Changes queued outside the schedule land before the first task.
        self.commands.flush(&mut self.worlds);
        self.schedule
            .execute(&mut self.worlds, &self.context, &self.commands);
    }

    #[inline]
    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    #[inline]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    #[inline]
    pub fn worlds(&self) -> &WorldManager {
        &self.worlds
    }

    #[inline]
    pub fn worlds_mut(&mut self) -> &mut WorldManager {
        &mut self.worlds
    }

    #[inline]
    pub fn commands(&self) -> &Commands {
        &self.commands
    }
}
