use log::debug;

use crate::core::time::Time;

use super::{Id, World};

/// Owns every live world plus the frame clock shared by all of them.
///
/// World ids are handed out monotonically and never reused, so a stale id simply stops
/// resolving once its world is removed.
#[derive(Default)]
pub struct WorldManager {
    worlds: Vec<World>,
    next_id: u32,
    time: Time,
}

impl WorldManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty world and return its id.
    pub fn create_world(&mut self) -> Id {
        let id = Id::new(self.next_id);
        self.next_id += 1;
        self.worlds.push(World::new(id));
        debug!("created world {}", id.id());
        id
    }

    pub fn world(&self, id: Id) -> Option<&World> {
        self.worlds.iter().find(|world| world.id() == id)
    }

    pub fn world_mut(&mut self, id: Id) -> Option<&mut World> {
        self.worlds.iter_mut().find(|world| world.id() == id)
    }

    /// Remove a world, dropping everything it owns.
    pub fn remove_world(&mut self, id: Id) -> Option<World> {
        let index = self.worlds.iter().position(|world| world.id() == id)?;
        debug!("removed world {}", id.id());
        Some(self.worlds.remove(index))
    }

    /// Worlds in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &World> {
        self.worlds.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut World> {
        self.worlds.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }

    /// Advance the frame clock by the wall time of one frame.
    pub fn advance(&mut self, delta_seconds: f32) {
        self.time.advance(delta_seconds);
    }

    /// Seconds elapsed over the last frame.
    #[inline]
    pub fn frame_delta_seconds(&self) -> f32 {
        self.time.delta_seconds()
    }

    #[inline]
    pub fn time(&self) -> &Time {
        &self.time
    }
}
