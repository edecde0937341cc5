//! Deferred structural changes.
//!
//! Tasks iterate worlds through queries that hold the world exclusively, so they cannot spawn,
//! despawn or add and remove components while a pass is running. Instead they queue commands
//! here. The schedule flushes the queue after every task, so the next task observes the changes.
//!
//! ```text
//!  Task A ──push──┐
//!                 ├──► Commands ──flush──► WorldManager ──► Task B
//!  (query pass) ──┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! for (entity, body) in world.query::<(Entity, &PhysicsBodyComponent)>() {
//!     if body.touching() {
//!         commands.add_component(world_id, entity, HasPhysicalContacts::default());
//!     }
//! }
//! commands.flush(&mut worlds);
//! ```

use crossbeam::queue::SegQueue;
use log::warn;

use crate::ecs::{
    component::{Component, Set},
    entity::Entity,
    world::{self, World, WorldManager},
};

type Spawner = Box<dyn FnOnce(&mut World) -> Entity + Send>;
type EntityEdit = Box<dyn FnOnce(&mut World, Entity) + Send>;

/// A deferred structural change targeted at one world.
pub enum Command {
    /// Spawn a new entity with a set of components.
    Spawn { world: world::Id, spawn: Spawner },

    /// Despawn an entity and drop its components.
    Despawn { world: world::Id, entity: Entity },

    /// Attach a component. Ignored if the entity already has one of that type.
    AddComponent {
        world: world::Id,
        entity: Entity,
        edit: EntityEdit,
    },

    /// Detach a component by type. Ignored if the entity does not have it.
    RemoveComponent {
        world: world::Id,
        entity: Entity,
        edit: EntityEdit,
    },
}

impl Command {
    fn world(&self) -> world::Id {
        match self {
            Command::Spawn { world, .. }
            | Command::Despawn { world, .. }
            | Command::AddComponent { world, .. }
            | Command::RemoveComponent { world, .. } => *world,
        }
    }
}

/// Lock-free queue of deferred commands, shared by reference with every task.
#[derive(Default)]
pub struct Commands {
    queue: SegQueue<Command>,
}

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: Command) {
        self.queue.push(command);
    }

    pub fn spawn<S: Set>(&self, world: world::Id, set: S) {
        self.push(Command::Spawn {
            world,
            spawn: Box::new(move |target: &mut World| target.spawn(set)),
        });
    }

    pub fn despawn(&self, world: world::Id, entity: Entity) {
        self.push(Command::Despawn { world, entity });
    }

    pub fn add_component<C: Component>(&self, world: world::Id, entity: Entity, component: C) {
        self.push(Command::AddComponent {
            world,
            entity,
            edit: Box::new(move |target: &mut World, entity| {
                target.add_component(entity, component);
            }),
        });
    }

    pub fn remove_component<C: Component>(&self, world: world::Id, entity: Entity) {
        self.push(Command::RemoveComponent {
            world,
            entity,
            edit: Box::new(|target: &mut World, entity| {
                target.remove_component::<C>(entity);
            }),
        });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Apply queued commands in submission order. Returns how many were applied.
    ///
    /// Commands aimed at a world that no longer exists are dropped with a warning.
    pub fn flush(&self, worlds: &mut WorldManager) -> usize {
        let mut applied = 0;
        while let Some(command) = self.queue.pop() {
            let id = command.world();
            let Some(world) = worlds.world_mut(id) else {
                warn!("dropping command for missing world {}", id.id());
                continue;
            };

            match command {
                Command::Spawn { spawn, .. } => {
                    spawn(world);
                }
                Command::Despawn { entity, .. } => {
                    world.despawn(entity);
                }
                Command::AddComponent { entity, edit, .. }
                | Command::RemoveComponent { entity, edit, .. } => edit(world, entity),
            }
            applied += 1;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Marker(u8);
    impl Component for Marker {}

    #[test]
    fn flush_applies_in_submission_order() {
        // Given
        let mut worlds = WorldManager::new();
        let id = worlds.create_world();
        let entity = worlds.world_mut(id).unwrap().spawn(());
        let commands = Commands::new();

        // When
        commands.add_component(id, entity, Marker(1));
        commands.remove_component::<Marker>(id, entity);
        commands.add_component(id, entity, Marker(2));
        let applied = commands.flush(&mut worlds);

        // Then
        assert_eq!(applied, 3);
        assert!(commands.is_empty());
        let world = worlds.world(id).unwrap();
        assert_eq!(world.get::<Marker>(entity), Some(&Marker(2)));
    }

    #[test]
    fn nothing_changes_until_flush() {
        // Given
        let mut worlds = WorldManager::new();
        let id = worlds.create_world();
        let commands = Commands::new();

        // When
        commands.spawn(id, Marker(9));

        // Then
        assert_eq!(worlds.world(id).unwrap().len(), 0);
        assert_eq!(commands.len(), 1);
        commands.flush(&mut worlds);
        assert_eq!(worlds.world(id).unwrap().len(), 1);
    }

    #[test]
    fn despawn_and_missing_world() {
        // Given
        let mut worlds = WorldManager::new();
        let id = worlds.create_world();
        let gone = worlds.create_world();
        worlds.remove_world(gone);
        let entity = worlds.world_mut(id).unwrap().spawn(Marker(0));
        let commands = Commands::new();

        // When
        commands.despawn(id, entity);
        commands.spawn(gone, Marker(1));
        let applied = commands.flush(&mut worlds);

        // Then
        assert_eq!(applied, 1);
        assert!(!worlds.world(id).unwrap().is_alive(entity));
    }
}
