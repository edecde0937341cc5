//! The World is the container for one scene's entities, components and uniques.
//!
//! Worlds are isolated from one another. Several can be live at once (a game scene and an
//! editor preview, say), all owned by a [`WorldManager`] so tasks can sweep across them.
//!
//! # Example
//!
//! ```ignore
//! use helium_engine::ecs::world::{Id, World};
//!
//! let mut world = World::new(Id::new(0));
//!
//! let entity = world.spawn((Position::default(), Velocity::default()));
//! world.get_mut::<Position>(entity).unwrap().x += 1.0;
//!
//! for (position, velocity) in world.query::<(&mut Position, &Velocity)>() {
//!     position.x += velocity.x;
//! }
//!
//! world.despawn(entity);
//! ```
mod manager;

pub use manager::WorldManager;

use crate::ecs::{
    component::{self, Component, Set},
    entity::{self, Entity},
    query::{self, Data},
    storage::{Storage, Uniques},
    unique::Unique,
};

/// A world identifier, unique within its [`WorldManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Id(id)
    }

    #[inline]
    pub const fn id(&self) -> u32 {
        self.0
    }
}

pub struct World {
    id: Id,
    entities: entity::Allocator,
    components: component::Registry,
    storage: Storage,
    uniques: Uniques,
}

impl World {
    pub fn new(id: Id) -> Self {
        Self {
            id,
            entities: entity::Allocator::new(),
            components: component::Registry::new(),
            storage: Storage::new(),
            uniques: Uniques::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn components(&self) -> &component::Registry {
        &self.components
    }

    /// Spawn a new entity carrying the given set of components.
    pub fn spawn<S: Set>(&mut self, set: S) -> Entity {
        let entity = self.entities.alloc();
        self.storage.track(entity);
        set.insert_into(self, entity);
        entity
    }

    /// Despawn an entity, dropping all of its components. Returns false for dead entities.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.entities.free(entity) {
            return false;
        }
        self.storage.untrack(entity);
        true
    }

    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of live entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attach a component the entity does not already own.
    ///
    /// Returns false, leaving the world untouched, when the entity is dead or already has a
    /// component of this type.
    pub fn add_component<C: Component>(&mut self, entity: Entity, component: C) -> bool {
        if !self.is_alive(entity) || self.has::<C>(entity) {
            return false;
        }
        self.insert_component(entity, component);
        true
    }

    /// Attach a component, replacing any existing value. Returns the replaced value.
    pub fn insert_component<C: Component>(&mut self, entity: Entity, component: C) -> Option<C> {
        if !self.is_alive(entity) {
            return None;
        }
        let id = self.components.register::<C>();
        self.storage.insert(id, entity, component)
    }

    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> Option<C> {
        let id = self.components.get::<C>()?;
        self.storage.remove(id, entity)
    }

    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        let id = self.components.get::<C>()?;
        self.storage.get(id, entity)
    }

    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        let id = self.components.get::<C>()?;
        self.storage.get_mut(id, entity)
    }

    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.components
            .get::<C>()
            .is_some_and(|id| self.storage.contains(id, entity))
    }

    /// Iterate every entity matching the query data, in entity index order.
    ///
    /// # Panics
    ///
    /// Panics if the query names the same component type twice.
    pub fn query<D: Data>(&mut self) -> query::Result<'_, D> {
        query::Result::new(&self.components, &mut self.storage)
    }

    /// Add a unique, returning the value it replaced.
    #[inline]
    pub fn add_unique<U: Unique>(&mut self, unique: U) -> Option<U> {
        self.uniques.insert(unique)
    }

    #[inline]
    pub fn get_unique<U: Unique>(&self) -> Option<&U> {
        self.uniques.get::<U>()
    }

    #[inline]
    pub fn get_unique_mut<U: Unique>(&mut self) -> Option<&mut U> {
        self.uniques.get_mut::<U>()
    }

    #[inline]
    pub fn remove_unique<U: Unique>(&mut self) -> Option<U> {
        self.uniques.remove::<U>()
    }

    #[inline]
    pub fn has_unique<U: Unique>(&self) -> bool {
        self.uniques.contains::<U>()
    }

    /// Split borrow of a unique and the entity storage, for tasks that drive one from the other.
    pub fn unique_and_query<U: Unique, D: Data>(
        &mut self,
    ) -> Option<(&mut U, query::Result<'_, D>)> {
        let unique = self.uniques.get_mut::<U>()?;
        let result = query::Result::new(&self.components, &mut self.storage);
        Some((unique, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Position(f32);
    impl Component for Position {}

    #[derive(Debug, PartialEq)]
    struct Velocity(f32);
    impl Component for Velocity {}

    #[derive(Debug, PartialEq)]
    struct Gravity(f32);
    impl Unique for Gravity {}

    #[test]
    fn spawn_with_set_attaches_every_component() {
        // Given
        let mut world = World::new(Id::new(0));

        // When
        let entity = world.spawn((Position(1.0), Velocity(2.0)));

        // Then
        assert!(world.is_alive(entity));
        assert_eq!(world.get::<Position>(entity), Some(&Position(1.0)));
        assert_eq!(world.get::<Velocity>(entity), Some(&Velocity(2.0)));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn add_component_refuses_duplicates() {
        // Given
        let mut world = World::new(Id::new(0));
        let entity = world.spawn(Position(1.0));

        // When
        let added = world.add_component(entity, Position(5.0));

        // Then
        assert!(!added);
        assert_eq!(world.get::<Position>(entity), Some(&Position(1.0)));
        assert!(world.add_component(entity, Velocity(0.5)));
    }

    #[test]
    fn despawn_invalidates_entity() {
        // Given
        let mut world = World::new(Id::new(0));
        let entity = world.spawn(Position(1.0));

        // When
        assert!(world.despawn(entity));

        // Then
        assert!(!world.is_alive(entity));
        assert!(!world.despawn(entity));
        assert_eq!(world.get::<Position>(entity), None);
        assert!(!world.add_component(entity, Velocity(1.0)));
        assert!(world.is_empty());
    }

    #[test]
    fn remove_component_returns_value() {
        let mut world = World::new(Id::new(0));
        let entity = world.spawn((Position(1.0), Velocity(3.0)));

        assert_eq!(world.remove_component::<Velocity>(entity), Some(Velocity(3.0)));
        assert!(!world.has::<Velocity>(entity));
        assert!(world.has::<Position>(entity));
    }

    #[test]
    fn uniques_are_per_world() {
        // Given
        let mut a = World::new(Id::new(0));
        let b = World::new(Id::new(1));

        // When
        a.add_unique(Gravity(-9.81));

        // Then
        assert_eq!(a.get_unique::<Gravity>(), Some(&Gravity(-9.81)));
        assert!(!b.has_unique::<Gravity>());
    }

    #[test]
    fn unique_and_query_split_borrow() {
        // Given
        let mut world = World::new(Id::new(0));
        world.add_unique(Gravity(-2.0));
        let entity = world.spawn((Position(0.0), Velocity(0.0)));

        // When
        if let Some((gravity, results)) = world.unique_and_query::<Gravity, &mut Velocity>() {
            for velocity in results {
                velocity.0 += gravity.0;
            }
            gravity.0 = 0.0;
        }

        // Then
        assert_eq!(world.get::<Velocity>(entity), Some(&Velocity(-2.0)));
        assert_eq!(world.get_unique::<Gravity>(), Some(&Gravity(0.0)));
    }
}
