//! Typed iteration over the entities of a world.
//!
//! The query system is built on three concepts:
//!
//! - **[Parameter]**: one query element such as `&Transform`, `&mut Body`, `Option<&Tag>` or
//!   `Entity`.
//! - **[Data]**: a complete query shape, a parameter or a tuple of them.
//! - **[Result]**: the iterator produced by running a query, yielding one value per entity that
//!   owns every required (non-optional) component.
//!
//! ```rust,ignore
//! use helium_engine::ecs::{query::Query, world::World};
//!
//! let query = Query::<(Entity, &Transform, Option<&mut Velocity>)>::new(world.components());
//! for (entity, transform, velocity) in query.invoke(&mut world) {
//!     // ..
//! }
//! ```
//!
//! # Safety and Validation
//!
//! Requesting the same component twice (e.g. `(&Foo, &mut Foo)`) panics when the query is
//! built. While a [`Result`] is alive the world is exclusively borrowed, so callbacks cannot add
//! or remove components mid-pass; they queue structural changes on
//! [`Commands`](crate::ecs::command::Commands) instead.

mod data;
mod param;
mod result;

use std::marker::PhantomData;

pub use data::{Data, DataSpec};
pub use param::{Parameter, ParameterSpec};
pub use result::Result;

use crate::ecs::{component, world::World};

/// A validated query description that can be invoked against a world.
#[derive(Debug)]
pub struct Query<D: Data> {
    spec: DataSpec,
    _marker: PhantomData<fn() -> D>,
}

impl<D: Data> Query<D> {
    /// Describe a query, registering its component types.
    ///
    /// # Panics
    ///
    /// Panics if a component type appears in the query twice.
    pub fn new(components: &component::Registry) -> Self {
        let spec = D::spec(components);
        assert!(
            spec.is_valid(),
            "query `{}` requests the same component more than once",
            std::any::type_name::<D>()
        );
        Self {
            spec,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn spec(&self) -> &DataSpec {
        &self.spec
    }

    /// Run the query against a world.
    #[inline]
    pub fn invoke<'w>(&self, world: &'w mut World) -> Result<'w, D> {
        world.query::<D>()
    }

    /// Invoke `f` once per matching entity and return how many entities were visited.
    pub fn for_each<'w, F>(&self, world: &'w mut World, mut f: F) -> usize
    where
        F: FnMut(D::Value<'w>),
    {
        let mut visited = 0;
        for value in world.query::<D>() {
            f(value);
            visited += 1;
        }
        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{component::Component, entity::Entity, world::Id};

    #[derive(Debug, PartialEq)]
    struct Position(i32);
    impl Component for Position {}

    #[derive(Debug, PartialEq)]
    struct Velocity(i32);
    impl Component for Velocity {}

    #[derive(Debug, PartialEq)]
    struct Frozen;
    impl Component for Frozen {}

    fn world() -> (World, [Entity; 3]) {
        let mut world = World::new(Id::new(0));
        let a = world.spawn((Position(0), Velocity(1)));
        let b = world.spawn(Position(10));
        let c = world.spawn((Position(20), Velocity(2), Frozen));
        (world, [a, b, c])
    }

    #[test]
    fn visits_only_entities_with_every_required_component() {
        // Given
        let (mut world, [a, _, c]) = world();

        // When
        let visited: Vec<Entity> = world
            .query::<(Entity, &Position, &Velocity)>()
            .map(|(entity, _, _)| entity)
            .collect();

        // Then
        assert_eq!(visited, vec![a, c]);
    }

    #[test]
    fn mutable_parameters_write_through() {
        // Given
        let (mut world, [a, b, c]) = world();

        // When
        for (position, velocity) in world.query::<(&mut Position, &Velocity)>() {
            position.0 += velocity.0;
        }

        // Then
        assert_eq!(world.get::<Position>(a), Some(&Position(1)));
        assert_eq!(world.get::<Position>(b), Some(&Position(10)));
        assert_eq!(world.get::<Position>(c), Some(&Position(22)));
    }

    #[test]
    fn optional_parameters_do_not_filter() {
        // Given
        let (mut world, _) = world();

        // When
        let frozen: Vec<bool> = world
            .query::<(&Position, Option<&Frozen>)>()
            .map(|(_, frozen)| frozen.is_some())
            .collect();

        // Then
        assert_eq!(frozen, vec![false, false, true]);
    }

    #[test]
    fn result_knows_its_length() {
        let (mut world, _) = world();

        assert_eq!(world.query::<&Velocity>().len(), 2);
        assert_eq!(world.query::<&Position>().len(), 3);
    }

    #[test]
    fn unknown_component_matches_nothing() {
        // Given
        #[derive(Debug)]
        struct Unused;
        impl Component for Unused {}
        let (mut world, _) = world();

        // When
        let count = world.query::<(&Position, &Unused)>().count();

        // Then
        assert_eq!(count, 0);
    }

    #[test]
    fn for_each_counts_visits() {
        // Given
        let (mut world, _) = world();
        let query = Query::<&mut Velocity>::new(world.components());

        // When
        let visited = query.for_each(&mut world, |velocity| velocity.0 *= 10);

        // Then
        assert_eq!(visited, 2);
        let velocities: Vec<i32> = query.invoke(&mut world).map(|velocity| velocity.0).collect();
        assert_eq!(velocities, vec![10, 20]);
    }

    #[test]
    #[should_panic(expected = "same component")]
    fn aliasing_query_panics() {
        let (mut world, _) = world();
        let _ = world.query::<(&Position, &mut Position)>();
    }

    #[test]
    fn despawned_entities_are_skipped() {
        // Given
        let (mut world, [a, b, c]) = world();

        // When
        world.despawn(b);
        let visited: Vec<Entity> = world.query::<Entity>().collect();

        // Then
        assert_eq!(visited, vec![a, c]);
    }
}
