//! Sweeping a query or a unique across every world.
//!
//! Tasks are registered once for the whole engine but their data lives per world. These helpers
//! run a callback for every match in every world, in world creation order and then entity
//! index order.

use crate::ecs::{
    query::Data,
    unique::Unique,
    world::{self, WorldManager},
};

/// Call `f` for every entity, in every world, that matches the query data `D`.
/// Returns the number of calls made.
pub fn for_each_world<'w, D, F>(worlds: &'w mut WorldManager, mut f: F) -> usize
where
    D: Data,
    F: FnMut(world::Id, D::Value<'w>),
{
    let mut visited = 0;
    for world in worlds.iter_mut() {
        let id = world.id();
        for value in world.query::<D>() {
            f(id, value);
            visited += 1;
        }
    }
    visited
}

/// Call `f` once for every world holding the unique `U`. Returns the number of calls made.
pub fn for_each_world_unique<U, F>(worlds: &mut WorldManager, mut f: F) -> usize
where
    U: Unique,
    F: FnMut(world::Id, &mut U),
{
    let mut visited = 0;
    for world in worlds.iter_mut() {
        let id = world.id();
        if let Some(unique) = world.get_unique_mut::<U>() {
            f(id, unique);
            visited += 1;
        }
    }
    visited
}

/// Call `f` for every entity matching `D` in every world holding the unique `U`, handing the
/// callback that world's unique alongside the entity's data. Worlds without `U` are skipped.
pub fn for_each_world_with<'w, U, D, F>(worlds: &'w mut WorldManager, mut f: F) -> usize
where
    U: Unique,
    D: Data,
    F: FnMut(world::Id, &mut U, D::Value<'w>),
{
    let mut visited = 0;
    for world in worlds.iter_mut() {
        let id = world.id();
        let Some((unique, results)) = world.unique_and_query::<U, D>() else {
            continue;
        };
        for value in results {
            f(id, &mut *unique, value);
            visited += 1;
        }
    }
    visited
}
