//! Rigid body physics for ECS worlds.
//!
//! Each world that simulates physics holds a [`PhysicsWorldComponent`] unique. Entities take
//! part through a [`PhysicsBodyComponent`] next to their [`TransformComponent`]; the tasks in
//! [`tasks`] keep the two in sync around the `ProcessPhysics` slot.

mod body;
mod component;
mod definition;
pub mod math;
mod shape;
pub mod tasks;
mod world;

use std::sync::Arc;

use log::warn;

pub use body::PhysicsBody;
pub use component::{
    CONTACT_FLAG_SET, HasPhysicalContacts, PhysicsBodyComponent, PhysicsWorldComponent, body_tag,
    tagged_entity,
};
pub use definition::{AxisLocks, BodyDefinition, WorldDefinition};
pub use shape::{Shape, ShapeDefinition, create_native_shape};
pub use tasks::register_tasks;
pub use world::PhysicsWorld;

use crate::{
    components::TransformComponent,
    ecs::{Entity, World},
};

/// Spawn an entity with `transform` and a body built from `definition`.
///
/// Returns `None` when `world` has no [`PhysicsWorldComponent`].
pub fn spawn_body(
    world: &mut World,
    definition: Arc<BodyDefinition>,
    transform: TransformComponent,
) -> Option<Entity> {
    let Some(physics) = world.get_unique::<PhysicsWorldComponent>() else {
        warn!("cannot spawn a physics body into world {:?} without a physics world", world.id());
        return None;
    };
    let physics = physics.clone();

    let entity = world.spawn(transform);
    let body = PhysicsBodyComponent::finalize(&physics, definition, &transform, entity);
    world.add_component(entity, body);
    Some(entity)
}
