use std::sync::{Arc, Mutex, PoisonError, Weak};

use glam::{Quat, Vec3};
use log::warn;
use rapier3d::prelude::{Collider, ColliderBuilder, RigidBody, RigidBodyBuilder, RigidBodyHandle};

use crate::physics::{
    definition::BodyDefinition, math, shape::create_native_shape, world::PhysicsWorld,
};

/// Runtime handle to one rigid body living in a [`PhysicsWorld`].
///
/// The body keeps a non-owning reference to its world. It removes its native body, and every
/// collider it created, when it is destructed or dropped, whichever comes first. If the world
/// has already gone the body has nothing left to release.
///
/// A body built from a definition without shapes is inert: [`PhysicsBody::has_body`] is false
/// and every operation on it does nothing.
#[derive(Default)]
pub struct PhysicsBody {
    world: Weak<Mutex<PhysicsWorld>>,
    handle: Option<RigidBodyHandle>,
    destructed: bool,
}

impl PhysicsBody {
    /// Build the native body for `definition` at the given pose and add it to `world`.
    ///
    /// `tag` is stored as the native body's user data, so contacts can be traced back to
    /// whatever owns the body.
    pub fn initialize(
        world: &Arc<Mutex<PhysicsWorld>>,
        definition: &BodyDefinition,
        position: Vec3,
        rotation: Quat,
        tag: u128,
    ) -> Self {
        if definition.shapes.is_empty() {
            warn!("body definition has no shapes, the body will not be simulated");
            return Self::default();
        }

        let rotation = valid_rotation(rotation, tag, "initial");
        let body = build_body(definition, position, rotation, tag);
        let colliders = build_colliders(definition, tag);
        let handle = lock(world).insert_body(body, colliders);

        Self {
            world: Arc::downgrade(world),
            handle: Some(handle),
            destructed: false,
        }
    }

    /// Does this body own a live native body?
    pub fn has_body(&self) -> bool {
        self.handle.is_some() && self.world.strong_count() > 0
    }

    #[inline]
    pub fn handle(&self) -> Option<RigidBodyHandle> {
        self.handle
    }

    pub fn position(&self) -> Option<Vec3> {
        self.read(|body| math::from_vector(body.translation()))
    }

    pub fn rotation(&self) -> Option<Quat> {
        self.read(|body| math::from_rotation(body.rotation()))
    }

    /// Position and rotation in one lock.
    pub fn pose(&self) -> Option<(Vec3, Quat)> {
        self.read(|body| math::from_isometry(body.position()))
    }

    pub fn velocity(&self) -> Option<Vec3> {
        self.read(|body| math::from_vector(body.linvel()))
    }

    pub fn angular_velocity(&self) -> Option<Vec3> {
        self.read(|body| math::from_vector(body.angvel()))
    }

    pub fn is_kinematic(&self) -> bool {
        self.read(RigidBody::is_kinematic).unwrap_or(false)
    }

    pub fn is_sleeping(&self) -> bool {
        self.read(RigidBody::is_sleeping).unwrap_or(false)
    }

    pub fn set_position(&self, position: Vec3) {
        self.write(|body| {
            let rotation = *body.rotation();
            body.set_position(math::to_isometry(position, math::from_rotation(&rotation)), true);
        });
    }

    pub fn set_rotation(&self, rotation: Quat) {
        self.write(|body| body.set_rotation(math::to_rotation(rotation), true));
    }

    /// Teleport the body to a pose.
    pub fn set_pose(&self, position: Vec3, rotation: Quat) {
        self.write(|body| body.set_position(math::to_isometry(position, rotation), true));
    }

    /// Push the body through its centre of mass for the next simulated frame.
    pub fn apply_force(&self, force: Vec3) {
        self.write(|body| {
            body.wake_up(true);
            body.add_force(math::to_vector(force), true);
        });
    }

    pub fn set_velocity(&self, velocity: Vec3) {
        self.write(|body| {
            body.wake_up(true);
            body.set_linvel(math::to_vector(velocity), true);
        });
    }

    pub fn set_angular_velocity(&self, velocity: Vec3) {
        self.write(|body| {
            body.wake_up(true);
            body.set_angvel(math::to_vector(velocity), true);
        });
    }

    pub fn wake_up(&self) {
        self.write(|body| body.wake_up(true));
    }

    /// Remove the native body from its world now rather than on drop.
    ///
    /// # Panics
    ///
    /// In debug builds, panics when called a second time.
    pub fn destruct(&mut self) {
        debug_assert!(!self.destructed, "physics body destructed twice");
        self.destructed = true;
        self.release();
    }

    fn release(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        if let Some(world) = self.world.upgrade() {
            lock(&world).remove_body(handle);
        }
    }

    fn read<R>(&self, f: impl FnOnce(&RigidBody) -> R) -> Option<R> {
        let handle = self.handle?;
        let world = self.world.upgrade()?;
        let world = lock(&world);
        world.body(handle).map(f)
    }

    fn write(&self, f: impl FnOnce(&mut RigidBody)) {
        let Some(handle) = self.handle else {
            return;
        };
        let Some(world) = self.world.upgrade() else {
            return;
        };
        if let Some(body) = lock(&world).body_mut(handle) {
            f(body);
        }
    }
}

impl Drop for PhysicsBody {
    fn drop(&mut self) {
        self.release();
    }
}

/// Lock a world, recovering it if a panicking task poisoned the lock.
pub(crate) fn lock(world: &Mutex<PhysicsWorld>) -> std::sync::MutexGuard<'_, PhysicsWorld> {
    world.lock().unwrap_or_else(PoisonError::into_inner)
}

fn build_body(definition: &BodyDefinition, position: Vec3, rotation: Quat, tag: u128) -> RigidBody {
    let builder = if definition.kinematic {
        RigidBodyBuilder::kinematic_position_based()
    } else if definition.total_mass() == 0.0 {
        RigidBodyBuilder::fixed()
    } else {
        RigidBodyBuilder::dynamic()
    };

    builder
        .position(math::to_isometry(position, rotation))
        .linear_damping(definition.linear_damping)
        .angular_damping(definition.angular_damping)
        .locked_axes(definition.locked_axes())
        .user_data(tag)
        .build()
}

/// One collider per shape, placed at the shape's offset and carrying the shape's own mass, so
/// the body's centre of mass and inertia follow how mass is spread across its shapes.
fn build_colliders(definition: &BodyDefinition, tag: u128) -> Vec<Collider> {
    definition
        .shapes
        .iter()
        .enumerate()
        .map(|(index, shape)| {
            let rotation = valid_rotation(shape.rotation, tag, &format!("shape {index}"));
            ColliderBuilder::new(create_native_shape(&shape.shape))
                .position(math::to_isometry(shape.position, rotation))
                .mass(shape.mass)
                .restitution(definition.restitution)
                .user_data(tag)
                .build()
        })
        .collect()
}

/// `rotation` as a unit quaternion. Rotations that cannot be normalized are replaced by the
/// identity.
fn valid_rotation(rotation: Quat, tag: u128, part: &str) -> Quat {
    if !rotation.is_finite() || rotation.length_squared() < 1e-6 {
        warn!("body {tag} has an invalid {part} rotation {rotation}, using identity");
        return Quat::IDENTITY;
    }
    rotation.normalize()
}
