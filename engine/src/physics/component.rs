use std::sync::{Arc, Mutex};

use glam::Vec3;
use log::warn;

use crate::{
    Component, Unique,
    components::TransformComponent,
    core::{config::PhysicsConfig, flags::FlagRegistry},
    ecs::entity::Entity,
    physics::{
        body::{PhysicsBody, lock},
        definition::{BodyDefinition, WorldDefinition},
        world::PhysicsWorld,
    },
};

/// Flag set contact group and mask names are resolved against.
pub const CONTACT_FLAG_SET: &str = "PhysicsContacts";

/// The physics world of an ECS world. Bodies hold weak references to the shared world, so it
/// is torn down when this unique is removed or its ECS world is dropped. Clones share the world.
#[derive(Unique, Clone)]
pub struct PhysicsWorldComponent {
    world: Arc<Mutex<PhysicsWorld>>,
}

impl PhysicsWorldComponent {
    pub fn initialize(definition: &WorldDefinition, config: &PhysicsConfig) -> Self {
        Self {
            world: Arc::new(Mutex::new(PhysicsWorld::new(definition, config))),
        }
    }

    #[inline]
    pub fn world(&self) -> &Arc<Mutex<PhysicsWorld>> {
        &self.world
    }

    /// Advance the world by one frame. Returns the number of solver steps taken.
    pub fn simulate(&self, delta_seconds: f32) -> u32 {
        lock(&self.world).simulate(delta_seconds)
    }

    /// Pairs of body tags currently in contact.
    pub fn active_contacts(&self) -> Vec<(u128, u128)> {
        lock(&self.world).active_contacts()
    }

    pub fn body_count(&self) -> usize {
        lock(&self.world).body_count()
    }
}

/// Binds a [`PhysicsBody`] to its entity's [`TransformComponent`].
///
/// Kinematic bodies follow the transform, every other body drives it. The physics tasks keep
/// the two in sync each frame.
#[derive(Component)]
pub struct PhysicsBodyComponent {
    body: PhysicsBody,
    definition: Arc<BodyDefinition>,
    contact_group: u32,
    contact_mask: u32,
    flags_cached: bool,
}

impl PhysicsBodyComponent {
    /// Build the body in `world` using the entity's current transform as its initial pose.
    pub fn finalize(
        world: &PhysicsWorldComponent,
        definition: Arc<BodyDefinition>,
        transform: &TransformComponent,
        entity: Entity,
    ) -> Self {
        let body = PhysicsBody::initialize(
            world.world(),
            &definition,
            transform.position(),
            transform.rotation(),
            body_tag(entity),
        );

        Self {
            body,
            definition,
            contact_group: 0,
            contact_mask: 0,
            flags_cached: false,
        }
    }

    #[inline]
    pub fn body(&self) -> &PhysicsBody {
        &self.body
    }

    #[inline]
    pub fn body_mut(&mut self) -> &mut PhysicsBody {
        &mut self.body
    }

    #[inline]
    pub fn definition(&self) -> &BodyDefinition {
        &self.definition
    }

    /// Resolve the definition's contact group and mask names into bits. Only the first call does
    /// any work. Names missing from the flag registry are reported and contribute no bits.
    pub fn cache_flags(&mut self, flags: &FlagRegistry) {
        if self.flags_cached {
            return;
        }
        self.flags_cached = true;

        let group = flags.bitset(CONTACT_FLAG_SET, &self.definition.contact_groups);
        let mask = flags.bitset(CONTACT_FLAG_SET, &self.definition.contact_mask);
        for name in group.unresolved.iter().chain(&mask.unresolved) {
            warn!("unknown physics contact flag `{name}` in set `{CONTACT_FLAG_SET}`");
        }

        self.contact_group = group.bits;
        self.contact_mask = mask.bits;
    }

    #[inline]
    pub fn flags_cached(&self) -> bool {
        self.flags_cached
    }

    #[inline]
    pub fn contact_group(&self) -> u32 {
        self.contact_group
    }

    #[inline]
    pub fn contact_mask(&self) -> u32 {
        self.contact_mask
    }

    pub fn apply_force(&self, force: Vec3) {
        self.body.apply_force(force);
    }

    pub fn set_velocity(&self, velocity: Vec3) {
        self.body.set_velocity(velocity);
    }

    pub fn set_angular_velocity(&self, velocity: Vec3) {
        self.body.set_angular_velocity(velocity);
    }

    pub fn wake_up(&self) {
        self.body.wake_up();
    }
}

/// Bodies touching this entity during the last simulated frame, filtered by its contact mask.
/// Added the first time the entity makes a tracked contact.
#[derive(Component, Debug, Default, Clone, PartialEq, Eq)]
pub struct HasPhysicalContacts {
    pub contacts: Vec<Entity>,
}

impl HasPhysicalContacts {
    pub fn is_touching(&self) -> bool {
        !self.contacts.is_empty()
    }
}

/// The user data tag stored on an entity's native body.
#[inline]
pub fn body_tag(entity: Entity) -> u128 {
    entity.to_bits() as u128
}

/// The entity a native body tag was created for.
#[inline]
pub fn tagged_entity(tag: u128) -> Entity {
    Entity::from_bits(tag as u64)
}
