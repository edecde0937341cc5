use glam::Vec3;
use rapier3d::prelude::{
    CCDSolver, Collider, ColliderHandle, ColliderSet, DefaultBroadPhase, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline, Real,
    RigidBody, RigidBodyHandle, RigidBodySet, Vector,
};

use crate::{
    core::{config::PhysicsConfig, time::FixedStep},
    physics::{definition::WorldDefinition, math},
};

/// One simulated physics world: the solver pipeline plus every body, collider and joint in it.
///
/// Fields drop in declaration order, which tears the world down from the pipeline inwards:
/// bodies and their colliders go before the phase and island structures that index them.
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    integration_parameters: IntegrationParameters,
    gravity: Vector<Real>,
    stepper: FixedStep,
}

impl PhysicsWorld {
    pub fn new(definition: &WorldDefinition, config: &PhysicsConfig) -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            integration_parameters: IntegrationParameters::default(),
            gravity: math::to_vector(definition.gravity),
            stepper: FixedStep::new(config.fixed_time_step, config.max_sub_steps),
        }
    }

    /// Advance the simulation by a frame of `delta_seconds`. Returns the number of steps taken.
    ///
    /// Forces applied to bodies act for the steps of this frame only.
    pub fn simulate(&mut self, delta_seconds: f32) -> u32 {
        let (steps, step_seconds) = self.stepper.advance(delta_seconds);
        for _ in 0..steps {
            self.step(step_seconds);
        }
        for (_, body) in self.bodies.iter_mut() {
            if body.user_force() != Vector::zeros() {
                body.reset_forces(false);
            }
        }
        steps
    }

    /// Run exactly one solver step of `step_seconds`.
    pub fn step(&mut self, step_seconds: f32) {
        self.integration_parameters.dt = step_seconds;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    /// Add a body together with the colliders attached to it.
    pub fn insert_body(&mut self, body: RigidBody, colliders: Vec<Collider>) -> RigidBodyHandle {
        let handle = self.bodies.insert(body);
        for collider in colliders {
            self.colliders
                .insert_with_parent(collider, handle, &mut self.bodies);
        }
        handle
    }

    /// Remove a body and every collider and joint attached to it.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        self.bodies
            .remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    #[inline]
    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    #[inline]
    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    #[inline]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    #[inline]
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn gravity(&self) -> Vec3 {
        math::from_vector(&self.gravity)
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = math::to_vector(gravity);
    }

    /// Pairs of body tags whose colliders are currently touching.
    pub fn active_contacts(&self) -> Vec<(u128, u128)> {
        self.narrow_phase
            .contact_pairs()
            .filter(|pair| pair.has_any_active_contact)
            .filter_map(|pair| {
                Some((self.body_tag(pair.collider1)?, self.body_tag(pair.collider2)?))
            })
            .collect()
    }

    fn body_tag(&self, collider: ColliderHandle) -> Option<u128> {
        let parent = self.colliders.get(collider)?.parent()?;
        self.bodies.get(parent).map(|body| body.user_data)
    }
}

#[cfg(test)]
mod tests {
    use rapier3d::prelude::{ColliderBuilder, RigidBodyBuilder};

    use super::*;

    fn world(max_sub_steps: u32) -> PhysicsWorld {
        PhysicsWorld::new(
            &WorldDefinition::default(),
            &PhysicsConfig {
                fixed_time_step: 0.5,
                max_sub_steps,
            },
        )
    }

    #[test]
    fn simulate_consumes_whole_steps() {
        // Given
        let mut world = world(10);

        // When
        let first = world.simulate(0.75);
        let second = world.simulate(0.25);
        let third = world.simulate(0.25);

        // Then
        assert_eq!((first, second, third), (1, 1, 0));
    }

    #[test]
    fn gravity_moves_dynamic_bodies() {
        // Given
        let mut world = world(10);
        let handle = world.insert_body(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(0.0, 10.0, 0.0))
                .build(),
            vec![ColliderBuilder::ball(0.5).build()],
        );

        // When
        world.simulate(1.0);

        // Then
        let height = world.body(handle).unwrap().translation().y;
        assert!(height < 10.0);
    }

    #[test]
    fn remove_body_drops_its_colliders() {
        // Given
        let mut world = world(10);
        let handle = world.insert_body(
            RigidBodyBuilder::fixed().build(),
            vec![ColliderBuilder::cuboid(1.0, 1.0, 1.0).build()],
        );

        // When
        let removed = world.remove_body(handle);

        // Then
        assert!(removed);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);
        assert!(!world.remove_body(handle));
    }
}
