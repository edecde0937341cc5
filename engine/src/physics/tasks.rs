//! The physics tasks and their place in the frame.
//!
//! ```text
//! PreProcessPhysics ──► [ProcessPhysics: ProcessPhysicsWorlds] ──► PostProcessPhysics
//!                                                             └──► GatherPhysicalContacts
//! ```
//!
//! Tasks lock a physics world only for the duration of a single body or world call. Holding a
//! world lock while calling into a [`PhysicsBody`](crate::physics::PhysicsBody) would deadlock.

use std::collections::HashMap;

use crate::{
    components::TransformComponent,
    core::{flags::FlagRegistry, frame::Frame},
    define_task,
    ecs::{
        Commands, Entity, World,
        schedule::{
            Contract, Error, Task, TaskRegistry, dependencies::ProcessPhysics, for_each_world,
            for_each_world_unique,
        },
    },
    physics::component::{
        HasPhysicalContacts, PhysicsBodyComponent, PhysicsWorldComponent, tagged_entity,
    },
};

define_task!(
    /// Pushes the transform of every kinematic body into the physics world.
    PreProcessPhysics,
    /// Steps every physics world by the frame delta.
    ProcessPhysicsWorlds,
    /// Pulls the simulated pose of every body back into its transform.
    PostProcessPhysics,
    /// Refreshes [`HasPhysicalContacts`] from the contacts of the last step.
    GatherPhysicalContacts,
);

impl Task for PreProcessPhysics {
    fn define_contract(contract: &mut Contract) {
        contract.execute_before(ProcessPhysics);
    }

    fn execute(frame: &mut Frame<'_>) {
        for_each_world::<(&TransformComponent, &PhysicsBodyComponent), _>(
            frame.worlds(),
            |_, (transform, body)| {
                if body.body().is_kinematic() {
                    body.body().set_pose(transform.position(), transform.rotation());
                }
            },
        );
    }
}

impl Task for ProcessPhysicsWorlds {
    fn define_contract(contract: &mut Contract) {
        contract.fulfills(ProcessPhysics);
    }

    fn execute(frame: &mut Frame<'_>) {
        let delta_seconds = frame.delta_seconds();
        for_each_world_unique::<PhysicsWorldComponent, _>(frame.worlds(), |_, physics| {
            physics.simulate(delta_seconds);
        });
    }
}

impl Task for PostProcessPhysics {
    fn define_contract(contract: &mut Contract) {
        contract.execute_after(ProcessPhysics);
    }

    fn execute(frame: &mut Frame<'_>) {
        for_each_world::<(&mut TransformComponent, &PhysicsBodyComponent), _>(
            frame.worlds(),
            |_, (transform, body)| {
                if let Some((position, rotation)) = body.body().pose() {
                    transform.set_position(position);
                    transform.set_rotation(rotation);
                }
            },
        );
    }
}

impl Task for GatherPhysicalContacts {
    fn define_contract(contract: &mut Contract) {
        contract.execute_after(ProcessPhysics);
    }

    fn execute(frame: &mut Frame<'_>) {
        let flags = frame.flags();
        let commands = frame.commands();
        for world in frame.worlds().iter_mut() {
            gather_contacts(world, flags, commands);
        }
    }
}

/// Register every physics task.
pub fn register_tasks(tasks: &mut TaskRegistry) -> Result<(), Error> {
    tasks.register_task::<PreProcessPhysics>()?;
    tasks.register_task::<ProcessPhysicsWorlds>()?;
    tasks.register_task::<PostProcessPhysics>()?;
    tasks.register_task::<GatherPhysicalContacts>()?;
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct ContactFilter {
    group: u32,
    mask: u32,
}

impl ContactFilter {
    /// Whether a body with this filter records touching a body with `other`.
    #[inline]
    fn records(&self, other: ContactFilter) -> bool {
        self.group != 0 && other.group & self.mask != 0
    }
}

fn gather_contacts(world: &mut World, flags: &FlagRegistry, commands: &Commands) {
    let Some(physics) = world.get_unique::<PhysicsWorldComponent>() else {
        return;
    };
    let pairs = physics.active_contacts();

    let mut filters = HashMap::new();
    for (entity, body) in world.query::<(Entity, &mut PhysicsBodyComponent)>() {
        body.cache_flags(flags);
        filters.insert(
            entity,
            ContactFilter {
                group: body.contact_group(),
                mask: body.contact_mask(),
            },
        );
    }

    let mut touching: HashMap<Entity, Vec<Entity>> = HashMap::new();
    for (a, b) in pairs {
        let (a, b) = (tagged_entity(a), tagged_entity(b));
        let (Some(&filter_a), Some(&filter_b)) = (filters.get(&a), filters.get(&b)) else {
            continue;
        };
        if filter_a.records(filter_b) {
            touching.entry(a).or_default().push(b);
        }
        if filter_b.records(filter_a) {
            touching.entry(b).or_default().push(a);
        }
    }

    let id = world.id();
    for (entity, _, contacts) in
        world.query::<(Entity, &PhysicsBodyComponent, Option<&mut HasPhysicalContacts>)>()
    {
        let mut found = touching.remove(&entity).unwrap_or_default();
        found.sort();
        found.dedup();

        match contacts {
            Some(contacts) => contacts.contacts = found,
            None if !found.is_empty() => {
                commands.add_component(id, entity, HasPhysicalContacts { contacts: found });
            }
            None => {}
        }
    }
}
