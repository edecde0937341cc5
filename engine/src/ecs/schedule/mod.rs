//! Constraint-ordered task scheduling.
//!
//! Tasks do not name a position in the frame. Each one declares a [`Contract`] of constraints
//! relative to other tasks or to dependency slots, and [`TaskRegistry::build_schedule`] resolves
//! all contracts into one deterministic order.
//!
//! ```text
//!   ReceiveInput ─► PreProcessPhysics ─► [ProcessPhysics slot] ─► PostProcessPhysics ─► Render
//!                                               ▲
//!                                   ProcessPhysicsWorlds (fulfills)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use helium_engine::{define_task, ecs::schedule::{Contract, Task, TaskRegistry}};
//!
//! define_task!(Steer);
//!
//! impl Task for Steer {
//!     fn define_contract(contract: &mut Contract) {
//!         contract.execute_after(ReceiveInput).execute_before(ProcessPhysics);
//!     }
//!
//!     fn execute(frame: &mut Frame<'_>) { /* .. */ }
//! }
//!
//! let mut tasks = TaskRegistry::new();
//! tasks.register_task::<Steer>()?;
//! let schedule = tasks.build_schedule()?;
//! ```
//!
//! # Execution Model
//!
//! Tasks run one after another on the calling thread. After each task the command queue is
//! flushed, so structural changes a task queued are visible to every later task in the frame.
//! [`Schedule::stages`] exposes which tasks are mutually unordered, for callers that want to
//! reason about parallelism.

mod contract;
pub mod dependencies;
mod foreach;
mod plan;
mod task;

use std::fmt;

use log::trace;

pub use contract::{Constraint, Contract, Relation, Target};
pub use foreach::{for_each_world, for_each_world_unique, for_each_world_with};
pub use task::{Id, Kind, Label, Task, TaskDefinition, TaskRegistry};

use crate::{
    core::{context::EngineContext, frame::Frame},
    ecs::{command::Commands, world::WorldManager},
};

/// Errors raised while registering tasks or building a schedule. All of them indicate a
/// programming error in the static task graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The same task identity was registered twice.
    DuplicateTask { task: &'static str },
    /// A task orders itself relative to a task that is not registered.
    UnknownTask {
        task: &'static str,
        target: &'static str,
    },
    /// A task tries to fulfill or run within a task rather than a slot.
    NotASlot {
        task: &'static str,
        target: &'static str,
    },
    /// The constraints contradict each other. Lists the tasks on one cycle, in edge order.
    Cycle { tasks: Vec<&'static str> },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateTask { task } => write!(f, "task `{task}` is registered twice"),
            Error::UnknownTask { task, target } => {
                write!(f, "task `{task}` is ordered against unregistered task `{target}`")
            }
            Error::NotASlot { task, target } => {
                write!(
                    f,
                    "task `{task}` can only fulfill or run within a slot, `{target}` is a task"
                )
            }
            Error::Cycle { tasks } => {
                write!(f, "task dependency cycle: {}", tasks.join(" -> "))?;
                if let Some(first) = tasks.first() {
                    write!(f, " -> {first}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Error {}

/// One task in a built schedule.
pub struct ScheduledTask {
    id: Id,
    name: &'static str,
    executor: task::Executor,
}

impl ScheduledTask {
    fn new(definition: &TaskDefinition) -> Self {
        Self {
            id: definition.id(),
            name: definition.name(),
            executor: definition.executor(),
        }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A resolved execution order, built once and executed every tick.
#[derive(Debug)]
pub struct Schedule {
    tasks: Vec<ScheduledTask>,
    stages: Vec<Vec<usize>>,
}

impl Schedule {
    fn new(tasks: Vec<ScheduledTask>, stages: Vec<Vec<usize>>) -> Self {
        Self { tasks, stages }
    }

    /// Task names in execution order.
    pub fn order(&self) -> Vec<&'static str> {
        self.tasks.iter().map(ScheduledTask::name).collect()
    }

    pub fn tasks(&self) -> &[ScheduledTask] {
        &self.tasks
    }

    /// Position of a task in the execution order.
    pub fn position<L: Label>(&self, _label: L) -> Option<usize> {
        let id = Id::of::<L>();
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Positions in the execution order grouped by dependency depth. Tasks in one stage have no
    /// ordering between them; each depends only on tasks in earlier stages.
    pub fn stages(&self) -> &[Vec<usize>] {
        &self.stages
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run every task once, in order, flushing queued commands after each.
    pub fn execute(&self, worlds: &mut WorldManager, context: &EngineContext, commands: &Commands) {
        for task in &self.tasks {
            trace!("executing task {}", task.name);
            let mut frame = Frame::new(worlds, context, commands);
            (task.executor)(&mut frame);

            let applied = commands.flush(worlds);
            if applied > 0 {
                trace!("task {} applied {applied} commands", task.name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{define_slot, define_task};

    define_task!(A, B, C, D, E);
    define_slot!(Phase1, Phase2);

    fn noop(_frame: &mut Frame<'_>) {}

    fn task<L, C>(label: L, contract: C) -> TaskDefinition
    where
        L: Label,
        C: Fn(&mut Contract) -> &mut Contract + Send + Sync + 'static,
    {
        TaskDefinition::new(
            label,
            move |c: &mut Contract| {
                contract(c);
            },
            noop,
        )
    }

    fn unordered<L: Label>(label: L) -> TaskDefinition {
        TaskDefinition::new(label, |_: &mut Contract| {}, noop)
    }

    fn index_of<L: Label>(schedule: &Schedule, label: L) -> usize {
        schedule.position(label).unwrap()
    }

    #[test]
    fn before_slot_fulfill_after_slot() {
        // Given
        let mut registry = TaskRegistry::new();
        registry.register(task(C, |c| c.execute_after(Phase1))).unwrap();
        registry.register(task(A, |c| c.fulfills(Phase1))).unwrap();
        registry.register(task(B, |c| c.execute_before(Phase1))).unwrap();

        // When
        let schedule = registry.build_schedule().unwrap();

        // Then
        assert_eq!(schedule.len(), 3);
        assert!(index_of(&schedule, B) < index_of(&schedule, A));
        assert!(index_of(&schedule, A) < index_of(&schedule, C));
    }

    #[test]
    fn within_sits_between_before_and_after() {
        // Given
        let mut registry = TaskRegistry::new();
        registry.register(task(A, |c| c.execute_after(Phase1))).unwrap();
        registry.register(task(B, |c| c.executes_within(Phase1))).unwrap();
        registry.register(task(C, |c| c.execute_before(Phase1))).unwrap();
        registry.register(task(D, |c| c.fulfills(Phase1))).unwrap();

        // When
        let schedule = registry.build_schedule().unwrap();

        // Then
        assert!(index_of(&schedule, C) < index_of(&schedule, B));
        assert!(index_of(&schedule, C) < index_of(&schedule, D));
        assert!(index_of(&schedule, B) < index_of(&schedule, A));
        assert!(index_of(&schedule, D) < index_of(&schedule, A));
    }

    #[test]
    fn slot_without_fulfiller_still_orders() {
        let mut registry = TaskRegistry::new();
        registry.register(task(A, |c| c.execute_after(Phase2))).unwrap();
        registry.register(task(B, |c| c.execute_before(Phase2))).unwrap();

        let schedule = registry.build_schedule().unwrap();

        assert_eq!(schedule.order(), vec!["B", "A"]);
    }

    #[test]
    fn direct_constraints_are_honoured() {
        // Given
        let mut registry = TaskRegistry::new();
        registry.register(task(A, |c| c.execute_after(B))).unwrap();
        registry.register(task(B, |c| c.execute_after(C))).unwrap();
        registry.register(unordered(C)).unwrap();
        registry.register(task(D, |c| c.execute_before(C))).unwrap();

        // When
        let schedule = registry.build_schedule().unwrap();

        // Then
        assert_eq!(schedule.order(), vec!["D", "C", "B", "A"]);
    }

    #[test]
    fn unconstrained_tasks_keep_registration_order() {
        // Given
        let mut registry = TaskRegistry::new();
        for definition in [unordered(E), unordered(A), unordered(C)] {
            registry.register(definition).unwrap();
        }

        // When
        let first = registry.build_schedule().unwrap().order();
        let second = registry.build_schedule().unwrap().order();

        // Then
        assert_eq!(first, vec!["E", "A", "C"]);
        assert_eq!(first, second);
    }

    #[test]
    fn cycle_is_reported() {
        // Given
        let mut registry = TaskRegistry::new();
        registry.register(task(A, |c| c.execute_before(B))).unwrap();
        registry.register(task(B, |c| c.execute_before(A))).unwrap();
        registry.register(unordered(C)).unwrap();

        // When
        let error = registry.build_schedule().unwrap_err();

        // Then
        match &error {
            Error::Cycle { tasks } => {
                assert_eq!(tasks.len(), 2);
                assert!(tasks.contains(&"A") && tasks.contains(&"B"));
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
        assert!(error.to_string().starts_with("task dependency cycle"));
    }

    #[test]
    fn cycle_through_slot_is_reported() {
        // Given
        let mut registry = TaskRegistry::new();
        registry.register(task(A, |c| c.fulfills(Phase1))).unwrap();
        registry.register(task(B, |c| c.execute_after(Phase1).execute_before(A))).unwrap();

        // When
        let result = registry.build_schedule();

        // Then
        assert!(matches!(result, Err(Error::Cycle { .. })));
    }

    #[test]
    fn self_ordering_is_a_cycle() {
        let mut registry = TaskRegistry::new();
        registry.register(task(A, |c| c.execute_before(A))).unwrap();

        assert_eq!(
            registry.build_schedule().unwrap_err(),
            Error::Cycle { tasks: vec!["A"] }
        );
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = TaskRegistry::new();
        registry.register(unordered(A)).unwrap();

        assert_eq!(
            registry.register(unordered(A)),
            Err(Error::DuplicateTask { task: "A" })
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_task_target_fails() {
        let mut registry = TaskRegistry::new();
        registry.register(task(A, |c| c.execute_after(B))).unwrap();

        assert_eq!(
            registry.build_schedule().unwrap_err(),
            Error::UnknownTask { task: "A", target: "B" }
        );
    }

    #[test]
    fn fulfilling_a_task_fails() {
        let mut registry = TaskRegistry::new();
        registry.register(unordered(A)).unwrap();
        registry.register(task(B, |c| c.fulfills(A))).unwrap();

        assert_eq!(
            registry.build_schedule().unwrap_err(),
            Error::NotASlot { task: "B", target: "A" }
        );
    }

    #[test]
    fn stages_expose_unordered_tasks() {
        // Given
        let mut registry = TaskRegistry::new();
        registry.register(task(A, |c| c.execute_before(Phase1))).unwrap();
        registry.register(task(B, |c| c.execute_before(Phase1))).unwrap();
        registry.register(task(C, |c| c.fulfills(Phase1))).unwrap();

        // When
        let schedule = registry.build_schedule().unwrap();

        // Then
        assert_eq!(schedule.stages(), &[vec![0, 1], vec![2]]);
    }

    #[test]
    fn execute_runs_in_order_and_flushes_between_tasks() {
        // Given
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut context = EngineContext::default();
        {
            let log = log.clone();
            context
                .tasks
                .register(TaskDefinition::new(
                    B,
                    |c| {
                        c.execute_after(A);
                    },
                    move |frame| {
                        let count: usize = frame.worlds().iter().map(|world| world.len()).sum();
                        log.lock().unwrap().push(format!("B saw {count}"));
                    },
                ))
                .unwrap();
        }
        {
            let log = log.clone();
            context
                .tasks
                .register(TaskDefinition::new(
                    A,
                    |_| {},
                    move |frame| {
                        let id = frame.worlds().iter().next().map(|world| world.id()).unwrap();
                        frame.commands().spawn(id, ());
                        log.lock().unwrap().push("A".to_string());
                    },
                ))
                .unwrap();
        }
        let schedule = context.tasks.build_schedule().unwrap();
        let mut worlds = WorldManager::new();
        worlds.create_world();
        let commands = Commands::new();

        // When
        schedule.execute(&mut worlds, &context, &commands);

        // Then
        assert_eq!(*log.lock().unwrap(), vec!["A".to_string(), "B saw 1".to_string()]);
    }
}
