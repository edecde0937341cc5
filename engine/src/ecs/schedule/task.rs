//! Task and slot labels, task definitions and the registry they are collected in.

use std::{any::TypeId, collections::HashMap, fmt, sync::Arc};

use log::debug;

use crate::{
    core::frame::Frame,
    ecs::schedule::{Error, Schedule, contract::Contract, plan},
};

/// Opaque identity of a task or slot label, derived from the label's type.
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
pub struct Id(TypeId);

impl Id {
    #[inline]
    pub fn of<L: Label>() -> Self {
        Self(TypeId::of::<L>())
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({:?})", self.0)
    }
}

/// Whether a label names a concrete task or an abstract ordering slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Task,
    Slot,
}

/// A marker trait for task and slot identifiers.
///
/// Labels are zero-sized types, so a misspelt task name is a compile error rather than a broken
/// schedule. Use [`define_task!`](crate::define_task) or [`define_slot!`](crate::define_slot)
/// rather than implementing this by hand.
pub trait Label: 'static {
    const KIND: Kind = Kind::Task;

    /// Human-readable name used for logs and errors.
    fn name() -> &'static str;

    fn id(self) -> Id;
}

/// Defines one or more task label types.
///
/// ```rust,ignore
/// define_task!(SpawnWaves, MoveEnemies);
/// ```
#[macro_export]
macro_rules! define_task {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
            pub struct $name;

            impl $crate::ecs::schedule::Label for $name {
                #[inline]
                fn name() -> &'static str {
                    stringify!($name)
                }

                fn id(self) -> $crate::ecs::schedule::Id {
                    $crate::ecs::schedule::Id::of::<Self>()
                }
            }
        )*
    };
}

/// Defines one or more dependency slot types.
///
/// A slot is a named point in the frame that tasks position themselves around without naming
/// one another: one task `fulfills` it, others run before, within or after it.
///
/// ```rust,ignore
/// define_slot!(ProcessAudio);
/// ```
#[macro_export]
macro_rules! define_slot {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
            pub struct $name;

            impl $crate::ecs::schedule::Label for $name {
                const KIND: $crate::ecs::schedule::Kind = $crate::ecs::schedule::Kind::Slot;

                #[inline]
                fn name() -> &'static str {
                    stringify!($name)
                }

                fn id(self) -> $crate::ecs::schedule::Id {
                    $crate::ecs::schedule::Id::of::<Self>()
                }
            }
        )*
    };
}

/// A statically known task: its label type carries its ordering contract and its per-frame work.
///
/// ```rust,ignore
/// define_task!(Gravity);
///
/// impl Task for Gravity {
///     fn define_contract(contract: &mut Contract) {
///         contract.execute_before(ProcessPhysics);
///     }
///
///     fn execute(frame: &mut Frame<'_>) {
///         for_each_world::<&mut Velocity, _>(frame.worlds(), |_, velocity| velocity.y -= 9.81);
///     }
/// }
///
/// registry.register_task::<Gravity>()?;
/// ```
pub trait Task: Label {
    fn define_contract(_contract: &mut Contract) {}

    fn execute(frame: &mut Frame<'_>);
}

pub(crate) type Executor = Arc<dyn Fn(&mut Frame<'_>) + Send + Sync>;
type ContractFn = Box<dyn Fn(&mut Contract) + Send + Sync>;

/// A registered task: its identity, the callback declaring its ordering contract and its
/// executor. Definitions are immutable once registered.
pub struct TaskDefinition {
    id: Id,
    name: &'static str,
    define_contract: ContractFn,
    executor: Executor,
}

impl TaskDefinition {
    /// Build a definition from a label plus closures, for tasks assembled at runtime.
    pub fn new<L, C, E>(_label: L, define_contract: C, executor: E) -> Self
    where
        L: Label,
        C: Fn(&mut Contract) + Send + Sync + 'static,
        E: Fn(&mut Frame<'_>) + Send + Sync + 'static,
    {
        Self {
            id: Id::of::<L>(),
            name: L::name(),
            define_contract: Box::new(define_contract),
            executor: Arc::new(executor),
        }
    }

    /// The definition of a [`Task`] type.
    pub fn of<T: Task>() -> Self {
        Self {
            id: Id::of::<T>(),
            name: T::name(),
            define_contract: Box::new(T::define_contract),
            executor: Arc::new(T::execute),
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

    /// Collect this task's constraints into a fresh contract.
    pub fn contract(&self) -> Contract {
        let mut contract = Contract::new();
        (self.define_contract)(&mut contract);
        contract
    }

    pub(crate) fn executor(&self) -> Executor {
        Arc::clone(&self.executor)
    }
}

impl fmt::Debug for TaskDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskDefinition")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The set of tasks a schedule is built from, kept in registration order.
#[derive(Default)]
pub struct TaskRegistry {
    definitions: Vec<TaskDefinition>,
    index: HashMap<Id, usize>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task. Registering the same identity twice is an error.
    pub fn register(&mut self, definition: TaskDefinition) -> Result<(), Error> {
        if self.index.contains_key(&definition.id) {
            return Err(Error::DuplicateTask {
                task: definition.name,
            });
        }
        debug!("registered task {}", definition.name);
        self.index.insert(definition.id, self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    #[inline]
    pub fn register_task<T: Task>(&mut self) -> Result<(), Error> {
        self.register(TaskDefinition::of::<T>())
    }

    pub fn contains<L: Label>(&self) -> bool {
        self.index.contains_key(&Id::of::<L>())
    }

    pub fn get(&self, id: Id) -> Option<&TaskDefinition> {
        self.index.get(&id).map(|index| &self.definitions[*index])
    }

    /// Registration index of a task.
    pub(crate) fn position(&self, id: Id) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TaskDefinition> {
        self.definitions.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Resolve every contract into an execution order.
    pub fn build_schedule(&self) -> Result<Schedule, Error> {
        plan::build(self)
    }
}
