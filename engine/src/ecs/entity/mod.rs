//! Entity identifiers and their allocation.
//!
//! An [`Entity`] is a lightweight handle pairing an [`Id`] slot with a [`Generation`]. When an
//! entity is freed its slot's generation is bumped and the id goes back into a dead pool, so a
//! stale handle that still carries the old generation is rejected by every world lookup.
//!
//! ```rust,ignore
//! let entity = allocator.alloc(); // Entity { id: 0, generation: 0 }
//! allocator.free(entity);
//! let reused = allocator.alloc();  // Entity { id: 0, generation: 1 }
//! assert!(!allocator.is_alive(entity));
//! ```

use std::fmt;

use crossbeam::queue::SegQueue;

/// The generation of an entity slot. Starts at `FIRST` and increments each time the slot is freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u32);

impl Generation {
    /// The first generation of an entity.
    const FIRST: Self = Self(0);

    /// Get the next generation from the current.
    #[inline]
    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// The slot identifier of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl From<u32> for Id {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A handle to an entity living in a [`World`](crate::ecs::World).
///
/// At most one live entity exists per `id` in a world; the `generation` tells whether this handle
/// still refers to it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    id: Id,
    generation: Generation,
}

impl Entity {
    /// Construct an entity in its first generation.
    #[inline]
    pub(crate) fn new(id: impl Into<Id>) -> Self {
        Self::new_with_generation(id.into(), Generation::FIRST)
    }

    #[inline]
    pub(crate) const fn new_with_generation(id: Id, generation: Generation) -> Self {
        Self { id, generation }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Get the index of this entity if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub fn index(&self) -> usize {
        self.id.0 as usize
    }

    /// Pack the entity into a single integer, e.g. to tag native physics objects.
    #[inline]
    pub const fn to_bits(&self) -> u64 {
        ((self.generation.0 as u64) << 32) | self.id.0 as u64
    }

    /// Unpack an entity previously packed with [`to_bits`](Self::to_bits).
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self::new_with_generation(Id(bits as u32), Generation((bits >> 32) as u32))
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.id.0, self.generation.0)
    }
}

/// Entities order by id, then generation.
impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| self.generation.cmp(&other.generation))
    }
}

/// Allocates entity ids for a single world and recycles freed ones.
///
/// Freed ids are reused first-in first-out so a just-despawned id is not handed straight back out.
#[derive(Default, Debug)]
pub struct Allocator {
    /// Current generation of every slot ever allocated, indexed by id.
    generations: Vec<Generation>,

    /// Whether the slot's current generation is live.
    alive: Vec<bool>,

    /// Ids available for reuse.
    dead_pool: SegQueue<Id>,
}

impl Allocator {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity, reusing a freed slot when one is available.
    pub fn alloc(&mut self) -> Entity {
        if let Some(id) = self.dead_pool.pop() {
            self.alive[id.0 as usize] = true;
            return Entity::new_with_generation(id, self.generations[id.0 as usize]);
        }

        let id = Id(self.generations.len() as u32);
        self.generations.push(Generation::FIRST);
        self.alive.push(true);
        Entity::new(id)
    }

    /// Free a live entity. Returns `false` for stale or unknown handles.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let index = entity.index();
        self.generations[index] = self.generations[index].next();
        self.alive[index] = false;
        self.dead_pool.push(entity.id());
        true
    }

    /// Whether the handle refers to the current, live occupant of its slot.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        let index = entity.index();
        index < self.generations.len()
            && self.alive[index]
            && self.generations[index] == entity.generation()
    }

    /// Number of slots ever allocated (live or dead).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.generations.len()
    }
}
