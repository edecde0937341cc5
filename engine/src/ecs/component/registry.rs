use std::any::{TypeId, type_name};
use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::DashMap;

use super::{Component, Id};

/// Thread-safe registration and lookup of component types.
///
/// Registration is idempotent: registering a type twice returns the id it was first given.
/// Lookups are lock-free reads on the underlying `DashMap`.
#[derive(Debug, Default)]
pub struct Registry {
    ids: DashMap<TypeId, Id>,
    names: DashMap<Id, &'static str>,
    next: AtomicU32,
}

impl Registry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component type, returning its id.
    pub fn register<C: Component>(&self) -> Id {
        *self.ids.entry(TypeId::of::<C>()).or_insert_with(|| {
            let id = Id::new(self.next.fetch_add(1, Ordering::Relaxed));
            self.names.insert(id, type_name::<C>());
            id
        })
    }

    /// Get the id for a component type if it has been registered.
    #[inline]
    pub fn get<C: Component>(&self) -> Option<Id> {
        self.ids.get(&TypeId::of::<C>()).map(|id| *id)
    }

    /// The Rust type name a component id was registered for.
    pub fn name(&self, id: Id) -> Option<&'static str> {
        self.names.get(&id).map(|name| *name)
    }

    /// Number of registered component types.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
