use std::any::Any;

use crate::ecs::{component::Component, entity::Entity};

/// Type-erased view of a [`Column`] so storage can hold columns of every component type.
pub trait AnyColumn: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Drop the entity's value if the column holds one.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    fn len(&self) -> usize;
}

/// Sparse set of component values.
///
/// Values are packed densely; `sparse` maps an entity index to its dense slot. Removal swaps the
/// last value into the hole, so dense order is not insertion order.
pub struct Column<C: Component> {
    dense: Vec<C>,
    entities: Vec<Entity>,
    sparse: Vec<Option<usize>>,
}

impl<C: Component> Default for Column<C> {
    fn default() -> Self {
        Self {
            dense: Vec::new(),
            entities: Vec::new(),
            sparse: Vec::new(),
        }
    }
}

impl<C: Component> Column<C> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for an entity, returning the replaced value.
    pub fn insert(&mut self, entity: Entity, value: C) -> Option<C> {
        if let Some(slot) = self.slot(entity) {
            return Some(std::mem::replace(&mut self.dense[slot], value));
        }

        let index = entity.index();
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, None);
        }
        self.sparse[index] = Some(self.dense.len());
        self.dense.push(value);
        self.entities.push(entity);
        None
    }

    pub fn remove(&mut self, entity: Entity) -> Option<C> {
        let slot = self.slot(entity)?;
        self.sparse[entity.index()] = None;

        let value = self.dense.swap_remove(slot);
        self.entities.swap_remove(slot);
        if let Some(moved) = self.entities.get(slot) {
            self.sparse[moved.index()] = Some(slot);
        }
        Some(value)
    }

    #[inline]
    pub fn get(&self, entity: Entity) -> Option<&C> {
        self.slot(entity).map(|slot| &self.dense[slot])
    }

    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut C> {
        self.slot(entity).map(|slot| &mut self.dense[slot])
    }

    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.slot(entity).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Pointer to the entity's value without creating a reference to the column.
    ///
    /// # Safety
    ///
    /// `this` must point to a live column and no other reference to the column's index vectors
    /// may be active.
    pub(crate) unsafe fn value_ptr(this: *mut Self, entity: Entity) -> Option<*mut C> {
        // Safety: the caller guarantees `this` is live. Only the index vectors are borrowed; the
        // value buffer is reached through a raw pointer.
        unsafe {
            let slot = (&(*this).sparse).get(entity.index()).copied().flatten()?;
            if (&(*this).entities)[slot] != entity {
                return None;
            }
            Some((&mut (*this).dense).as_mut_ptr().add(slot))
        }
    }

    fn slot(&self, entity: Entity) -> Option<usize> {
        let slot = self.sparse.get(entity.index()).copied().flatten()?;
        (self.entities[slot] == entity).then_some(slot)
    }
}

impl<C: Component> AnyColumn for Column<C> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn len(&self) -> usize {
        self.dense.len()
    }
}
