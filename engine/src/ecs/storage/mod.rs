//! Component storage for a single world.
//!
//! Every component type gets one sparse-set [`Column`], indexed by the component's registry id.
//! Alongside the columns the storage keeps a signature per live entity: a bitset of the
//! component ids the entity currently owns. Queries match on signatures and then fetch straight
//! from the columns.
//!
//! ```text
//!   signatures          columns
//!   ┌────┬──────┐       ┌─────────────┐ ┌─────────────┐
//!   │ e0 │ 0b11 │ ───▶  │ Transform   │ │ Health      │
//!   │ e1 │ 0b01 │       │ [e0, e1]    │ │ [e0]        │
//!   └────┴──────┘       └─────────────┘ └─────────────┘
//! ```

mod column;
mod unique;

use std::ptr::NonNull;

use fixedbitset::FixedBitSet;

pub use column::{AnyColumn, Column};
pub use unique::Uniques;

use crate::ecs::{
    component::{self, Component},
    entity::Entity,
};

/// Column and signature storage for one world.
#[derive(Default)]
pub struct Storage {
    columns: Vec<Option<Box<dyn AnyColumn>>>,
    signatures: Vec<Option<(Entity, FixedBitSet)>>,
}

impl Storage {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an entity with an empty signature.
    pub fn track(&mut self, entity: Entity) {
        let index = entity.index();
        if index >= self.signatures.len() {
            self.signatures.resize_with(index + 1, || None);
        }
        self.signatures[index] = Some((entity, FixedBitSet::new()));
    }

    /// Drop every component owned by the entity and forget its signature.
    pub fn untrack(&mut self, entity: Entity) {
        let Some((_, signature)) = self
            .signatures
            .get_mut(entity.index())
            .and_then(|slot| slot.take_if(|(tracked, _)| *tracked == entity))
        else {
            return;
        };

        for id in signature.ones() {
            if let Some(Some(column)) = self.columns.get_mut(id) {
                column.remove_entity(entity);
            }
        }
    }

    /// Insert or replace a component value. Returns the previous value if there was one.
    pub fn insert<C: Component>(
        &mut self,
        id: component::Id,
        entity: Entity,
        value: C,
    ) -> Option<C> {
        let Some(signature) = self.signature_mut(entity) else {
            return None;
        };
        signature.grow(id.index() + 1);
        signature.insert(id.index());

        self.column_mut::<C>(id).insert(entity, value)
    }

    /// Remove a component value from an entity.
    pub fn remove<C: Component>(&mut self, id: component::Id, entity: Entity) -> Option<C> {
        let signature = self.signature_mut(entity)?;
        if !signature.contains(id.index()) {
            return None;
        }
        signature.set(id.index(), false);

        self.columns
            .get_mut(id.index())?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<Column<C>>()?
            .remove(entity)
    }

    pub fn get<C: Component>(&self, id: component::Id, entity: Entity) -> Option<&C> {
        self.columns
            .get(id.index())?
            .as_ref()?
            .as_any()
            .downcast_ref::<Column<C>>()?
            .get(entity)
    }

    pub fn get_mut<C: Component>(&mut self, id: component::Id, entity: Entity) -> Option<&mut C> {
        self.columns
            .get_mut(id.index())?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<Column<C>>()?
            .get_mut(entity)
    }

    /// Does the entity currently own the component?
    pub fn contains(&self, id: component::Id, entity: Entity) -> bool {
        self.signature(entity)
            .is_some_and(|signature| signature.contains(id.index()))
    }

    /// The component signature of a tracked entity.
    pub fn signature(&self, entity: Entity) -> Option<&FixedBitSet> {
        match self.signatures.get(entity.index()) {
            Some(Some((tracked, signature))) if *tracked == entity => Some(signature),
            _ => None,
        }
    }

    /// Tracked entities whose signatures contain every bit in `mask`, in index order.
    pub fn matching(&self, mask: &FixedBitSet) -> Vec<Entity> {
        self.signatures
            .iter()
            .flatten()
            .filter(|(_, signature)| mask.is_subset(signature))
            .map(|(entity, _)| *entity)
            .collect()
    }

    /// Number of tracked entities.
    pub fn len(&self) -> usize {
        self.signatures.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw pointer to a typed column, used by queries to hand out disjoint borrows.
    pub(crate) fn column_ptr<C: Component>(
        &mut self,
        id: component::Id,
    ) -> Option<NonNull<Column<C>>> {
        self.columns
            .get_mut(id.index())?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<Column<C>>()
            .map(NonNull::from)
    }

    fn signature_mut(&mut self, entity: Entity) -> Option<&mut FixedBitSet> {
        match self.signatures.get_mut(entity.index()) {
            Some(Some((tracked, signature))) if *tracked == entity => Some(signature),
            _ => None,
        }
    }

    fn column_mut<C: Component>(&mut self, id: component::Id) -> &mut Column<C> {
        let index = id.index();
        if index >= self.columns.len() {
            self.columns.resize_with(index + 1, || None);
        }

        self.columns[index]
            .get_or_insert_with(|| Box::new(Column::<C>::new()))
            .as_any_mut()
            .downcast_mut::<Column<C>>()
            .unwrap_or_else(|| panic!("component id {index} is bound to another column type"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::entity::Allocator;

    #[derive(Debug, PartialEq)]
    struct Health(u32);
    impl Component for Health {}

    #[derive(Debug, PartialEq)]
    struct Armor(u32);
    impl Component for Armor {}

    const HEALTH: component::Id = component::Id::new(0);
    const ARMOR: component::Id = component::Id::new(1);

    #[test]
    fn insert_updates_signature_and_column() {
        // Given
        let mut entities = Allocator::new();
        let mut storage = Storage::new();
        let entity = entities.alloc();
        storage.track(entity);

        // When
        assert_eq!(storage.insert(HEALTH, entity, Health(10)), None);
        let previous = storage.insert(HEALTH, entity, Health(20));

        // Then
        assert_eq!(previous, Some(Health(10)));
        assert_eq!(storage.get::<Health>(HEALTH, entity), Some(&Health(20)));
        assert!(storage.contains(HEALTH, entity));
        assert!(!storage.contains(ARMOR, entity));
    }

    #[test]
    fn untrack_removes_every_component() {
        // Given
        let mut entities = Allocator::new();
        let mut storage = Storage::new();
        let entity = entities.alloc();
        storage.track(entity);
        storage.insert(HEALTH, entity, Health(1));
        storage.insert(ARMOR, entity, Armor(2));

        // When
        storage.untrack(entity);

        // Then
        assert_eq!(storage.get::<Health>(HEALTH, entity), None);
        assert_eq!(storage.get::<Armor>(ARMOR, entity), None);
        assert!(storage.signature(entity).is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn matching_filters_by_signature_in_index_order() {
        // Given
        let mut entities = Allocator::new();
        let mut storage = Storage::new();
        let a = entities.alloc();
        let b = entities.alloc();
        let c = entities.alloc();
        for entity in [a, b, c] {
            storage.track(entity);
            storage.insert(HEALTH, entity, Health(0));
        }
        storage.insert(ARMOR, c, Armor(0));
        storage.insert(ARMOR, a, Armor(0));

        // When
        let mut mask = FixedBitSet::with_capacity(2);
        mask.insert(HEALTH.index());
        mask.insert(ARMOR.index());
        let matched = storage.matching(&mask);

        // Then
        assert_eq!(matched, vec![a, c]);
    }

    #[test]
    fn stale_entity_is_ignored() {
        // Given
        let mut entities = Allocator::new();
        let mut storage = Storage::new();
        let old = entities.alloc();
        storage.track(old);
        storage.untrack(old);
        entities.free(old);
        let new = entities.alloc();
        storage.track(new);

        // When
        let inserted = storage.insert(HEALTH, old, Health(3));

        // Then
        assert_eq!(inserted, None);
        assert!(!storage.contains(HEALTH, new));
        assert!(!storage.contains(HEALTH, old));
    }
}
