//! Query result iterator.

use std::marker::PhantomData;

use crate::ecs::{component, entity::Entity, query::data::Data, storage::Storage};

/// Iterator over the entities matching a query.
///
/// Matching entities are collected up front in ascending entity-index order, so the visit
/// order is stable for a given world state and the iterator knows its exact length.
pub struct Result<'w, D: Data> {
    entities: Vec<Entity>,
    index: usize,
    fetch: D::Fetch,
    _marker: PhantomData<&'w mut Storage>,
}

impl<'w, D: Data> Result<'w, D> {
    /// Match and prepare a query against world storage.
    ///
    /// # Panics
    ///
    /// Panics if the query names a component type more than once.
    pub fn new(components: &component::Registry, storage: &'w mut Storage) -> Self {
        let spec = D::spec(components);
        assert!(
            spec.is_valid(),
            "query `{}` requests the same component more than once",
            std::any::type_name::<D>()
        );

        let entities = storage.matching(&spec.required());
        let fetch = D::prepare(components, storage);

        Self {
            entities,
            index: 0,
            fetch,
            _marker: PhantomData,
        }
    }

    /// Entities still to be visited.
    pub fn entities(&self) -> &[Entity] {
        &self.entities[self.index..]
    }
}

impl<'w, D: Data> Iterator for Result<'w, D> {
    type Item = D::Value<'w>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(entity) = self.entities.get(self.index).copied() {
            self.index += 1;
            // Safety: the storage is exclusively borrowed for 'w, the spec was checked for
            // repeated components and every entity is visited at most once.
            if let Some(value) = unsafe { D::fetch(self.fetch, entity) } {
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entities.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl<'w, D: Data> ExactSizeIterator for Result<'w, D> {}
