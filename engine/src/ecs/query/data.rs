//! Query data: complete query shapes built from [`Parameter`]s.
//!
//! Any single parameter is `Data`, and tuples of `Data` are `Data`, so
//! `(Entity, &Transform, Option<&mut Body>)` describes a query visiting every entity with a
//! `Transform`, yielding its body when it has one.

use fixedbitset::FixedBitSet;

use crate::ecs::{
    component,
    entity::Entity,
    query::param::{Parameter, ParameterSpec},
    storage::Storage,
};

/// A complete query shape.
///
/// # Safety
///
/// Implementations must report every parameter through [`Data::spec`] and forward `prepare`
/// and `fetch` to those parameters only.
pub unsafe trait Data {
    type Value<'w>;
    type Fetch: Copy;

    fn spec(components: &component::Registry) -> DataSpec;

    fn prepare(components: &component::Registry, storage: &mut Storage) -> Self::Fetch;

    /// # Safety
    ///
    /// See [`Parameter::fetch`].
    unsafe fn fetch<'w>(fetch: Self::Fetch, entity: Entity) -> Option<Self::Value<'w>>;
}

/// Flattened list of parameter specs for a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSpec {
    params: Vec<ParameterSpec>,
}

impl DataSpec {
    pub const fn new(params: Vec<ParameterSpec>) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    /// Append another spec's parameters to this one.
    pub fn merge(mut self, other: DataSpec) -> Self {
        self.params.extend(other.params);
        self
    }

    /// True if any parameter may mutate a component.
    pub fn is_mutable(&self) -> bool {
        self.params.iter().any(ParameterSpec::is_mutable)
    }

    /// A query is valid when no component type appears in it twice.
    pub fn is_valid(&self) -> bool {
        let mut seen = FixedBitSet::new();
        for id in self.params.iter().filter_map(ParameterSpec::component) {
            seen.grow(id.index() + 1);
            if seen.put(id.index()) {
                return false;
            }
        }
        true
    }

    /// Bitset of components an entity must own to be visited.
    pub fn required(&self) -> FixedBitSet {
        let mut mask = FixedBitSet::new();
        for param in self.params.iter().filter(|param| param.is_required()) {
            if let Some(id) = param.component() {
                mask.grow(id.index() + 1);
                mask.insert(id.index());
            }
        }
        mask
    }
}

unsafe impl<P: Parameter> Data for P {
    type Value<'w> = P::Value<'w>;
    type Fetch = P::Fetch;

    fn spec(components: &component::Registry) -> DataSpec {
        DataSpec::new(vec![P::spec(components)])
    }

    fn prepare(components: &component::Registry, storage: &mut Storage) -> Self::Fetch {
        P::prepare(components, storage)
    }

    #[inline]
    unsafe fn fetch<'w>(fetch: Self::Fetch, entity: Entity) -> Option<Self::Value<'w>> {
        unsafe { P::fetch(fetch, entity) }
    }
}

unsafe impl Data for () {
    type Value<'w> = ();
    type Fetch = ();

    fn spec(_components: &component::Registry) -> DataSpec {
        DataSpec::default()
    }

    fn prepare(_components: &component::Registry, _storage: &mut Storage) -> Self::Fetch {}

    #[inline]
    unsafe fn fetch<'w>(_fetch: Self::Fetch, _entity: Entity) -> Option<Self::Value<'w>> {
        Some(())
    }
}

macro_rules! tuple_data {
    ($($name: ident),*) => {
        unsafe impl<$($name: Data),*> Data for ($($name,)*) {
            type Value<'w> = ($($name::Value<'w>,)*);
            type Fetch = ($($name::Fetch,)*);

            fn spec(components: &component::Registry) -> DataSpec {
                DataSpec::default()$(.merge($name::spec(components)))*
            }

            fn prepare(components: &component::Registry, storage: &mut Storage) -> Self::Fetch {
                ($($name::prepare(components, storage),)*)
            }

            #[allow(non_snake_case)]
            #[inline]
            unsafe fn fetch<'w>(fetch: Self::Fetch, entity: Entity) -> Option<Self::Value<'w>> {
                let ($($name,)*) = fetch;
                unsafe { Some(($($name::fetch($name, entity)?,)*)) }
            }
        }
    }
}

crate::all_tuples!(tuple_data);
