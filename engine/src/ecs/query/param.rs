//! Query parameter types and specifications.
//!
//! A [`Parameter`] is one element of a query: `&C`, `&mut C`, `Option<&C>`, `Option<&mut C>`
//! or `Entity`. Tuples of parameters form [`Data`](super::Data).
//!
//! | Type | Mutability | Optional |
//! |------|------------|----------|
//! | `&C` | No | No |
//! | `&mut C` | Yes | No |
//! | `Option<&C>` | No | Yes |
//! | `Option<&mut C>` | Yes | Yes |
//! | `Entity` | N/A | No |

use std::ptr::NonNull;

use crate::ecs::{
    component::{self, Component},
    entity::Entity,
    storage::{Column, Storage},
};

/// What a single parameter asks of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterSpec {
    /// The entity being visited.
    Entity,

    /// A component column.
    Component {
        id: component::Id,
        mutable: bool,
        optional: bool,
    },
}

impl ParameterSpec {
    /// The component this parameter reads, if any.
    pub fn component(&self) -> Option<component::Id> {
        match self {
            ParameterSpec::Entity => None,
            ParameterSpec::Component { id, .. } => Some(*id),
        }
    }

    /// Whether entities must own the component to be visited.
    pub fn is_required(&self) -> bool {
        matches!(self, ParameterSpec::Component { optional: false, .. })
    }

    pub fn is_mutable(&self) -> bool {
        matches!(self, ParameterSpec::Component { mutable: true, .. })
    }
}

/// A single query parameter that can be fetched from world storage.
///
/// # Safety
///
/// Implementations must only dereference the pointers captured in [`Parameter::prepare`] and
/// must report every component they touch through [`Parameter::spec`], so the query can reject
/// aliasing requests before any fetch happens.
pub unsafe trait Parameter: Sized {
    /// The value handed to callers, with the world lifetime applied.
    type Value<'w>;

    /// Per-query state captured once before iteration, typically a column pointer.
    type Fetch: Copy;

    /// Describe this parameter, registering its component type if needed.
    fn spec(components: &component::Registry) -> ParameterSpec;

    /// Capture the state needed to fetch values for many entities.
    fn prepare(components: &component::Registry, storage: &mut Storage) -> Self::Fetch;

    /// Fetch the value for one entity. Returns `None` if a required component is missing.
    ///
    /// # Safety
    ///
    /// The storage `prepare` was called with must outlive `'w`, must not be accessed through any
    /// other path during `'w`, and no two live values may come from the same entity and column
    /// unless both are shared.
    unsafe fn fetch<'w>(fetch: Self::Fetch, entity: Entity) -> Option<Self::Value<'w>>;
}

fn column<C: Component>(
    components: &component::Registry,
    storage: &mut Storage,
) -> Option<NonNull<Column<C>>> {
    storage.column_ptr::<C>(components.register::<C>())
}

unsafe impl Parameter for Entity {
    type Value<'w> = Entity;
    type Fetch = ();

    fn spec(_components: &component::Registry) -> ParameterSpec {
        ParameterSpec::Entity
    }

    fn prepare(_components: &component::Registry, _storage: &mut Storage) -> Self::Fetch {}

    #[inline]
    unsafe fn fetch<'w>(_fetch: Self::Fetch, entity: Entity) -> Option<Self::Value<'w>> {
        Some(entity)
    }
}

unsafe impl<C: Component> Parameter for &C {
    type Value<'w> = &'w C;
    type Fetch = Option<NonNull<Column<C>>>;

    fn spec(components: &component::Registry) -> ParameterSpec {
        ParameterSpec::Component {
            id: components.register::<C>(),
            mutable: false,
            optional: false,
        }
    }

    fn prepare(components: &component::Registry, storage: &mut Storage) -> Self::Fetch {
        column::<C>(components, storage)
    }

    #[inline]
    unsafe fn fetch<'w>(fetch: Self::Fetch, entity: Entity) -> Option<Self::Value<'w>> {
        // Safety: upheld by the caller, see trait docs.
        unsafe { Column::value_ptr(fetch?.as_ptr(), entity).map(|value| &*value) }
    }
}

unsafe impl<C: Component> Parameter for &mut C {
    type Value<'w> = &'w mut C;
    type Fetch = Option<NonNull<Column<C>>>;

    fn spec(components: &component::Registry) -> ParameterSpec {
        ParameterSpec::Component {
            id: components.register::<C>(),
            mutable: true,
            optional: false,
        }
    }

    fn prepare(components: &component::Registry, storage: &mut Storage) -> Self::Fetch {
        column::<C>(components, storage)
    }

    #[inline]
    unsafe fn fetch<'w>(fetch: Self::Fetch, entity: Entity) -> Option<Self::Value<'w>> {
        // Safety: upheld by the caller, see trait docs.
        unsafe { Column::value_ptr(fetch?.as_ptr(), entity).map(|value| &mut *value) }
    }
}

unsafe impl<C: Component> Parameter for Option<&C> {
    type Value<'w> = Option<&'w C>;
    type Fetch = Option<NonNull<Column<C>>>;

    fn spec(components: &component::Registry) -> ParameterSpec {
        ParameterSpec::Component {
            id: components.register::<C>(),
            mutable: false,
            optional: true,
        }
    }

    fn prepare(components: &component::Registry, storage: &mut Storage) -> Self::Fetch {
        column::<C>(components, storage)
    }

    #[inline]
    unsafe fn fetch<'w>(fetch: Self::Fetch, entity: Entity) -> Option<Self::Value<'w>> {
        // Safety: upheld by the caller, see trait docs.
        Some(unsafe { <&C as Parameter>::fetch(fetch, entity) })
    }
}

unsafe impl<C: Component> Parameter for Option<&mut C> {
    type Value<'w> = Option<&'w mut C>;
    type Fetch = Option<NonNull<Column<C>>>;

    fn spec(components: &component::Registry) -> ParameterSpec {
        ParameterSpec::Component {
            id: components.register::<C>(),
            mutable: true,
            optional: true,
        }
    }

    fn prepare(components: &component::Registry, storage: &mut Storage) -> Self::Fetch {
        column::<C>(components, storage)
    }

    #[inline]
    unsafe fn fetch<'w>(fetch: Self::Fetch, entity: Entity) -> Option<Self::Value<'w>> {
        // Safety: upheld by the caller, see trait docs.
        Some(unsafe { <&mut C as Parameter>::fetch(fetch, entity) })
    }
}
