use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

use crate::ecs::unique::Unique;

/// Type-erased storage for singleton values, keyed by [`TypeId`].
///
/// Each unique type has at most one instance. Inserting again replaces the stored value.
#[derive(Default)]
pub struct Uniques {
    data: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Uniques {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a unique, returning the value it replaced.
    pub fn insert<U: Unique>(&mut self, value: U) -> Option<U> {
        self.data
            .insert(TypeId::of::<U>(), Box::new(value))
            .and_then(|stored| (stored as Box<dyn Any>).downcast::<U>().ok())
            .map(|boxed| *boxed)
    }

    #[inline]
    pub fn get<U: Unique>(&self) -> Option<&U> {
        self.data
            .get(&TypeId::of::<U>())
            .and_then(|stored| stored.downcast_ref::<U>())
    }

    #[inline]
    pub fn get_mut<U: Unique>(&mut self) -> Option<&mut U> {
        self.data
            .get_mut(&TypeId::of::<U>())
            .and_then(|stored| stored.downcast_mut::<U>())
    }

    pub fn remove<U: Unique>(&mut self) -> Option<U> {
        self.data
            .remove(&TypeId::of::<U>())
            .and_then(|stored| (stored as Box<dyn Any>).downcast::<U>().ok())
            .map(|boxed| *boxed)
    }

    #[inline]
    pub fn contains<U: Unique>(&self) -> bool {
        self.data.contains_key(&TypeId::of::<U>())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
