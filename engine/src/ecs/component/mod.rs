//! Component types for the ECS.
//!
//! Components are plain data attached to entities. Each world assigns every component type it
//! sees a dense [`Id`] through its [`Registry`]; ids index column storage and entity signatures.
//!
//! ```ignore
//! use helium_engine::Component;
//!
//! #[derive(Component)]
//! struct Health(u32);
//!
//! let registry = Registry::new();
//! let id = registry.register::<Health>();
//! assert_eq!(registry.get::<Health>(), Some(id));
//! ```

mod registry;
mod set;

pub use registry::Registry;
pub use set::Set;

/// A dense, per-world component type identifier.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the index of this component if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Id {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

/// Marker trait for entity-level data. Use `#[derive(Component)]` to implement it.
pub trait Component: 'static + Sized + Send + Sync {}
