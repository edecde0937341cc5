//! Unique (singleton) types for the ECS.
//!
//! A unique exists at most once per world. The physics world of a scene is the canonical
//! example: every body in the world shares it, so it lives beside the entities rather than on
//! one of them.
//!
//! | Aspect | Unique | Component |
//! |--------|--------|-----------|
//! | Cardinality | One per type per world | One per entity |
//! | Access | `world.get_unique::<U>()` | Queries over matching entities |
//!
//! # Example
//!
//! ```rust,ignore
//! use helium_engine::Unique;
//!
//! #[derive(Unique)]
//! struct Score(u32);
//!
//! world.add_unique(Score(0));
//! world.get_unique_mut::<Score>().unwrap().0 += 10;
//! ```

/// A trait for singleton types in the ECS. Use `#[derive(Unique)]` to implement it.
pub trait Unique: 'static + Send + Sync {}
