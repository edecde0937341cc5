//! Helium engine core: an entity-component-system with a constraint-ordered task scheduler and
//! a rigid body physics layer kept in sync with entity transforms every tick.
//!
//! The frame pipeline looks like this:
//!
//! ```text
//! TaskRegistry ──build_schedule()──► Schedule [.., PreProcessPhysics, ProcessPhysicsWorlds, ..]
//!                                        │
//! Engine::tick(dt) ──► Schedule::execute ┴─► task(Frame) ─► Commands::flush ─► next task ...
//! ```

// Lets the derive macros emit `::helium_engine::...` paths that also resolve inside this crate.
extern crate self as helium_engine;

pub mod components;
pub mod core;
pub mod ecs;
pub mod physics;

pub use helium_macros::{Component, Unique};
