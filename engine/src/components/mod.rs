//! Engine-provided components shared by several subsystems.

mod transform;

pub use transform::TransformComponent;
