//! Collision shape descriptions and their native counterparts.

use glam::{Quat, Vec3};
use rapier3d::prelude::SharedShape;
use serde::{Deserialize, Serialize};

/// The closed set of primitive shapes a body can be built from.
///
/// ```json
/// { "type": "Sphere", "radius": 0.5 }
/// { "type": "Box", "half_extents": [1.0, 0.5, 1.0] }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
}

/// One shape of a body, with its offset from the body origin and its mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeDefinition {
    pub shape: Shape,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default = "identity")]
    pub rotation: Quat,
    #[serde(default)]
    pub mass: f32,
}

fn identity() -> Quat {
    Quat::IDENTITY
}

impl ShapeDefinition {
    /// A shape centred on the body origin.
    pub fn new(shape: Shape, mass: f32) -> Self {
        Self {
            shape,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            mass,
        }
    }

    pub fn with_offset(mut self, position: Vec3, rotation: Quat) -> Self {
        self.position = position;
        self.rotation = rotation;
        self
    }

    /// Is this shape placed away from the body origin?
    pub fn is_offset(&self) -> bool {
        self.position != Vec3::ZERO || self.rotation != Quat::IDENTITY
    }
}

/// Build the native collision shape for a shape description.
pub fn create_native_shape(shape: &Shape) -> SharedShape {
    match *shape {
        Shape::Sphere { radius } => SharedShape::ball(radius),
        Shape::Box { half_extents } => {
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_deserialize_from_tagged_json() {
        // Given
        let json = r#"[
            { "shape": { "type": "Sphere", "radius": 0.5 }, "mass": 2.0 },
            {
                "shape": { "type": "Box", "half_extents": [1.0, 2.0, 3.0] },
                "position": [0.0, 1.0, 0.0]
            }
        ]"#;

        // When
        let shapes: Vec<ShapeDefinition> = serde_json::from_str(json).unwrap();

        // Then
        assert_eq!(shapes[0].shape, Shape::Sphere { radius: 0.5 });
        assert_eq!(shapes[0].mass, 2.0);
        assert!(!shapes[0].is_offset());
        assert_eq!(
            shapes[1].shape,
            Shape::Box {
                half_extents: Vec3::new(1.0, 2.0, 3.0)
            }
        );
        assert_eq!(shapes[1].mass, 0.0);
        assert!(shapes[1].is_offset());
    }

    #[test]
    fn native_shapes_match_dimensions() {
        let ball = create_native_shape(&Shape::Sphere { radius: 0.25 });
        let cuboid = create_native_shape(&Shape::Box {
            half_extents: Vec3::new(1.0, 2.0, 3.0),
        });

        assert_eq!(ball.as_ball().map(|ball| ball.radius), Some(0.25));
        let half_extents = cuboid.as_cuboid().map(|cuboid| cuboid.half_extents);
        assert_eq!(half_extents.map(|h| (h.x, h.y, h.z)), Some((1.0, 2.0, 3.0)));
    }
}
