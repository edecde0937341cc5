//! Plain-data body and world descriptions, loaded once and read-only afterwards.
//!
//! ```json
//! {
//!     "shapes": [{ "shape": { "type": "Sphere", "radius": 0.5 }, "mass": 1.0 }],
//!     "restitution": 0.3,
//!     "lock_rotations": { "x": true, "z": true },
//!     "contact_groups": ["Player"],
//!     "contact_mask": ["Pickup", "Enemy"]
//! }
//! ```

use glam::Vec3;
use rapier3d::prelude::LockedAxes;
use serde::{Deserialize, Serialize};

use crate::physics::shape::ShapeDefinition;

/// Per-axis lock flags.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisLocks {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl AxisLocks {
    pub const NONE: AxisLocks = AxisLocks {
        x: false,
        y: false,
        z: false,
    };

    pub const ALL: AxisLocks = AxisLocks {
        x: true,
        y: true,
        z: true,
    };
}

/// Description of a rigid body: its shapes, surface response, damping and axis locks.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyDefinition {
    pub shapes: Vec<ShapeDefinition>,
    pub restitution: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub lock_positions: AxisLocks,
    pub lock_rotations: AxisLocks,
    /// Driven by game logic instead of the solver.
    pub kinematic: bool,
    /// Contact flag names this body belongs to.
    pub contact_groups: Vec<String>,
    /// Contact flag names this body records contacts with.
    pub contact_mask: Vec<String>,
}

impl BodyDefinition {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sum of every shape's mass. Zero makes the body static.
    pub fn total_mass(&self) -> f32 {
        self.shapes.iter().map(|shape| shape.mass).sum()
    }

    pub(crate) fn locked_axes(&self) -> LockedAxes {
        let mut axes = LockedAxes::empty();
        for (locked, axis) in [
            (self.lock_positions.x, LockedAxes::TRANSLATION_LOCKED_X),
            (self.lock_positions.y, LockedAxes::TRANSLATION_LOCKED_Y),
            (self.lock_positions.z, LockedAxes::TRANSLATION_LOCKED_Z),
            (self.lock_rotations.x, LockedAxes::ROTATION_LOCKED_X),
            (self.lock_rotations.y, LockedAxes::ROTATION_LOCKED_Y),
            (self.lock_rotations.z, LockedAxes::ROTATION_LOCKED_Z),
        ] {
            if locked {
                axes |= axis;
            }
        }
        axes
    }
}

/// Description of a physics world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldDefinition {
    pub gravity: Vec3,
}

impl WorldDefinition {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for WorldDefinition {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::shape::Shape;

    #[test]
    fn body_definition_from_json() {
        // Given
        let json = r#"{
            "shapes": [
                { "shape": { "type": "Sphere", "radius": 0.5 }, "mass": 1.5 },
                {
                    "shape": { "type": "Sphere", "radius": 0.5 },
                    "position": [0.0, 1.0, 0.0],
                    "mass": 0.5
                }
            ],
            "restitution": 0.25,
            "lock_rotations": { "x": true, "z": true },
            "contact_groups": ["Player"]
        }"#;

        // When
        let definition = BodyDefinition::from_json(json).unwrap();

        // Then
        assert_eq!(definition.shapes.len(), 2);
        assert_eq!(definition.shapes[0].shape, Shape::Sphere { radius: 0.5 });
        assert_eq!(definition.total_mass(), 2.0);
        assert_eq!(definition.restitution, 0.25);
        assert!(!definition.kinematic);
        assert_eq!(definition.contact_groups, vec!["Player".to_string()]);
        assert!(definition.contact_mask.is_empty());
        assert_eq!(
            definition.locked_axes(),
            LockedAxes::ROTATION_LOCKED_X | LockedAxes::ROTATION_LOCKED_Z
        );
    }

    #[test]
    fn world_definition_defaults_to_earth_gravity() {
        assert_eq!(
            WorldDefinition::from_json("{}").unwrap().gravity,
            Vec3::new(0.0, -9.81, 0.0)
        );
        assert_eq!(
            WorldDefinition::from_json(r#"{ "gravity": [0.0, 0.0, 0.0] }"#).unwrap().gravity,
            Vec3::ZERO
        );
    }
}
