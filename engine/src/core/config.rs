//! Engine configuration.
//!
//! Every field has a default, so a config file only needs to name what it changes:
//!
//! ```json
//! { "physics": { "fixed_time_step": 0.008333, "max_sub_steps": 4 } }
//! ```

use serde::{Deserialize, Serialize};

use crate::core::time::SIXTY_FPS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub physics: PhysicsConfig,
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// How physics worlds turn frame time into simulation steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Length of one simulation step in seconds.
    pub fixed_time_step: f32,
    /// Most steps simulated per frame. Zero simulates each frame as one variable-length step.
    pub max_sub_steps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            fixed_time_step: SIXTY_FPS,
            max_sub_steps: 10,
        }
    }
}
