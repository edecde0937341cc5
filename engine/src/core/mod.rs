pub mod config;
pub mod context;
pub mod engine;
pub mod flags;
pub mod frame;
pub mod log;
pub mod time;

pub use config::{EngineConfig, PhysicsConfig};
pub use context::EngineContext;
pub use engine::Engine;
pub use flags::{FlagBits, FlagRegistry};
pub use frame::Frame;
