pub mod command;
pub mod component;
pub mod entity;
pub mod query;
pub mod schedule;
pub mod storage;
pub mod unique;
pub(crate) mod util;
pub mod world;

pub use command::Commands;
pub use component::Component;
pub use entity::Entity;
pub use query::Query;
pub use schedule::{Schedule, Task, TaskDefinition, TaskRegistry};
pub use unique::Unique;
pub use world::{Id as WorldId, World, WorldManager};
