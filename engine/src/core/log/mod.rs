//! Log plumbing for hosts embedding the engine.
//!
//! The engine only speaks the `log` facade; a host picks where records go. [`ChannelLogger`]
//! forwards them over a crossbeam channel so a frame loop can drain and render them between
//! ticks without blocking tasks.

mod channel;

pub use channel::{ChannelLogger, LogMessage};

#[cfg(test)]
pub(crate) mod capture;
