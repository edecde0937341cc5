//! Test support: a process-wide [`ChannelLogger`] whose warnings tests can search.
//!
//! Tests share one global logger and may run in parallel, so every record is kept and tests
//! look for a message unique to them instead of draining the channel.

use std::sync::{Mutex, OnceLock, PoisonError};

use crossbeam::channel::Receiver;
use log::LevelFilter;

use super::{ChannelLogger, LogMessage};

struct Captured {
    receiver: Receiver<LogMessage>,
    seen: Mutex<Vec<LogMessage>>,
}

static CAPTURED: OnceLock<Option<Captured>> = OnceLock::new();

fn captured() -> Option<&'static Captured> {
    CAPTURED
        .get_or_init(|| {
            let (logger, receiver) = ChannelLogger::with_receiver(LevelFilter::Warn);
            log::set_boxed_logger(Box::new(logger)).ok()?;
            log::set_max_level(LevelFilter::Warn);
            Some(Captured {
                receiver,
                seen: Mutex::new(Vec::new()),
            })
        })
        .as_ref()
}

/// Install the capturing logger. Call before the code under test logs.
pub(crate) fn install() {
    assert!(captured().is_some(), "another logger is already installed");
}

/// Has a message containing `needle` been logged since [`install`]?
pub(crate) fn logged(needle: &str) -> bool {
    let Some(captured) = captured() else {
        return false;
    };
    let mut seen = captured.seen.lock().unwrap_or_else(PoisonError::into_inner);
    seen.extend(captured.receiver.try_iter());
    seen.iter().any(|message| message.message.contains(needle))
}
