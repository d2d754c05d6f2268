//! Timed suspension points for progressive delivery.

use std::fmt::Debug;
use std::time::Duration;

/// Something that can hold up the caller for a while.
///
/// Pauses are purely presentational: implementations must not perform I/O
/// or hold locks across the pause.
pub trait Pacer: Debug + Send + Sync {
    fn pause(&self, duration: Duration);
}

/// Blocks the current thread for the requested duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepPacer;

impl Pacer for SleepPacer {
    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Never blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPacer;

impl Pacer for NoopPacer {
    fn pause(&self, _duration: Duration) {}
}
