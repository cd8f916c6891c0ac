use std::time::Duration;

/// Source of the deliberate delays used by line-by-line output.
///
/// Drawing is synchronous: a paced draw blocks the input loop until it is
/// done, so key presses queue up behind it.
pub trait Pacer {
    fn pause(&self, duration: Duration);
}

/// Blocks the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}
