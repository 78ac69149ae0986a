//! Loop control shared between the event thread and the game loop
//!
//! Requests are plain atomic writes. The loop reads the state once at the
//! top of every iteration; nothing waits for it to notice.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};
use std::thread::{self, Thread};

/// Scheduler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LoopState {
    /// Created but not yet running
    Idle = 0,
    Running = 1,
    /// Loop keeps running; the ball is frozen
    Paused = 2,
    /// Terminal
    Stopped = 3,
}

impl LoopState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LoopState::Idle,
            1 => LoopState::Running,
            2 => LoopState::Paused,
            _ => LoopState::Stopped,
        }
    }
}

/// Window lifecycle notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Activated,
    Deactivated,
    Minimized,
    Restored,
    CloseRequested,
}

#[derive(Debug)]
pub struct LoopControl {
    state: AtomicU8,
    /// Loop thread to wake when a stop is requested mid-sleep
    sleeper: Mutex<Option<Thread>>,
}

impl Default for LoopControl {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopControl {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(LoopState::Idle as u8),
            sleeper: Mutex::new(None),
        }
    }

    pub fn state(&self) -> LoopState {
        LoopState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_paused(&self) -> bool {
        self.state() == LoopState::Paused
    }

    pub fn is_stopped(&self) -> bool {
        self.state() == LoopState::Stopped
    }

    /// Called by the loop when it starts. A pause requested before the
    /// start is kept.
    pub(crate) fn start(&self) {
        self.transition(|state| (state == LoopState::Idle).then_some(LoopState::Running));
        if let Ok(mut sleeper) = self.sleeper.lock() {
            *sleeper = Some(thread::current());
        }
    }

    pub fn pause(&self) {
        if self.transition(|state| {
            matches!(state, LoopState::Idle | LoopState::Running).then_some(LoopState::Paused)
        }) {
            log::debug!("Game paused");
        }
    }

    pub fn resume(&self) {
        if self.transition(|state| (state == LoopState::Paused).then_some(LoopState::Running)) {
            log::debug!("Game resumed");
        }
    }

    /// Request the loop to exit after its current iteration
    pub fn stop(&self) {
        let previous = self.state.swap(LoopState::Stopped as u8, Ordering::AcqRel);
        if LoopState::from_u8(previous) != LoopState::Stopped {
            log::info!("Stop requested");
            if let Ok(sleeper) = self.sleeper.lock() {
                if let Some(thread) = sleeper.as_ref() {
                    thread.unpark();
                }
            }
        }
    }

    /// Map a window notification to a loop request
    pub fn on_lifecycle(&self, event: Lifecycle) {
        match event {
            Lifecycle::Activated | Lifecycle::Restored => self.resume(),
            Lifecycle::Deactivated | Lifecycle::Minimized => self.pause(),
            Lifecycle::CloseRequested => self.stop(),
        }
    }

    /// Apply `next` atomically; returns whether the state changed
    fn transition(&self, next: impl Fn(LoopState) -> Option<LoopState>) -> bool {
        self.state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                next(LoopState::from_u8(raw)).map(|state| state as u8)
            })
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_runs() {
        let control = LoopControl::new();
        assert_eq!(control.state(), LoopState::Idle);
        control.start();
        assert_eq!(control.state(), LoopState::Running);
    }

    #[test]
    fn test_pause_resume_idempotent() {
        let control = LoopControl::new();
        control.start();

        control.pause();
        control.pause();
        assert_eq!(control.state(), LoopState::Paused);

        control.resume();
        control.resume();
        assert_eq!(control.state(), LoopState::Running);
    }

    #[test]
    fn test_pause_before_start_is_kept() {
        let control = LoopControl::new();
        control.pause();
        control.start();
        assert!(control.is_paused());
    }

    #[test]
    fn test_stop_is_terminal() {
        let control = LoopControl::new();
        control.start();
        control.stop();
        control.resume();
        control.pause();
        control.start();
        assert!(control.is_stopped());
    }

    #[test]
    fn test_lifecycle_mapping() {
        let control = LoopControl::new();
        control.start();

        control.on_lifecycle(Lifecycle::Deactivated);
        assert!(control.is_paused());
        control.on_lifecycle(Lifecycle::Activated);
        assert_eq!(control.state(), LoopState::Running);
        control.on_lifecycle(Lifecycle::Minimized);
        assert!(control.is_paused());
        control.on_lifecycle(Lifecycle::Restored);
        assert_eq!(control.state(), LoopState::Running);
        control.on_lifecycle(Lifecycle::CloseRequested);
        assert!(control.is_stopped());
    }
}
