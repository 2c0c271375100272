//! Shared stop signal and running-task counter.
//!
//! A [`Signal`] is cloned into every loop that takes part in a coordinated
//! shutdown. Workers hold a [`RunningGuard`] while they are busy and check
//! [`Signal::should_stop`] between iterations; the owner calls
//! [`Signal::drain`] to ask them to stop and wait until they have.
//!
//! Waiters in [`Signal::block_while_running`] stay blocked through a drain:
//! both `Running` and `Stopping` hold them, only `Released` lets them go.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::sleep;
use crate::logger::LoopLogger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SignalState {
    #[default]
    Released = 0,
    /// Waiters in [`Signal::block_while_running`] keep blocking.
    Running = 1,
    /// Workers should wind down. Waiters keep blocking.
    Stopping = 2,
}

impl SignalState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => SignalState::Running,
            2 => SignalState::Stopping,
            _ => SignalState::Released,
        }
    }
}

#[derive(Debug, Default)]
struct SignalInner {
    state: AtomicU8,
    running: AtomicUsize,
}

#[derive(Debug, Clone, Default)]
pub struct Signal {
    inner: Arc<SignalInner>,
}

impl Signal {
    pub fn new() -> Self {
        Self::default()
    }

    /// A signal that starts in [`SignalState::Running`]
    pub fn running() -> Self {
        let signal = Self::new();
        signal.set(SignalState::Running);
        signal
    }

    pub fn state(&self) -> SignalState {
        SignalState::from_u8(self.inner.state.load(Ordering::SeqCst))
    }

    pub fn set(&self, state: SignalState) {
        self.inner.state.store(state as u8, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.set(SignalState::Released);
    }

    pub fn should_stop(&self) -> bool {
        self.state() == SignalState::Stopping
    }

    /// How many [`RunningGuard`]s are alive
    pub fn running_count(&self) -> usize {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Count the caller as running until the guard is dropped
    pub fn enter(&self) -> RunningGuard {
        self.inner.running.fetch_add(1, Ordering::SeqCst);
        RunningGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// True unless the state is [`SignalState::Released`]
    pub fn is_held(&self) -> bool {
        self.state() != SignalState::Released
    }

    /// Suspend until the state is [`SignalState::Released`], logging `msg`
    /// (when non-empty) before every re-check.
    pub async fn block_while_running(&self, msg: &str, check_interval: Duration, logger: &dyn LoopLogger) {
        while self.is_held() {
            if !msg.is_empty() {
                logger.info(msg);
            }
            sleep(check_interval).await;
        }
    }

    /// Switch to [`SignalState::Stopping`] and suspend until no
    /// [`RunningGuard`] is left, logging `msg` with the live count before
    /// every re-check.
    pub async fn drain(&self, msg: &str, check_interval: Duration, logger: &dyn LoopLogger) {
        self.set(SignalState::Stopping);
        loop {
            let running = self.running_count();
            if running == 0 {
                break;
            }
            if !msg.is_empty() {
                logger.info(&format!("{} running: {}", msg, running));
            }
            sleep(check_interval).await;
        }
    }
}

/// Decrements the running counter of its [`Signal`] on drop.
#[derive(Debug)]
pub struct RunningGuard {
    inner: Arc<SignalInner>,
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.inner.running.fetch_sub(1, Ordering::SeqCst);
    }
}
