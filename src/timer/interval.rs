//! Repeat-until-stopped loops.

use std::future::Future;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::sleep;
use crate::error::{Result, TimeError};
use crate::logger::LoopLogger;

/// Run `task` until it returns `ControlFlow::Break`, sleeping `interval`
/// after every invocation.
///
/// A failing invocation is logged. With `fail_fast` the error is returned
/// and the loop ends; otherwise the loop sleeps and carries on.
pub async fn poll_until<F, Fut>(
    mut task: F,
    interval: Duration,
    fail_fast: bool,
    logger: &dyn LoopLogger,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<ControlFlow<()>>>,
{
    loop {
        match task().await {
            Ok(ControlFlow::Break(())) => return Ok(()),
            Ok(ControlFlow::Continue(())) => {}
            Err(err) => {
                logger.error(&format!("{:#}", err));
                if fail_fast {
                    return Err(TimeError::Operation(err));
                }
            }
        }
        sleep(interval).await;
    }
}

/// What a [`spawn_interval`] loop does on its next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IntervalCommand {
    /// Invoke the task.
    Run = 1,
    /// Keep ticking without invoking the task.
    Pause = 0,
    /// Let one tick pass, then go back to `Run`.
    Skip = 2,
    /// End the loop.
    Terminate = 3,
}

impl IntervalCommand {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => IntervalCommand::Pause,
            2 => IntervalCommand::Skip,
            3 => IntervalCommand::Terminate,
            _ => IntervalCommand::Run,
        }
    }
}

#[derive(Debug)]
struct CommandCell(AtomicU8);

impl CommandCell {
    fn load(&self) -> IntervalCommand {
        IntervalCommand::from_u8(self.0.load(Ordering::SeqCst))
    }

    fn store(&self, command: IntervalCommand) {
        self.0.store(command as u8, Ordering::SeqCst);
    }

    /// Replace `Run` with `next` unless someone changed the command meanwhile.
    fn advance_from_run(&self, next: IntervalCommand) {
        let _ = self.0.compare_exchange(
            IntervalCommand::Run as u8,
            next as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }
}

/// Handle to a loop started by [`spawn_interval`].
#[derive(Debug)]
pub struct IntervalHandle {
    command: Arc<CommandCell>,
    join: JoinHandle<()>,
}

impl IntervalHandle {
    /// Current command
    pub fn command(&self) -> IntervalCommand {
        self.command.load()
    }

    /// Override the command the loop sees on its next tick
    pub fn set_command(&self, command: IntervalCommand) {
        self.command.store(command);
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Stop the loop immediately, even mid-invocation
    pub fn abort(&self) {
        self.join.abort();
    }

    /// Wait for the loop to end
    pub async fn join(self) -> Result<()> {
        self.join.await?;
        Ok(())
    }
}

/// Start a background loop that ticks every `interval`.
///
/// The first tick happens one `interval` after the call. On each tick the
/// current [`IntervalCommand`] decides what happens; when the task runs, the
/// command it returns applies from the next tick on. A failing task is
/// logged and the current command stays in effect.
pub fn spawn_interval<F, Fut>(mut task: F, interval: Duration, logger: Arc<dyn LoopLogger>) -> IntervalHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<IntervalCommand>> + Send + 'static,
{
    let command = Arc::new(CommandCell(AtomicU8::new(IntervalCommand::Run as u8)));
    let state = Arc::clone(&command);

    let join = tokio::spawn(async move {
        loop {
            sleep(interval).await;
            match state.load() {
                IntervalCommand::Terminate => break,
                IntervalCommand::Pause => {}
                IntervalCommand::Skip => {
                    state.store(IntervalCommand::Run);
                    logger.info("interval tick skipped");
                }
                IntervalCommand::Run => match task().await {
                    Ok(next) => state.advance_from_run(next),
                    Err(err) => logger.error(&format!("{:#}", err)),
                },
            }
        }
    });

    IntervalHandle { command, join }
}
