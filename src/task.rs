//! Non-blocking completion checks for tokio tasks polled from the UI loop.

use futures::FutureExt;
use tokio::task::{JoinError, JoinHandle};

/// Outcome of checking a background task
pub enum PollResult<T> {
    /// Nothing was running
    NoTask,
    /// Still running; ask for another frame
    Pending,
    /// Finished. `Err` means the task panicked or was aborted.
    Complete(Result<T, JoinError>),
}

/// Take the task's output if it has finished, without blocking.
///
/// The slot is emptied once a result is returned.
pub fn poll_task<T>(slot: &mut Option<JoinHandle<T>>) -> PollResult<T> {
    match slot {
        None => return PollResult::NoTask,
        Some(handle) if !handle.is_finished() => return PollResult::Pending,
        Some(_) => {}
    }

    let Some(handle) = slot.take() else {
        return PollResult::NoTask;
    };

    match handle.now_or_never() {
        Some(result) => PollResult::Complete(result),
        None => {
            tracing::warn!("Task not ready despite is_finished()");
            PollResult::Pending
        }
    }
}
