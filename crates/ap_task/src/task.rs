use core::fmt;
use core::pin::Pin;
use core::task::{Context, Poll};

use crate::Arg;

// -----------------------------------------------------------------------------
// Task

/// Handle to a computation spawned on a [`LocalExecutor`].
///
/// Await it for the output, or convert it into a pending [`Arg`] when the
/// output is a `Result`. Dropping the handle cancels the computation, see
/// [`detach`](Self::detach) to keep it running.
///
/// [`LocalExecutor`]: crate::LocalExecutor
#[must_use = "a dropped `Task` is cancelled, call `.detach()` to keep it running"]
#[repr(transparent)]
pub struct Task<T>(pub(crate) async_task::Task<T>);

impl<T> Unpin for Task<T> {}

impl<T> Task<T> {
    /// Drops the handle without cancelling the computation.
    #[inline]
    pub fn detach(self) {
        self.0.detach();
    }

    /// Cancels the computation, returning its output if it already finished.
    #[inline]
    pub async fn cancel(self) -> Option<T> {
        self.0.cancel().await
    }

    /// Returns `true` once the output is available.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl<T> Future for Task<T> {
    type Output = T;

    #[inline]
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx)
    }
}

impl<T> fmt::Debug for Task<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'a, T: 'a, E: 'a> From<Task<Result<T, E>>> for Arg<'a, T, E> {
    /// The task keeps running on its executor, the argument only observes it.
    #[inline]
    fn from(task: Task<Result<T, E>>) -> Self {
        Arg::pending(task)
    }
}
