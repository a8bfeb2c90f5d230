use core::fmt;
use core::marker::PhantomData;

use alloc::rc::Rc;

use async_channel::{Receiver, Sender};
use async_task::Runnable;
use futures_lite::FutureExt;

use crate::Task;

// -----------------------------------------------------------------------------
// LocalExecutor

/// A single-threaded executor designed for `!Send` futures.
///
/// Tasks start running as soon as the executor is ticked, independently of
/// whoever holds their [`Task`] handle. Handing such a handle to a wrapped
/// function is how an already-initiated computation becomes a pending
/// argument.
///
/// Tasks can only be spawned from the thread that created the executor,
/// and task handles must also be used within the same thread.
///
/// The executor never polls on its own: call [`try_tick`](Self::try_tick)
/// or drive a future with [`run`](Self::run).
pub struct LocalExecutor {
    /// Scheduled tasks, woken tasks are pushed back through `sender`.
    sender: Sender<Runnable>,
    receiver: Receiver<Runnable>,
    /// Marker to tie the executor to a single-threaded context.
    _not_send: PhantomData<Rc<()>>,
}

impl Default for LocalExecutor {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LocalExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalExecutor")
            .field("tasks", &self.receiver.len())
            .finish()
    }
}

impl LocalExecutor {
    /// Creates a new, empty `LocalExecutor`.
    pub fn new() -> Self {
        let (sender, receiver) = async_channel::unbounded();
        Self {
            sender,
            receiver,
            _not_send: PhantomData,
        }
    }

    /// Spawns a single task onto the executor.
    ///
    /// The returned `Task<T>` can be awaited to retrieve the future's result.
    pub fn spawn<T: 'static>(&self, future: impl Future<Output = T> + 'static) -> Task<T> {
        let sender = self.sender.clone();

        let schedule = move |runnable: Runnable| {
            // Only fails once the executor is gone, the task is then never run.
            if sender.try_send(runnable).is_err() {
                log::trace!("task scheduled on a dropped `LocalExecutor`");
            }
        };

        let (runnable, task) = async_task::Builder::new()
            .propagate_panic(true)
            .spawn_local(|_| future, schedule);

        runnable.schedule();

        Task(task)
    }

    /// Attempts to run a single task immediately if one is scheduled.
    ///
    /// Returns `true` if a task was executed, `false` otherwise.
    pub fn try_tick(&self) -> bool {
        match self.receiver.try_recv() {
            Ok(runnable) => {
                runnable.run();
                true
            }
            Err(_) => false,
        }
    }

    /// Asynchronously runs a single task.
    /// If no tasks are available, the executor will wait until a task is scheduled.
    async fn tick(&self) {
        // The executor owns a sender, so the channel never closes.
        if let Ok(runnable) = self.receiver.recv().await {
            runnable.run();
        }
    }

    /// Continuously runs the executor until the provided future completes.
    ///
    /// The executor polls its own tasks with priority.
    #[inline(always)]
    pub async fn run<T>(&self, stop_signal: impl Future<Output = T>) -> T {
        async {
            loop {
                self.tick().await;
            }
        }
        .or(stop_signal)
        .await
    }
}

// -----------------------------------------------------------------------------
// Tests
