//! Call arguments that are either immediate or still pending.

use alloc::boxed::Box;
use core::fmt;
use core::mem;
use core::pin::Pin;
use core::task::{Context, Poll};

// -----------------------------------------------------------------------------
// BoxedFuture

/// An owned and dynamically typed Future used when you can't
/// statically type your result or need to add some indirection.
///
/// Unlike a thread pool future this carries no `Send` bound,
/// pending arguments are driven on a single thread.
pub type BoxedFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

// -----------------------------------------------------------------------------
// Arg

enum State<'a, T, E> {
    Ready(T),
    Pending(BoxedFuture<'a, Result<T, E>>),
    Taken,
}

/// A positional argument that is either an immediate value
/// or a pending computation that settles to `Ok(T)` or `Err(E)`.
///
/// An `Arg` can be awaited directly, but it is usually handed to
/// [`try_join_all`](crate::try_join_all) or [`ResolveArgs`](crate::ResolveArgs)
/// together with the other arguments of a call.
///
/// # Example
///
/// ```
/// use ap_task::{Arg, block_on};
///
/// let now: Arg<'_, u32, ()> = Arg::ready(1);
/// let later: Arg<'_, u32, ()> = Arg::pending(async { Ok(2) });
///
/// assert!(now.is_ready());
/// assert!(later.is_pending());
/// assert_eq!(block_on(later), Ok(2));
/// ```
pub struct Arg<'a, T, E> {
    state: State<'a, T, E>,
}

// The value is never pinned, only the boxed future is.
impl<T, E> Unpin for Arg<'_, T, E> {}

impl<'a, T, E> Arg<'a, T, E> {
    /// Creates an argument that is already available.
    #[inline]
    pub const fn ready(value: T) -> Self {
        Self {
            state: State::Ready(value),
        }
    }

    /// Creates an argument that settles when `future` completes.
    #[inline]
    pub fn pending(future: impl Future<Output = Result<T, E>> + 'a) -> Self {
        Self {
            state: State::Pending(Box::pin(future)),
        }
    }

    /// Creates a pending argument that has already failed with `error`.
    ///
    /// The failure is only observed once the argument is polled.
    #[inline]
    pub fn rejected(error: E) -> Self
    where
        T: 'a,
        E: 'a,
    {
        Self::pending(core::future::ready(Err(error)))
    }

    /// Maps the failure of a pending argument with `op`.
    pub fn map_err<E2>(self, op: impl FnOnce(E) -> E2 + 'a) -> Arg<'a, T, E2>
    where
        T: 'a,
        E: 'a,
        E2: 'a,
    {
        match self.state {
            State::Ready(value) => Arg::ready(value),
            State::Pending(future) => Arg::pending(async move { future.await.map_err(op) }),
            State::Taken => Arg {
                state: State::Taken,
            },
        }
    }

    /// Returns `true` if the value is available without waiting.
    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    /// Returns `true` if the argument still has to be awaited.
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending(_))
    }

    /// Returns the value if it is available, or gives the argument back.
    pub fn into_ready(self) -> Result<T, Self> {
        match self.state {
            State::Ready(value) => Ok(value),
            state => Err(Self { state }),
        }
    }

    /// Polls the argument until it holds a value.
    ///
    /// On failure the argument is spent and must not be polled again.
    pub(crate) fn poll_settle(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), E>> {
        let future = match &mut self.state {
            State::Ready(_) => return Poll::Ready(Ok(())),
            State::Pending(future) => future,
            State::Taken => panic!("`Arg` polled after its value was taken"),
        };

        match future.as_mut().poll(cx) {
            Poll::Ready(Ok(value)) => {
                self.state = State::Ready(value);
                Poll::Ready(Ok(()))
            }
            Poll::Ready(Err(error)) => {
                self.state = State::Taken;
                Poll::Ready(Err(error))
            }
            Poll::Pending => Poll::Pending,
        }
    }

    /// Moves the value out of a settled argument.
    ///
    /// # Panics
    ///
    /// Panics if [`poll_settle`](Self::poll_settle) has not returned `Ok` yet.
    pub(crate) fn take_settled(&mut self) -> T {
        match mem::replace(&mut self.state, State::Taken) {
            State::Ready(value) => value,
            _ => unreachable!("`Arg` taken before it settled"),
        }
    }
}

impl<T, E> Future for Arg<'_, T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match this.poll_settle(cx) {
            Poll::Ready(Ok(())) => Poll::Ready(Ok(this.take_settled())),
            Poll::Ready(Err(error)) => Poll::Ready(Err(error)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Arg<'_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            State::Pending(_) => f.write_str("Pending(..)"),
            State::Taken => f.write_str("Taken"),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
