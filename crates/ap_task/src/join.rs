//! The all-combinator: wait for every argument, in order, or fail on the first failure.

use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;
use core::pin::Pin;
use core::task::{Context, Poll};

use crate::Arg;
use crate::macro_utils::impl_resolve_args;

// -----------------------------------------------------------------------------
// ResolveArgs

/// A set of [`Arg`]s that can be resolved together.
///
/// Implemented for tuples of up to eight [`Arg`]s sharing one error type,
/// and for `Vec<Arg<T, E>>`.
///
/// Every argument is polled on each wake-up, so the order in which the
/// arguments settle does not matter. The resolved values keep the
/// position of their argument. The first failure observed ends the
/// resolution and the remaining arguments are dropped.
///
/// # Example
///
/// ```
/// use ap_task::{Arg, ResolveArgs, block_on};
///
/// let args = (
///     Arg::<_, &str>::pending(async { Ok(2) }),
///     Arg::ready(3),
/// );
/// assert_eq!(block_on(args.resolve()), Ok((2, 3)));
/// ```
pub trait ResolveArgs<E>: Unpin {
    /// The resolved values, in argument order.
    type Output;

    /// Number of positional arguments.
    fn arity(&self) -> usize;

    /// Polls every unsettled argument once.
    ///
    /// Returns `Ready(Ok(()))` once all of them hold a value.
    #[doc(hidden)]
    fn poll_settle(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), E>>;

    /// Moves the values out after [`poll_settle`](Self::poll_settle) returned `Ok`.
    #[doc(hidden)]
    fn take_settled(&mut self) -> Self::Output;

    /// Returns a future resolving every argument.
    #[inline]
    fn resolve(self) -> Resolve<Self, E>
    where
        Self: Sized,
    {
        Resolve {
            args: Some(self),
            _marker: PhantomData,
        }
    }
}

impl<E> ResolveArgs<E> for () {
    type Output = ();

    #[inline]
    fn arity(&self) -> usize {
        0
    }

    #[inline]
    fn poll_settle(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), E>> {
        Poll::Ready(Ok(()))
    }

    #[inline]
    fn take_settled(&mut self) -> Self::Output {}
}

impl_resolve_args!(A0: 0);
impl_resolve_args!(A0: 0, A1: 1);
impl_resolve_args!(A0: 0, A1: 1, A2: 2);
impl_resolve_args!(A0: 0, A1: 1, A2: 2, A3: 3);
impl_resolve_args!(A0: 0, A1: 1, A2: 2, A3: 3, A4: 4);
impl_resolve_args!(A0: 0, A1: 1, A2: 2, A3: 3, A4: 4, A5: 5);
impl_resolve_args!(A0: 0, A1: 1, A2: 2, A3: 3, A4: 4, A5: 5, A6: 6);
impl_resolve_args!(A0: 0, A1: 1, A2: 2, A3: 3, A4: 4, A5: 5, A6: 6, A7: 7);

impl<'a, T, E> ResolveArgs<E> for Vec<Arg<'a, T, E>> {
    type Output = Vec<T>;

    #[inline]
    fn arity(&self) -> usize {
        self.len()
    }

    fn poll_settle(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), E>> {
        let mut pending = false;
        let mut failure = None;
        for arg in self.iter_mut() {
            match arg.poll_settle(cx) {
                Poll::Ready(Ok(())) => {}
                Poll::Ready(Err(error)) => {
                    failure = Some(error);
                    break;
                }
                Poll::Pending => pending = true,
            }
        }

        if let Some(error) = failure {
            self.clear();
            Poll::Ready(Err(error))
        } else if pending {
            Poll::Pending
        } else {
            Poll::Ready(Ok(()))
        }
    }

    fn take_settled(&mut self) -> Self::Output {
        self.iter_mut().map(Arg::take_settled).collect()
    }
}

// -----------------------------------------------------------------------------
// Resolve

/// Future returned by [`ResolveArgs::resolve`] and [`try_join_all`].
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Resolve<A, E> {
    args: Option<A>,
    _marker: PhantomData<fn() -> E>,
}

impl<A: ResolveArgs<E>, E> Future for Resolve<A, E> {
    type Output = Result<A::Output, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let Some(args) = this.args.as_mut() else {
            panic!("`Resolve` polled after completion");
        };

        match args.poll_settle(cx) {
            Poll::Ready(Ok(())) => {
                let output = args.take_settled();
                this.args = None;
                Poll::Ready(Ok(output))
            }
            Poll::Ready(Err(error)) => {
                this.args = None;
                Poll::Ready(Err(error))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<A, E> fmt::Debug for Resolve<A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolve")
            .field("finished", &self.args.is_none())
            .finish()
    }
}

/// A [`Resolve`] over a homogeneous list of arguments.
pub type TryJoinAll<'a, T, E> = Resolve<Vec<Arg<'a, T, E>>, E>;

/// Waits for every argument of `args`, keeping their order.
///
/// Fails with the first error observed, the other arguments are dropped.
///
/// # Example
///
/// ```
/// use ap_task::{Arg, block_on, try_join_all};
///
/// let args = [
///     Arg::<_, ()>::pending(async { Ok('a') }),
///     Arg::ready('b'),
/// ];
/// assert_eq!(block_on(try_join_all(args)), Ok(vec!['a', 'b']));
/// ```
pub fn try_join_all<'a, T, E>(args: impl IntoIterator<Item = Arg<'a, T, E>>) -> TryJoinAll<'a, T, E> {
    args.into_iter().collect::<Vec<_>>().resolve()
}

// -----------------------------------------------------------------------------
// Tests
