//! Promise pairs settled from the outside.

use alloc::boxed::Box;
use core::fmt;
use core::pin::Pin;
use core::task::{Context, Poll};

use async_channel::{Receiver, Sender};
use futures_lite::future;

use crate::{Arg, BoxedFuture};

// -----------------------------------------------------------------------------
// deferred

/// Creates a pending value together with the handle that settles it.
///
/// The [`Deferred`] half completes once the [`Resolver`] calls
/// [`resolve`](Resolver::resolve) or [`reject`](Resolver::reject).
/// If the resolver is dropped without settling, the value stays
/// pending forever.
///
/// # Example
///
/// ```
/// use ap_task::{block_on, deferred};
///
/// let (resolver, value) = deferred::<u32, ()>();
/// resolver.resolve(4);
/// assert_eq!(block_on(value), Ok(4));
/// ```
pub fn deferred<T: 'static, E: 'static>() -> (Resolver<T, E>, Deferred<T, E>) {
    let (sender, receiver) = async_channel::bounded(1);
    let resolver = Resolver {
        sender: Some(sender),
    };
    let deferred = Deferred {
        inner: Box::pin(settled(receiver)),
    };
    (resolver, deferred)
}

async fn settled<T, E>(receiver: Receiver<Result<T, E>>) -> Result<T, E> {
    match receiver.recv().await {
        Ok(result) => result,
        // The resolver was dropped, nothing can settle this value anymore.
        Err(_) => future::pending().await,
    }
}

// -----------------------------------------------------------------------------
// Resolver

/// The settling half of [`deferred`].
pub struct Resolver<T, E> {
    sender: Option<Sender<Result<T, E>>>,
}

impl<T, E> Resolver<T, E> {
    /// Settles the value with `Ok(value)`.
    #[inline]
    pub fn resolve(mut self, value: T) {
        self.settle(Ok(value));
    }

    /// Settles the value with `Err(error)`.
    #[inline]
    pub fn reject(mut self, error: E) {
        self.settle(Err(error));
    }

    fn settle(&mut self, result: Result<T, E>) {
        if let Some(sender) = self.sender.take() {
            // Fails only if the `Deferred` half is gone, then nobody is waiting.
            let _ = sender.try_send(result);
        }
    }
}

impl<T, E> Drop for Resolver<T, E> {
    fn drop(&mut self) {
        if self.sender.is_some() {
            log::debug!("`Resolver` dropped without settling, its value stays pending");
        }
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("settled", &self.sender.is_none())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Deferred

/// The pending half of [`deferred`].
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Deferred<T, E> {
    inner: BoxedFuture<'static, Result<T, E>>,
}

impl<T, E> Future for Deferred<T, E> {
    type Output = Result<T, E>;

    #[inline]
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

impl<T, E> fmt::Debug for Deferred<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred").finish_non_exhaustive()
    }
}

impl<'a, T: 'static, E: 'static> From<Deferred<T, E>> for Arg<'a, T, E> {
    #[inline]
    fn from(deferred: Deferred<T, E>) -> Self {
        Arg::pending(deferred)
    }
}

// -----------------------------------------------------------------------------
// Tests
