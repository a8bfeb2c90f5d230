use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use ap_task::{Arg, BoxedFuture};

use crate::{CallError, wrap_async};

// -----------------------------------------------------------------------------
// Method

type Invoke<'a, S, T, E> =
    dyn Fn(Rc<S>, Vec<Arg<'a, T, E>>) -> BoxedFuture<'a, Result<T, CallError<E>>> + 'a;

/// A type-erased method stored on an [`Object`](crate::Object).
///
/// A method receives the object's receiver state `Rc<S>` and its
/// positional arguments as a list of [`Arg`]s.
///
/// - Methods built with [`new`](Self::new) or [`new_async`](Self::new_async)
///   only accept immediate arguments, a pending one fails the call with
///   [`CallError::PendingArgument`].
/// - [`wrap`](Self::wrap) returns a method that resolves pending arguments
///   first. Wrapping a wrapped method adds another layer, see [`depth`](Self::depth).
///
/// Cloning a method is cheap and shares the underlying function.
pub struct Method<'a, S, T, E> {
    invoke: Rc<Invoke<'a, S, T, E>>,
    depth: usize,
}

impl<S, T, E> Clone for Method<'_, S, T, E> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            invoke: Rc::clone(&self.invoke),
            depth: self.depth,
        }
    }
}

impl<S, T, E> fmt::Debug for Method<'_, S, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

fn immediate<T, E>(args: Vec<Arg<'_, T, E>>) -> Result<Vec<T>, CallError<E>> {
    args.into_iter()
        .enumerate()
        .map(|(index, arg)| {
            arg.into_ready()
                .map_err(|_| CallError::PendingArgument { index })
        })
        .collect()
}

impl<'a, S: 'a, T: 'a, E: 'a> Method<'a, S, T, E> {
    /// Creates a method from a synchronous function.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&S, Vec<T>) -> Result<T, E> + 'a,
    {
        let invoke = move |receiver: Rc<S>, args: Vec<Arg<'a, T, E>>| -> BoxedFuture<'a, Result<T, CallError<E>>> {
            let result = immediate(args)
                .and_then(|values| func(&receiver, values).map_err(CallError::Rejected));
            Box::pin(core::future::ready(result))
        };

        Self {
            invoke: Rc::new(invoke),
            depth: 0,
        }
    }

    /// Creates a method from a function returning a future.
    pub fn new_async<F, Fut>(func: F) -> Self
    where
        F: Fn(Rc<S>, Vec<T>) -> Fut + 'a,
        Fut: Future<Output = Result<T, E>> + 'a,
    {
        let invoke = move |receiver: Rc<S>, args: Vec<Arg<'a, T, E>>| -> BoxedFuture<'a, Result<T, CallError<E>>> {
            match immediate(args) {
                Ok(values) => {
                    let future = func(receiver, values);
                    Box::pin(async move { future.await.map_err(CallError::Rejected) })
                }
                Err(error) => Box::pin(core::future::ready(Err(error))),
            }
        };

        Self {
            invoke: Rc::new(invoke),
            depth: 0,
        }
    }

    /// Returns a method accepting pending arguments that forwards the
    /// resolved values to this one.
    ///
    /// `self` is left untouched, clones of it keep their behavior.
    pub fn wrap(&self) -> Self {
        let inner = Rc::clone(&self.invoke);
        let wrapped = Rc::new(wrap_async(move |receiver: Rc<S>, values: Vec<T>| {
            (*inner)(receiver, values.into_iter().map(Arg::ready).collect())
        }));

        let invoke = move |receiver: Rc<S>, args: Vec<Arg<'a, T, E>>| -> BoxedFuture<'a, Result<T, CallError<E>>> {
            let wrapped = Rc::clone(&wrapped);
            let args: Vec<_> = args
                .into_iter()
                .map(|arg| arg.map_err(CallError::Rejected))
                .collect();
            Box::pin(async move { wrapped.call_all_on(receiver, args).await })
        };

        Self {
            invoke: Rc::new(invoke),
            depth: self.depth + 1,
        }
    }

    /// Calls the method with `receiver` as its calling context.
    #[inline]
    pub fn call(
        &self,
        receiver: Rc<S>,
        args: Vec<Arg<'a, T, E>>,
    ) -> BoxedFuture<'a, Result<T, CallError<E>>> {
        (*self.invoke)(receiver, args)
    }
}

impl<S, T, E> Method<'_, S, T, E> {
    /// Number of resolving layers around the original function.
    ///
    /// `0` for a plain method, `2` after wrapping twice.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns `true` if the method accepts pending arguments.
    #[inline]
    pub fn is_wrapped(&self) -> bool {
        self.depth > 0
    }

    /// Returns `true` if both methods share the same function.
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.invoke, &other.invoke)
    }
}

// -----------------------------------------------------------------------------
// Tests
