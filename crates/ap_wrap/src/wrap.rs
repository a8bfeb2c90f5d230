//! The argument resolver wrapper.

use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;

use ap_task::{Arg, ResolveArgs};

use crate::{Function, FunctionOn};

// -----------------------------------------------------------------------------
// Kinds

/// Marks a [`Wrapped`] function that cannot fail and returns its value directly.
#[derive(Debug)]
pub enum Plain {}

/// Marks a [`Wrapped`] function that returns its `Result` directly.
#[derive(Debug)]
pub enum Immediate {}

/// Marks a [`Wrapped`] function that returns a future of its `Result`.
///
/// The wrapper awaits that future, so callers never see a nested future.
#[derive(Debug)]
pub enum Eventual {}

// -----------------------------------------------------------------------------
// Wrapped

/// A function whose positional arguments may be pending.
///
/// Created with [`wrap`] or [`wrap_async`]. Each call resolves its own
/// arguments, in order, then invokes the original function exactly once
/// with the resolved values. Nothing is shared between calls.
///
/// - If an argument fails, the call fails with that error and the
///   function is never invoked.
/// - If the function fails, the call fails with the function's error,
///   converted into the argument error type with [`From`].
pub struct Wrapped<F, K = Immediate> {
    func: F,
    _kind: PhantomData<fn() -> K>,
}

/// Wraps a function that returns its value and never fails.
///
/// The call only fails when one of its arguments does.
///
/// # Example
///
/// ```
/// use ap_wrap::{Arg, block_on, wrap_plain};
///
/// let add = wrap_plain(|x: i32, y: i32| x + y);
///
/// let sum = add.call((Arg::<_, &str>::pending(async { Ok(2) }), Arg::ready(3)));
/// assert_eq!(block_on(sum), Ok(5));
///
/// let failed = add.call((Arg::rejected("boom"), Arg::ready(3)));
/// assert_eq!(block_on(failed), Err("boom"));
/// ```
#[inline]
pub const fn wrap_plain<F>(func: F) -> Wrapped<F, Plain> {
    Wrapped {
        func,
        _kind: PhantomData,
    }
}

/// Wraps a function returning `Result<T, FE>`.
///
/// The call fails with `E: From<FE>`, where `E` is the error type of
/// the arguments.
///
/// # Example
///
/// ```
/// use ap_wrap::{Arg, block_on, wrap};
///
/// let half = wrap(|x: i32| if x % 2 == 0 { Ok(x / 2) } else { Err("odd") });
///
/// let value = half.call((Arg::<_, &str>::pending(async { Ok(8) }),));
/// assert_eq!(block_on(value), Ok(4));
///
/// assert_eq!(block_on(half.call((Arg::<_, &str>::ready(3),))), Err("odd"));
/// assert_eq!(block_on(half.call((Arg::rejected("boom"),))), Err("boom"));
/// ```
#[inline]
pub const fn wrap<F>(func: F) -> Wrapped<F, Immediate> {
    Wrapped {
        func,
        _kind: PhantomData,
    }
}

/// Wraps a function returning a future of `Result<T, FE>`.
///
/// The returned future is awaited as part of the call.
#[inline]
pub const fn wrap_async<F>(func: F) -> Wrapped<F, Eventual> {
    Wrapped {
        func,
        _kind: PhantomData,
    }
}

impl<F, K> Wrapped<F, K> {
    /// Returns the original function.
    #[inline]
    pub fn inner(&self) -> &F {
        &self.func
    }

    /// Unwraps the original function.
    #[inline]
    pub fn into_inner(self) -> F {
        self.func
    }
}

impl<F: Clone, K> Clone for Wrapped<F, K> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
            _kind: PhantomData,
        }
    }
}

impl<F, K> fmt::Debug for Wrapped<F, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapped")
            .field("kind", &core::any::type_name::<K>())
            .finish_non_exhaustive()
    }
}

async fn resolve<A: ResolveArgs<E>, E>(args: A) -> Result<A::Output, E> {
    log::trace!("resolving {} arguments", args.arity());
    let values = args.resolve().await?;
    log::trace!("arguments resolved, invoking");
    Ok(values)
}

impl<F> Wrapped<F, Plain> {
    /// Calls the function with a tuple of arguments.
    pub fn call<A, T, E>(&self, args: A) -> impl Future<Output = Result<T, E>>
    where
        A: ResolveArgs<E>,
        F: Function<A::Output, Output = T>,
    {
        async move {
            let values = resolve(args).await?;
            Ok(self.func.apply(values))
        }
    }

    /// Calls the function on `receiver` with a tuple of arguments.
    pub fn call_on<R, A, T, E>(&self, receiver: R, args: A) -> impl Future<Output = Result<T, E>>
    where
        A: ResolveArgs<E>,
        F: FunctionOn<R, A::Output, Output = T>,
    {
        async move {
            let values = resolve(args).await?;
            Ok(self.func.apply_on(receiver, values))
        }
    }

    /// Calls a function taking a `Vec` with any number of arguments.
    pub fn call_all<'a, V, T, E>(&self, args: Vec<Arg<'a, V, E>>) -> impl Future<Output = Result<T, E>>
    where
        F: Function<(Vec<V>,), Output = T>,
    {
        async move {
            let values = resolve(args).await?;
            Ok(self.func.apply((values,)))
        }
    }

    /// Calls a function taking a receiver and a `Vec` with any number of arguments.
    pub fn call_all_on<'a, R, V, T, E>(
        &self,
        receiver: R,
        args: Vec<Arg<'a, V, E>>,
    ) -> impl Future<Output = Result<T, E>>
    where
        F: FunctionOn<R, (Vec<V>,), Output = T>,
    {
        async move {
            let values = resolve(args).await?;
            Ok(self.func.apply_on(receiver, (values,)))
        }
    }
}

impl<F> Wrapped<F, Immediate> {
    /// Calls the function with a tuple of arguments.
    pub fn call<A, T, E, FE>(&self, args: A) -> impl Future<Output = Result<T, E>>
    where
        A: ResolveArgs<E>,
        F: Function<A::Output, Output = Result<T, FE>>,
        E: From<FE>,
    {
        async move {
            let values = resolve(args).await?;
            self.func.apply(values).map_err(E::from)
        }
    }

    /// Calls the function on `receiver` with a tuple of arguments.
    ///
    /// The receiver is captured now and passed as the first parameter
    /// once the arguments are resolved.
    pub fn call_on<R, A, T, E, FE>(&self, receiver: R, args: A) -> impl Future<Output = Result<T, E>>
    where
        A: ResolveArgs<E>,
        F: FunctionOn<R, A::Output, Output = Result<T, FE>>,
        E: From<FE>,
    {
        async move {
            let values = resolve(args).await?;
            self.func.apply_on(receiver, values).map_err(E::from)
        }
    }

    /// Calls a function taking a `Vec` with any number of arguments.
    pub fn call_all<'a, V, T, E, FE>(&self, args: Vec<Arg<'a, V, E>>) -> impl Future<Output = Result<T, E>>
    where
        F: Function<(Vec<V>,), Output = Result<T, FE>>,
        E: From<FE>,
    {
        async move {
            let values = resolve(args).await?;
            self.func.apply((values,)).map_err(E::from)
        }
    }

    /// Calls a function taking a receiver and a `Vec` with any number of arguments.
    pub fn call_all_on<'a, R, V, T, E, FE>(
        &self,
        receiver: R,
        args: Vec<Arg<'a, V, E>>,
    ) -> impl Future<Output = Result<T, E>>
    where
        F: FunctionOn<R, (Vec<V>,), Output = Result<T, FE>>,
        E: From<FE>,
    {
        async move {
            let values = resolve(args).await?;
            self.func.apply_on(receiver, (values,)).map_err(E::from)
        }
    }
}

impl<F> Wrapped<F, Eventual> {
    /// Calls the function with a tuple of arguments and awaits its future.
    pub fn call<A, T, E, FE>(&self, args: A) -> impl Future<Output = Result<T, E>>
    where
        A: ResolveArgs<E>,
        F: Function<A::Output, Output: Future<Output = Result<T, FE>>>,
        E: From<FE>,
    {
        async move {
            let values = resolve(args).await?;
            self.func.apply(values).await.map_err(E::from)
        }
    }

    /// Calls the function on `receiver` with a tuple of arguments and awaits its future.
    pub fn call_on<R, A, T, E, FE>(&self, receiver: R, args: A) -> impl Future<Output = Result<T, E>>
    where
        A: ResolveArgs<E>,
        F: FunctionOn<R, A::Output, Output: Future<Output = Result<T, FE>>>,
        E: From<FE>,
    {
        async move {
            let values = resolve(args).await?;
            self.func.apply_on(receiver, values).await.map_err(E::from)
        }
    }

    /// Calls a function taking a `Vec` with any number of arguments and awaits its future.
    pub fn call_all<'a, V, T, E, FE>(&self, args: Vec<Arg<'a, V, E>>) -> impl Future<Output = Result<T, E>>
    where
        F: Function<(Vec<V>,), Output: Future<Output = Result<T, FE>>>,
        E: From<FE>,
    {
        async move {
            let values = resolve(args).await?;
            self.func.apply((values,)).await.map_err(E::from)
        }
    }

    /// Calls a function taking a receiver and a `Vec` with any number of
    /// arguments and awaits its future.
    pub fn call_all_on<'a, R, V, T, E, FE>(
        &self,
        receiver: R,
        args: Vec<Arg<'a, V, E>>,
    ) -> impl Future<Output = Result<T, E>>
    where
        F: FunctionOn<R, (Vec<V>,), Output: Future<Output = Result<T, FE>>>,
        E: From<FE>,
    {
        async move {
            let values = resolve(args).await?;
            self.func.apply_on(receiver, (values,)).await.map_err(E::from)
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(all(test, feature = "std"))]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::Cell;
    use core::num::ParseIntError;

    use ap_task::futures_lite::future::yield_now;
    use ap_task::{Arg, LocalExecutor, block_on, deferred, poll_once};

    use super::{wrap, wrap_async, wrap_plain};

    struct Account {
        balance: i64,
    }

    #[derive(Debug, PartialEq)]
    enum InputError {
        Closed,
        Parse(ParseIntError),
    }

    impl From<ParseIntError> for InputError {
        fn from(error: ParseIntError) -> Self {
            Self::Parse(error)
        }
    }

    #[test]
    fn immediate_arguments_match_a_direct_call() {
        let concat = |a: &str, b: u32, c: bool| Ok::<_, ()>(alloc::format!("{a}-{b}-{c}"));
        let direct = concat("x", 7, true);

        let wrapped = wrap(concat);
        let args = (Arg::<_, ()>::ready("x"), Arg::ready(7), Arg::ready(true));
        assert_eq!(block_on(wrapped.call(args)), direct);
    }

    #[test]
    fn plain_function_returns_its_value() {
        let add = wrap_plain(|x: i32, y: i32| x + y);

        let sum = add.call((Arg::<_, ()>::pending(async { Ok(2) }), Arg::ready(3)));
        assert_eq!(block_on(sum), Ok(5));

        let failed = add.call((Arg::ready(2), Arg::rejected("boom")));
        assert_eq!(block_on(failed), Err("boom"));
    }

    #[test]
    fn plain_function_on_receiver() {
        let account = Account { balance: 100 };
        let charge = wrap_plain(|this: &Account, fee: i64| this.balance - fee);

        let result = charge.call_on(&account, (Arg::<_, ()>::pending(async { Ok(5) }),));
        assert_eq!(block_on(result), Ok(95));
    }

    #[test]
    fn rejected_argument_skips_the_call() {
        let calls = Cell::new(0);
        let identity = wrap(|x: i32| {
            calls.set(calls.get() + 1);
            Ok::<_, &str>(x)
        });

        let result = block_on(identity.call((Arg::rejected("boom"),)));
        assert_eq!(result, Err("boom"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn values_arrive_in_argument_order() {
        let (first, a) = deferred::<&str, ()>();
        let (second, b) = deferred::<&str, ()>();
        let seen = Cell::new(None);

        let collect = wrap_plain(|a: &'static str, b: &'static str, c: &'static str| {
            seen.set(Some((a, b, c)));
        });
        let mut call = Box::pin(collect.call((Arg::from(a), Arg::ready("mid"), Arg::from(b))));

        assert_eq!(block_on(poll_once(call.as_mut())), None);
        second.resolve("last");
        assert_eq!(block_on(poll_once(call.as_mut())), None);
        assert_eq!(seen.get(), None);

        first.resolve("first");
        assert_eq!(block_on(call), Ok(()));
        assert_eq!(seen.get(), Some(("first", "mid", "last")));
    }

    #[test]
    fn spawned_tasks_as_arguments() {
        let ex = LocalExecutor::new();
        let slow = ex.spawn(async {
            yield_now().await;
            Ok::<_, ()>(40)
        });
        let fast = ex.spawn(async { Ok::<_, ()>(2) });

        let add = wrap_plain(|x: i32, y: i32| x + y);
        let sum = ex.run(add.call((Arg::from(slow), Arg::from(fast))));
        assert_eq!(block_on(sum), Ok(42));
    }

    #[test]
    fn function_error_propagates() {
        let fail = wrap(|x: i32| if x > 0 { Err("positive") } else { Ok(x) });
        let result = block_on(fail.call((Arg::<_, &str>::pending(async { Ok(1) }),)));
        assert_eq!(result, Err("positive"));
    }

    #[test]
    fn function_error_converts_into_argument_error() {
        let parse = wrap(|text: &str| text.parse::<i32>());

        let parsed = parse.call((Arg::<_, InputError>::pending(async { Ok("42") }),));
        assert_eq!(block_on(parsed), Ok(42));

        let invalid = block_on(parse.call((Arg::<_, InputError>::ready("x"),)));
        assert!(matches!(invalid, Err(InputError::Parse(_))));

        let closed = block_on(parse.call((Arg::rejected(InputError::Closed),)));
        assert_eq!(closed, Err(InputError::Closed));
    }

    #[test]
    fn async_output_is_flattened() {
        let double = wrap_async(|x: i32| async move {
            yield_now().await;
            Ok::<_, ()>(x * 2)
        });
        let result = double.call((Arg::<_, ()>::pending(async { Ok(21) }),));
        assert_eq!(block_on(result), Ok(42));
    }

    #[test]
    fn async_failure_propagates() {
        let fail = wrap_async(|_: ()| async { Err::<(), _>("later") });
        assert_eq!(block_on(fail.call((Arg::<_, &str>::ready(()),))), Err("later"));
    }

    #[test]
    fn receiver_is_preserved() {
        let account = Account { balance: 100 };
        let deposit = wrap(|this: &Account, amount: i64| Ok::<_, ()>(this.balance + amount));

        let result = deposit.call_on(&account, (Arg::<_, ()>::pending(async { Ok(25) }),));
        assert_eq!(block_on(result), Ok(125));
    }

    #[test]
    fn async_receiver_is_preserved() {
        let account = Rc::new(Account { balance: 100 });
        let withdraw = wrap_async(|this: Rc<Account>, amount: i64| async move {
            yield_now().await;
            if amount > this.balance {
                Err("insufficient")
            } else {
                Ok(this.balance - amount)
            }
        });

        let result = withdraw.call_on(account.clone(), (Arg::<_, &str>::pending(async { Ok(30) }),));
        assert_eq!(block_on(result), Ok(70));

        let result = withdraw.call_on(account.clone(), (Arg::<_, &str>::ready(500),));
        assert_eq!(block_on(result), Err("insufficient"));
        assert_eq!(Rc::strong_count(&account), 1);
    }

    #[test]
    fn each_call_resolves_afresh() {
        let calls = Cell::new(0);
        let count = wrap(|x: u8| {
            calls.set(calls.get() + 1);
            Ok::<_, ()>(x)
        });

        assert_eq!(block_on(count.call((Arg::<_, ()>::pending(async { Ok(1) }),))), Ok(1));
        assert_eq!(block_on(count.call((Arg::<_, ()>::ready(2),))), Ok(2));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn variadic_calls() {
        let sum = wrap(|values: Vec<i32>| Ok::<_, ()>(values.iter().sum::<i32>()));
        let args: Vec<Arg<'_, i32, ()>> = vec![Arg::ready(1), Arg::pending(async { Ok(2) }), Arg::ready(3)];
        assert_eq!(block_on(sum.call_all(args)), Ok(6));

        let none: Vec<Arg<'_, i32, ()>> = Vec::new();
        assert_eq!(block_on(sum.call_all(none)), Ok(0));
    }

    #[test]
    fn async_variadic_calls() {
        let largest = wrap_async(|values: Vec<i32>| async move {
            yield_now().await;
            Ok::<_, ()>(values.into_iter().max())
        });
        let args: Vec<Arg<'_, i32, ()>> = vec![Arg::pending(async { Ok(9) }), Arg::ready(4)];
        assert_eq!(block_on(largest.call_all(args)), Ok(Some(9)));
    }

    #[test]
    fn variadic_calls_on_receiver() {
        let account = Account { balance: 10 };
        let deposit_all = wrap(|this: &Account, deposits: Vec<i64>| {
            Ok::<_, ()>(this.balance + deposits.iter().sum::<i64>())
        });

        let args: Vec<Arg<'_, i64, ()>> = vec![Arg::ready(5), Arg::pending(async { Ok(7) })];
        assert_eq!(block_on(deposit_all.call_all_on(&account, args)), Ok(22));
    }

    #[test]
    fn zero_arguments() {
        let answer = wrap(|| Ok::<_, ()>(42));
        let result: Result<i32, ()> = block_on(answer.call(()));
        assert_eq!(result, Ok(42));
    }
}
