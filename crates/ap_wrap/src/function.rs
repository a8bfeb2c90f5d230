//! Calling plain functions with a tuple of resolved values.

// -----------------------------------------------------------------------------
// Function

/// A callable taking its positional arguments as one tuple.
///
/// Implemented for every `Fn` of up to eight arguments, so that resolved
/// arguments can be spread back into the original call.
pub trait Function<Args> {
    /// What the call returns.
    type Output;

    /// Calls the function with `args` spread as positional arguments.
    fn apply(&self, args: Args) -> Self::Output;
}

/// A callable taking an explicit receiver followed by its positional
/// arguments as one tuple.
///
/// The receiver plays the role of the calling context of a method.
pub trait FunctionOn<Recv, Args> {
    /// What the call returns.
    type Output;

    /// Calls the function on `receiver` with `args` spread as positional arguments.
    fn apply_on(&self, receiver: Recv, args: Args) -> Self::Output;
}

macro_rules! impl_function {
    ($($ty:ident : $arg:ident),*) => {
        impl<Func, Out, $($ty),*> Function<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) -> Out,
        {
            type Output = Out;

            #[inline]
            fn apply(&self, ($($arg,)*): ($($ty,)*)) -> Out {
                (self)($($arg),*)
            }
        }

        impl<Func, Out, Recv, $($ty),*> FunctionOn<Recv, ($($ty,)*)> for Func
        where
            Func: Fn(Recv, $($ty),*) -> Out,
        {
            type Output = Out;

            #[inline]
            fn apply_on(&self, receiver: Recv, ($($arg,)*): ($($ty,)*)) -> Out {
                (self)(receiver, $($arg),*)
            }
        }
    };
}

impl_function!();
impl_function!(A0: a0);
impl_function!(A0: a0, A1: a1);
impl_function!(A0: a0, A1: a1, A2: a2);
impl_function!(A0: a0, A1: a1, A2: a2, A3: a3);
impl_function!(A0: a0, A1: a1, A2: a2, A3: a3, A4: a4);
impl_function!(A0: a0, A1: a1, A2: a2, A3: a3, A4: a4, A5: a5);
impl_function!(A0: a0, A1: a1, A2: a2, A3: a3, A4: a4, A5: a5, A6: a6);
impl_function!(A0: a0, A1: a1, A2: a2, A3: a3, A4: a4, A5: a5, A6: a6, A7: a7);
