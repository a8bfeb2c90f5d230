macro_rules! impl_resolve_args {
    ($($ty:ident : $idx:tt),+) => {
        impl<'a, E, $($ty),+> $crate::ResolveArgs<E> for ($($crate::Arg<'a, $ty, E>,)+) {
            type Output = ($($ty,)+);

            #[inline]
            fn arity(&self) -> usize {
                [$(stringify!($ty)),+].len()
            }

            fn poll_settle(
                &mut self,
                cx: &mut ::core::task::Context<'_>,
            ) -> ::core::task::Poll<Result<(), E>> {
                let mut pending = false;
                $(
                    match self.$idx.poll_settle(cx) {
                        ::core::task::Poll::Ready(Ok(())) => {}
                        ::core::task::Poll::Ready(Err(error)) => {
                            return ::core::task::Poll::Ready(Err(error));
                        }
                        ::core::task::Poll::Pending => pending = true,
                    }
                )+
                if pending {
                    ::core::task::Poll::Pending
                } else {
                    ::core::task::Poll::Ready(Ok(()))
                }
            }

            #[inline]
            fn take_settled(&mut self) -> Self::Output {
                ($(self.$idx.take_settled(),)+)
            }
        }
    };
}

pub(crate) use impl_resolve_args;
