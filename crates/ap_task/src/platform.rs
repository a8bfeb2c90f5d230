// -----------------------------------------------------------------------------
// block_on

#[cfg(feature = "std")]
pub use futures_lite::future::block_on;

/// Drives `future` to completion on the current thread.
///
/// Without `std` there is no way to park the thread, so the future is
/// polled in a spin loop until it is ready.
#[cfg(not(feature = "std"))]
pub fn block_on<T>(future: impl Future<Output = T>) -> T {
    use core::task::{Context, Poll, Waker};

    let mut future = core::pin::pin!(future);
    let mut cx = Context::from_waker(Waker::noop());

    loop {
        if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
            return output;
        }
        core::hint::spin_loop();
    }
}
