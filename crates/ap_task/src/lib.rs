#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod macro_utils;

mod arg;
mod join;
mod platform;

#[cfg(feature = "std")]
mod deferred;
#[cfg(feature = "std")]
mod local_executor;
#[cfg(feature = "std")]
mod task;

// -----------------------------------------------------------------------------
// Exports

pub use arg::{Arg, BoxedFuture};
pub use join::{Resolve, ResolveArgs, TryJoinAll, try_join_all};
pub use platform::block_on;

#[cfg(feature = "std")]
pub use deferred::{Deferred, Resolver, deferred};
#[cfg(feature = "std")]
pub use local_executor::LocalExecutor;
#[cfg(feature = "std")]
pub use task::Task;

// -----------------------------------------------------------------------------
// Re-Exports

pub use futures_lite;
pub use futures_lite::future::poll_once;
