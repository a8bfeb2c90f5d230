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

mod error;
mod function;
mod method;
mod mutate;
mod object;
mod wrap;

// -----------------------------------------------------------------------------
// Exports

pub use error::{CallError, MutateError};
pub use function::{Function, FunctionOn};
pub use method::Method;
pub use mutate::{CONSTRUCTOR, mutate_methods};
pub use object::{Object, Property, PropertyFlags, Value};
pub use wrap::{Eventual, Immediate, Plain, Wrapped, wrap, wrap_async, wrap_plain};

// -----------------------------------------------------------------------------
// Re-Exports

pub use ap_task::{Arg, BoxedFuture, block_on};
