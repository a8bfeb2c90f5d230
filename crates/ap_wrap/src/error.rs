use alloc::boxed::Box;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// Failure while replacing the methods of an [`Object`](crate::Object).
///
/// Methods replaced before the failure stay replaced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MutateError {
    #[error("cannot assign to read-only property `{key}`")]
    ReadOnly { key: Box<str> },

    #[error("property `{key}` does not exist on the object")]
    Missing { key: Box<str> },

    #[error("property `{key}` is not a method")]
    NotAMethod { key: Box<str> },
}

/// Failure of a method call made through an [`Object`](crate::Object).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CallError<E> {
    #[error("no property named `{key}`")]
    NoSuchProperty { key: Box<str> },

    #[error("property `{key}` is not callable")]
    NotCallable { key: Box<str> },

    #[error("argument {index} is still pending, the method does not accept pending values")]
    PendingArgument { index: usize },

    #[error("{0}")]
    Rejected(E),
}

impl<E> CallError<E> {
    /// Returns the error of a failed argument or of the method itself.
    #[inline]
    pub fn into_rejected(self) -> Option<E> {
        match self {
            Self::Rejected(error) => Some(error),
            _ => None,
        }
    }
}

impl<E> From<E> for CallError<E> {
    #[inline]
    fn from(error: E) -> Self {
        Self::Rejected(error)
    }
}
