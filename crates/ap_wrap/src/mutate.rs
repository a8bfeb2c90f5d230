//! The bulk mutator: wrap every own method of an object in place.

use crate::{MutateError, Object, PropertyFlags};

/// Key of the constructor slot, never wrapped.
pub const CONSTRUCTOR: &str = "constructor";

/// Replaces every own, enumerable method of `object` with its wrapped
/// version and returns the same object.
///
/// - Inherited properties, data properties, non-enumerable properties and
///   [`CONSTRUCTOR`] are left alone.
/// - A read-only method fails with [`MutateError::ReadOnly`]. The methods
///   visited before it stay wrapped.
/// - Mutating the same object again wraps the wrapped methods once more,
///   they keep working and their [`depth`](crate::Method::depth) grows.
///   Clones of a method taken before mutation are not affected.
pub fn mutate_methods<'o, 'a, S: 'a, T: 'a, E: 'a>(
    object: &'o mut Object<'a, S, T, E>,
) -> Result<&'o mut Object<'a, S, T, E>, MutateError> {
    for slot in 0..object.len() {
        let property = &object.properties()[slot];
        let selected = property.key() != CONSTRUCTOR
            && property.flags().contains(PropertyFlags::ENUMERABLE)
            && property.value().is_method();

        if selected {
            object.wrap_slot(slot)?;
        }
    }
    Ok(object)
}

impl<'a, S: 'a, T: 'a, E: 'a> Object<'a, S, T, E> {
    /// Same as [`mutate_methods`].
    #[inline]
    pub fn mutate_methods(&mut self) -> Result<&mut Self, MutateError> {
        mutate_methods(self)
    }

    /// Wraps only the own methods named in `keys`, in the given order.
    ///
    /// Named methods are wrapped even when not enumerable, [`CONSTRUCTOR`]
    /// is still skipped. Fails on a key that is missing, holds data,
    /// or is read-only. Methods wrapped before the failure stay wrapped.
    pub fn mutate_only(&mut self, keys: &[&str]) -> Result<&mut Self, MutateError> {
        for &key in keys {
            if key == CONSTRUCTOR {
                continue;
            }
            let slot = self
                .slot_of(key)
                .ok_or_else(|| MutateError::Missing { key: key.into() })?;
            self.wrap_slot(slot)?;
        }
        Ok(self)
    }
}

// -----------------------------------------------------------------------------
// Tests
