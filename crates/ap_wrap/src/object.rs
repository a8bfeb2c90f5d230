use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;
use core::future::ready;

use ap_task::{Arg, BoxedFuture};
use foldhash::fast::FixedState;
use hashbrown::HashMap;

use crate::{CallError, Method, MutateError};

// -----------------------------------------------------------------------------
// PropertyFlags

bitflags::bitflags! {
    /// Attributes of an [`Object`] property.
    ///
    /// The default is [`all`](Self::all).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u8 {
        /// Visited by [`mutate_methods`](crate::mutate_methods).
        const ENUMERABLE = 1 << 0;
        /// Can be assigned again, including by the mutator.
        const WRITABLE = 1 << 1;
    }
}

impl Default for PropertyFlags {
    #[inline]
    fn default() -> Self {
        Self::all()
    }
}

// -----------------------------------------------------------------------------
// Value

/// The value of an [`Object`] property.
pub enum Value<'a, S, T, E> {
    Data(T),
    Method(Method<'a, S, T, E>),
}

impl<'a, S, T, E> Value<'a, S, T, E> {
    #[inline]
    pub fn as_data(&self) -> Option<&T> {
        match self {
            Self::Data(data) => Some(data),
            Self::Method(_) => None,
        }
    }

    #[inline]
    pub fn as_method(&self) -> Option<&Method<'a, S, T, E>> {
        match self {
            Self::Data(_) => None,
            Self::Method(method) => Some(method),
        }
    }

    #[inline]
    pub fn is_method(&self) -> bool {
        matches!(self, Self::Method(_))
    }
}

impl<S, T: Clone, E> Clone for Value<'_, S, T, E> {
    fn clone(&self) -> Self {
        match self {
            Self::Data(data) => Self::Data(data.clone()),
            Self::Method(method) => Self::Method(method.clone()),
        }
    }
}

impl<S, T: fmt::Debug, E> fmt::Debug for Value<'_, S, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(data) => f.debug_tuple("Data").field(data).finish(),
            Self::Method(method) => f.debug_tuple("Method").field(method).finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// Property

/// A keyed slot of an [`Object`].
pub struct Property<'a, S, T, E> {
    key: Box<str>,
    value: Value<'a, S, T, E>,
    flags: PropertyFlags,
}

impl<'a, S, T, E> Property<'a, S, T, E> {
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &Value<'a, S, T, E> {
        &self.value
    }

    #[inline]
    pub fn flags(&self) -> PropertyFlags {
        self.flags
    }
}

impl<S, T: fmt::Debug, E> fmt::Debug for Property<'_, S, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("flags", &self.flags)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Object

const INDEX_STATE: FixedState = FixedState::with_seed(0x5A17_C0DE_0B1E_C7ED);

/// An insertion-ordered table of properties bound to a receiver.
///
/// Every method called through [`call`](Self::call) receives the object's
/// receiver state `Rc<S>` as its calling context. Properties missing on the
/// object are looked up on its prototype chain. Inherited properties can be
/// called but never belong to the object itself, so the mutator does not
/// touch them.
///
/// # Example
///
/// ```
/// use ap_wrap::{Arg, Method, Object, block_on};
///
/// let mut counter: Object<'_, i64, i64, ()> = Object::new(10);
/// counter
///     .insert_method("add", Method::new(|base: &i64, values: Vec<i64>| {
///         Ok(base + values.iter().sum::<i64>())
///     }))
///     .unwrap();
///
/// counter.mutate_methods().unwrap();
///
/// let sum = counter.call("add", vec![Arg::pending(async { Ok(5) }), Arg::ready(1)]);
/// assert_eq!(block_on(sum), Ok(16));
/// ```
pub struct Object<'a, S, T, E> {
    receiver: Rc<S>,
    properties: Vec<Property<'a, S, T, E>>,
    index: HashMap<Box<str>, usize, FixedState>,
    prototype: Option<Rc<Object<'a, S, T, E>>>,
}

impl<'a, S, T, E> Object<'a, S, T, E> {
    /// Creates an empty object owning `receiver`.
    #[inline]
    pub fn new(receiver: S) -> Self {
        Self::with_receiver(Rc::new(receiver))
    }

    /// Creates an empty object sharing `receiver`.
    pub fn with_receiver(receiver: Rc<S>) -> Self {
        Self {
            receiver,
            properties: Vec::new(),
            index: HashMap::with_hasher(INDEX_STATE),
            prototype: None,
        }
    }

    /// Sets the object the missing properties are inherited from.
    #[inline]
    pub fn with_prototype(mut self, prototype: Rc<Self>) -> Self {
        self.prototype = Some(prototype);
        self
    }

    /// The calling context handed to methods.
    #[inline]
    pub fn receiver(&self) -> &Rc<S> {
        &self.receiver
    }

    #[inline]
    pub fn prototype(&self) -> Option<&Rc<Self>> {
        self.prototype.as_ref()
    }

    /// Number of own properties.
    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Own property keys, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.properties.iter().map(Property::key)
    }

    /// Own properties, in insertion order.
    #[inline]
    pub fn properties(&self) -> &[Property<'a, S, T, E>] {
        &self.properties
    }

    #[inline]
    pub fn contains_own(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns an own property.
    pub fn get_own(&self, key: &str) -> Option<&Property<'a, S, T, E>> {
        self.slot_of(key).map(|slot| &self.properties[slot])
    }

    /// Returns an own or inherited property.
    pub fn get(&self, key: &str) -> Option<&Property<'a, S, T, E>> {
        match self.get_own(key) {
            Some(property) => Some(property),
            None => self.prototype.as_ref()?.get(key),
        }
    }

    /// Returns an own or inherited data value.
    #[inline]
    pub fn get_data(&self, key: &str) -> Option<&T> {
        self.get(key)?.value().as_data()
    }

    /// Returns an own or inherited method.
    #[inline]
    pub fn get_method(&self, key: &str) -> Option<&Method<'a, S, T, E>> {
        self.get(key)?.value().as_method()
    }

    /// Defines an own property with explicit `flags`.
    ///
    /// An existing property keeps its position and is replaced, unless it
    /// is read-only. Returns the previous value.
    pub fn define(
        &mut self,
        key: &str,
        value: Value<'a, S, T, E>,
        flags: PropertyFlags,
    ) -> Result<Option<Value<'a, S, T, E>>, MutateError> {
        match self.slot_of(key) {
            Some(slot) => {
                let property = &mut self.properties[slot];
                if !property.flags.contains(PropertyFlags::WRITABLE) {
                    return Err(MutateError::ReadOnly {
                        key: property.key.clone(),
                    });
                }
                property.flags = flags;
                Ok(Some(core::mem::replace(&mut property.value, value)))
            }
            None => {
                let key: Box<str> = key.into();
                self.index.insert(key.clone(), self.properties.len());
                self.properties.push(Property { key, value, flags });
                Ok(None)
            }
        }
    }

    /// Assigns an own property.
    ///
    /// An existing property keeps its flags, a new one gets the default flags.
    pub fn set(
        &mut self,
        key: &str,
        value: Value<'a, S, T, E>,
    ) -> Result<Option<Value<'a, S, T, E>>, MutateError> {
        let flags = self
            .get_own(key)
            .map_or_else(PropertyFlags::default, Property::flags);
        self.define(key, value, flags)
    }

    /// Assigns a data property.
    #[inline]
    pub fn insert_data(
        &mut self,
        key: &str,
        data: T,
    ) -> Result<Option<Value<'a, S, T, E>>, MutateError> {
        self.set(key, Value::Data(data))
    }

    /// Assigns a method property.
    #[inline]
    pub fn insert_method(
        &mut self,
        key: &str,
        method: Method<'a, S, T, E>,
    ) -> Result<Option<Value<'a, S, T, E>>, MutateError> {
        self.set(key, Value::Method(method))
    }

    #[inline]
    pub(crate) fn slot_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Replaces the method in `slot` with its wrapped version.
    pub(crate) fn wrap_slot(&mut self, slot: usize) -> Result<(), MutateError>
    where
        S: 'a,
        T: 'a,
        E: 'a,
    {
        let property = &mut self.properties[slot];
        let Value::Method(method) = &property.value else {
            return Err(MutateError::NotAMethod {
                key: property.key.clone(),
            });
        };
        if !property.flags.contains(PropertyFlags::WRITABLE) {
            return Err(MutateError::ReadOnly {
                key: property.key.clone(),
            });
        }

        let wrapped = method.wrap();
        if method.is_wrapped() {
            log::debug!(
                "method `{}` is already wrapped, stacking layer {}",
                property.key,
                wrapped.depth()
            );
        } else {
            log::debug!("wrapping method `{}`", property.key);
        }

        property.value = Value::Method(wrapped);
        Ok(())
    }
}

impl<'a, S: 'a, T: 'a, E: 'a> Object<'a, S, T, E> {
    /// Calls the own or inherited method `key` with this object's receiver.
    pub fn call(
        &self,
        key: &str,
        args: Vec<Arg<'a, T, E>>,
    ) -> BoxedFuture<'a, Result<T, CallError<E>>> {
        match self.get(key).map(Property::value) {
            Some(Value::Method(method)) => method.call(Rc::clone(&self.receiver), args),
            Some(Value::Data(_)) => Box::pin(ready(Err(CallError::NotCallable { key: key.into() }))),
            None => Box::pin(ready(Err(CallError::NoSuchProperty { key: key.into() }))),
        }
    }
}

impl<S, T: fmt::Debug, E> fmt::Debug for Object<'_, S, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("properties", &self.properties)
            .field("prototype", &self.prototype)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(all(test, feature = "std"))]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use ap_task::{Arg, block_on};

    use super::{Object, PropertyFlags, Value};
    use crate::{CallError, Method, MutateError};

    type Log = RefCell<Vec<String>>;

    fn push() -> Method<'static, Log, String, ()> {
        Method::new(|log: &Log, values: Vec<String>| {
            log.borrow_mut().extend(values);
            Ok(String::from("pushed"))
        })
    }

    #[test]
    fn keys_keep_insertion_order() {
        let mut object: Object<'_, Log, String, ()> = Object::new(Log::default());
        object.insert_data("z", "last".into()).unwrap();
        object.insert_method("a", push()).unwrap();
        object.insert_data("m", "middle".into()).unwrap();

        assert_eq!(object.keys().collect::<Vec<_>>(), ["z", "a", "m"]);
        assert_eq!(object.len(), 3);
        assert!(object.contains_own("a"));
        assert_eq!(object.get_data("m").map(String::as_str), Some("middle"));
    }

    #[test]
    fn reassigning_keeps_position() {
        let mut object: Object<'_, Log, String, ()> = Object::new(Log::default());
        object.insert_data("a", "1".into()).unwrap();
        object.insert_data("b", "2".into()).unwrap();

        let previous = object.insert_data("a", "3".into()).unwrap();
        assert_eq!(previous.and_then(|v| v.as_data().cloned()), Some("1".into()));
        assert_eq!(object.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(object.get_data("a").map(String::as_str), Some("3"));
    }

    #[test]
    fn read_only_refuses_assignment() {
        let mut object: Object<'_, Log, String, ()> = Object::new(Log::default());
        object
            .define("fixed", Value::Data("x".into()), PropertyFlags::ENUMERABLE)
            .unwrap();

        assert_eq!(
            object.insert_data("fixed", "y".into()).unwrap_err(),
            MutateError::ReadOnly { key: "fixed".into() }
        );
    }

    #[test]
    fn methods_see_the_receiver() {
        let mut object: Object<'_, Log, String, ()> = Object::new(Log::default());
        object.insert_method("push", push()).unwrap();

        let result = block_on(object.call("push", vec![Arg::ready("a".into()), Arg::ready("b".into())]));
        assert_eq!(result, Ok("pushed".into()));
        assert_eq!(*object.receiver().borrow(), ["a", "b"]);
    }

    #[test]
    fn inherited_methods_use_the_callers_receiver() {
        let mut proto: Object<'_, Log, String, ()> = Object::new(Log::default());
        proto.insert_method("push", push()).unwrap();
        let proto = Rc::new(proto);

        let child = Object::new(Log::default()).with_prototype(proto.clone());
        assert!(!child.contains_own("push"));
        assert!(child.get_method("push").is_some());

        block_on(child.call("push", vec![Arg::ready("c".into())])).unwrap();
        assert_eq!(*child.receiver().borrow(), ["c"]);
        assert!(proto.receiver().borrow().is_empty());
    }

    #[test]
    fn call_errors() {
        let mut object: Object<'_, Log, String, ()> = Object::new(Log::default());
        object.insert_data("name", "log".into()).unwrap();

        assert_eq!(
            block_on(object.call("missing", Vec::new())),
            Err(CallError::NoSuchProperty { key: "missing".into() })
        );
        assert_eq!(
            block_on(object.call("name", Vec::new())),
            Err(CallError::NotCallable { key: "name".into() })
        );
    }
}
