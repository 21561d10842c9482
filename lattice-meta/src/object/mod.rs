//! Objects
//!
//! An `Object` is one constructed instance of a `Class`. Construction runs
//! to completion synchronously:
//!
//! 1. Uninitialized: the class (and its ancestors) are sealed.
//! 2. Binding: one live property per canonical property name and one live
//!    signal per remaining canonical signal name are created.
//! 3. Wiring: class-level handlers are connected, ancestor handlers first.
//! 4. Ready: the object is returned.
//!
//! A failure in any phase aborts construction; no partially built object is
//! ever handed out.
//!
//! # Accessors
//!
//! Every declared name, alias or not, dispatches through the class's
//! dispatch table to the live instance bound under its canonical name. All
//! aliases of a signal or property therefore return the identical live
//! instance.

mod binder;
mod wiring;

use std::fmt;
use std::sync::{Arc, Weak};

use binder::InstanceState;

use crate::error::{BindError, Error, LookupError, Phase, Result};
use crate::meta::{class_of, Class, MetaType, Name, PropertyDescriptor, Sealed, SignalDescriptor};
use crate::reactive::{ConnectionId, LiveProperty, LiveSignal};
use crate::value::Value;

/// Passed to a signal factory while an object is being bound.
pub struct SignalContext<'a> {
    pub class: &'a Class,
    pub descriptor: &'a SignalDescriptor,
    /// The object under construction. Upgrading fails until it is Ready.
    pub owner: &'a WeakObject,
}

/// Passed to a property factory while an object is being bound.
pub struct PropertyContext<'a> {
    pub class: &'a Class,
    pub descriptor: &'a PropertyDescriptor,
    /// The object under construction. Upgrading fails until it is Ready.
    pub owner: &'a WeakObject,
}

struct ObjectInner {
    class: Class,
    sealed: Arc<Sealed>,
    state: InstanceState,
}

/// A constructed instance. Cloning yields another handle to the same object.
///
/// # Example
///
/// ```rust
/// use lattice_meta::{Class, Value};
///
/// let counter = Class::root("Counter");
/// counter.property("count", 0).unwrap();
///
/// let c = counter.instantiate().unwrap();
/// c.connect("count_changed", |args| println!("count is now {:?}", args[0])).unwrap();
/// c.set("count", 5).unwrap();
/// assert_eq!(c.get("count").unwrap(), Value::Int(5));
/// ```
#[derive(Clone)]
pub struct Object {
    inner: Arc<ObjectInner>,
}

/// Non-owning handle to an `Object`.
#[derive(Clone)]
pub struct WeakObject {
    inner: Weak<ObjectInner>,
}

impl WeakObject {
    pub fn upgrade(&self) -> Option<Object> {
        self.inner.upgrade().map(|inner| Object { inner })
    }
}

impl fmt::Debug for WeakObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakObject")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Object {
    /// Construct an object of `class`.
    pub fn new(class: &Class) -> Result<Self> {
        let span = tracing::debug_span!("construct", class = %class.name());
        let _enter = span.enter();

        tracing::debug!(phase = %Phase::Uninitialized);
        let sealed = class.seal().map_err(|source| BindError::Declaration {
            class: class.name().clone(),
            source,
        })?;

        tracing::debug!(phase = %Phase::Binding);
        let mut failure = None;
        let inner = Arc::new_cyclic(|weak| {
            let owner = WeakObject {
                inner: weak.clone(),
            };
            let state = binder::bind(class, &sealed, &owner).unwrap_or_else(|err| {
                failure = Some(err);
                InstanceState::default()
            });
            ObjectInner {
                class: class.clone(),
                sealed: Arc::clone(&sealed),
                state,
            }
        });
        if let Some(err) = failure {
            return Err(err.into());
        }
        let object = Object { inner };

        tracing::debug!(phase = %Phase::Wiring);
        wiring::wire(&object)?;

        tracing::debug!(phase = %Phase::Ready);
        Ok(object)
    }

    /// Construct an object of a `MetaType`.
    pub fn of<T: MetaType>() -> Result<Self> {
        let class = class_of::<T>()?;
        Self::new(&class)
    }

    pub fn class(&self) -> &Class {
        &self.inner.class
    }

    pub fn downgrade(&self) -> WeakObject {
        WeakObject {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Whether both handles refer to the same object.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn no_signal(&self, name: &str) -> LookupError {
        LookupError::NoSuchSignal {
            class: self.inner.class.name().clone(),
            name: name.into(),
        }
    }

    fn no_property(&self, name: &str) -> LookupError {
        LookupError::NoSuchProperty {
            class: self.inner.class.name().clone(),
            name: name.into(),
        }
    }

    fn unbound(&self, name: &Name) -> LookupError {
        LookupError::Unbound {
            class: self.inner.class.name().clone(),
            name: name.clone(),
        }
    }

    /// The live signal declared as `name`. Aliases and property notifiers
    /// return the same instance as their original.
    pub fn signal(&self, name: &str) -> std::result::Result<Arc<dyn LiveSignal>, LookupError> {
        let canonical = self
            .inner
            .sealed
            .dispatch()
            .signal(name)
            .ok_or_else(|| self.no_signal(name))?;
        self.inner
            .state
            .signals
            .get(canonical)
            .cloned()
            .ok_or_else(|| self.unbound(canonical))
    }

    /// The live property declared as `name`.
    pub fn property(&self, name: &str) -> std::result::Result<Arc<dyn LiveProperty>, LookupError> {
        let canonical = self
            .inner
            .sealed
            .dispatch()
            .property(name)
            .ok_or_else(|| self.no_property(name))?;
        self.inner
            .state
            .properties
            .get(canonical)
            .cloned()
            .ok_or_else(|| self.unbound(canonical))
    }

    /// Declared signal names of this object's class.
    pub fn signals(&self) -> Vec<Name> {
        self.inner.sealed.view().signal_names()
    }

    /// Declared property names of this object's class.
    pub fn properties(&self) -> Vec<Name> {
        self.inner.sealed.view().property_names()
    }

    /// Read accessor: current value of property `name`.
    pub fn get(&self, name: &str) -> std::result::Result<Value, LookupError> {
        Ok(self.property(name)?.value())
    }

    /// Read accessor with a continuation, forwarded to the live property.
    ///
    /// If a custom live property never invokes the continuation, `f` runs on
    /// its plain `value()` instead.
    pub fn get_with<R, F>(&self, name: &str, f: F) -> std::result::Result<R, LookupError>
    where
        F: FnOnce(&Value) -> R,
    {
        let property = self.property(name)?;
        let mut f = Some(f);
        let mut result = None;
        property.with_value(&mut |value: &Value| {
            if let Some(f) = f.take() {
                result = Some(f(value));
            }
        });

        match (result, f) {
            (Some(result), _) => Ok(result),
            (None, Some(f)) => Ok(f(&property.value())),
            (None, None) => Err(self.unbound(&Name::from(name))),
        }
    }

    /// Write accessor. Returns whether the value changed (and the notifier
    /// fired).
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<bool> {
        let property = self.property(name)?;
        Ok(property.set(value.into())?)
    }

    /// Emit the signal declared as `name`.
    pub fn emit(&self, name: &str, args: &[Value]) -> Result<()> {
        self.signal(name)?.emit(args).map_err(Error::from)
    }

    /// Connect a handler to the signal declared as `name`.
    pub fn connect<F>(&self, name: &str, handler: F) -> std::result::Result<ConnectionId, LookupError>
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        Ok(self.signal(name)?.connect(Arc::new(handler)))
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", self.inner.class.name())
            .field("signals", &self.inner.state.signals.len())
            .field("properties", &self.inner.state.properties.len())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
