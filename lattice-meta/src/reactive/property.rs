//! Live Property Implementation
//!
//! A live property is an observable value slot owned by one object. Every
//! property owns its notifier signal (`<name>_changed`), and a write that
//! changes the stored value emits the new value on it.
//!
//! # Initial Values
//!
//! A property starts either with a plain value or with an init binding: a
//! closure producing the initial value. Bindings are evaluated lazily on the
//! first read, or on the first write so the written value can be compared
//! against the bound one.

use std::fmt::{self, Debug};
use std::sync::Arc;

use parking_lot::RwLock;

use super::signal::{LiveSignal, Signal};
use crate::error::SignalError;
use crate::meta::{Init, InitBinding, Name, PropertyDescriptor};
use crate::value::Value;

/// Behavior every live property provides.
pub trait LiveProperty: Send + Sync {
    /// Canonical name the property was bound under.
    fn name(&self) -> &str;

    /// Current value.
    fn value(&self) -> Value;

    /// Read accessor in continuation form. Implementations call `f` exactly
    /// once with the current value.
    fn with_value(&self, f: &mut dyn FnMut(&Value));

    /// Store `value`, emitting on the notifier if it differs from the
    /// current one. Returns whether the value changed.
    fn set(&self, value: Value) -> Result<bool, SignalError>;

    /// The notifier signal owned by this property.
    fn changed(&self) -> Arc<dyn LiveSignal>;
}

impl Debug for dyn LiveProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveProperty")
            .field("name", &self.name())
            .field("value", &self.value())
            .finish()
    }
}

enum Slot {
    Pending(InitBinding),
    Ready(Value),
}

/// The default live property.
pub struct Property {
    name: Name,

    slot: Arc<RwLock<Slot>>,

    /// Notifier, emitted with the new value on change.
    changed: Arc<dyn LiveSignal>,
}

impl Property {
    /// Create a property holding `initial`.
    pub fn new(name: impl Into<Name>, initial: Value, changed: Arc<dyn LiveSignal>) -> Self {
        Self {
            name: name.into(),
            slot: Arc::new(RwLock::new(Slot::Ready(initial))),
            changed,
        }
    }

    /// Create a property whose initial value comes from `binding`.
    pub fn with_binding(
        name: impl Into<Name>,
        binding: InitBinding,
        changed: Arc<dyn LiveSignal>,
    ) -> Self {
        Self {
            name: name.into(),
            slot: Arc::new(RwLock::new(Slot::Pending(binding))),
            changed,
        }
    }

    /// Create the default live property for a descriptor, together with a
    /// default notifier built from the descriptor's notifier signal.
    pub fn from_descriptor(descriptor: &PropertyDescriptor) -> Self {
        let changed: Arc<dyn LiveSignal> = Arc::new(Signal::from_descriptor(descriptor.notifier()));
        match descriptor.init() {
            Init::Value(value) => Self::new(descriptor.name().clone(), value.clone(), changed),
            Init::Binding(binding) => {
                Self::with_binding(descriptor.name().clone(), binding.clone(), changed)
            }
        }
    }

    /// Evaluate a pending binding. The binding runs without the slot lock
    /// held; if a write lands meanwhile, the written value wins.
    fn force(&self) -> Value {
        let binding = match &*self.slot.read() {
            Slot::Ready(value) => return value.clone(),
            Slot::Pending(binding) => binding.clone(),
        };

        let computed = binding();
        let mut slot = self.slot.write();
        match &*slot {
            Slot::Ready(value) => value.clone(),
            Slot::Pending(_) => {
                *slot = Slot::Ready(computed.clone());
                computed
            }
        }
    }
}

impl LiveProperty for Property {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Value {
        self.force()
    }

    fn with_value(&self, f: &mut dyn FnMut(&Value)) {
        // Cloned so `f` may write back to this property.
        let value = self.force();
        f(&value);
    }

    fn set(&self, value: Value) -> Result<bool, SignalError> {
        // A pending binding is the current value too.
        self.force();
        {
            let mut slot = self.slot.write();
            if let Slot::Ready(current) = &*slot {
                if *current == value {
                    return Ok(false);
                }
            }
            *slot = Slot::Ready(value.clone());
        }

        self.changed.emit(&[value])?;
        Ok(true)
    }

    fn changed(&self) -> Arc<dyn LiveSignal> {
        Arc::clone(&self.changed)
    }
}

impl Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match &*self.slot.read() {
            Slot::Ready(value) => Some(value.clone()),
            Slot::Pending(_) => None,
        };
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("value", &value)
            .field("changed", &self.changed.id())
            .finish()
    }
}
