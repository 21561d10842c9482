//! Declaration builders.
//!
//! `SignalDecl` and `PropertyDecl` collect the optional parts of a
//! declaration before it is handed to `Class::declare_signal` or
//! `Class::declare_property`.

use std::sync::Arc;

use super::descriptor::{Arity, Init, Name, PropertyFactory, SignalFactory};
use crate::error::FactoryError;
use crate::object::{PropertyContext, SignalContext};
use crate::reactive::{LiveProperty, LiveSignal};
use crate::value::Value;

/// A signal declaration. Zero-arity unless `params` or `variadic` is used.
pub struct SignalDecl {
    pub(crate) name: String,
    pub(crate) arity: Arity,
    pub(crate) factory: Option<SignalFactory>,
}

impl SignalDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arity: Arity::none(),
            factory: None,
        }
    }

    pub fn params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Name>,
    {
        self.arity = Arity::fixed(params);
        self
    }

    /// Accept any number of arguments. Replaces a parameter list.
    pub fn variadic(mut self) -> Self {
        self.arity = Arity::Variadic;
        self
    }

    pub fn factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&SignalContext<'_>) -> Result<Arc<dyn LiveSignal>, FactoryError>
            + Send
            + Sync
            + 'static,
    {
        self.factory = Some(Arc::new(factory));
        self
    }
}

/// A property declaration. The initial value is `Value::Null` unless
/// `initial` or `binding` is used; the later call wins.
pub struct PropertyDecl {
    pub(crate) name: String,
    pub(crate) init: Init,
    pub(crate) factory: Option<PropertyFactory>,
}

impl PropertyDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            init: Init::default(),
            factory: None,
        }
    }

    pub fn initial(mut self, value: impl Into<Value>) -> Self {
        self.init = Init::Value(value.into());
        self
    }

    /// Compute the initial value lazily, per object.
    pub fn binding<F>(mut self, binding: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.init = Init::Binding(Arc::new(binding));
        self
    }

    pub fn factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&PropertyContext<'_>) -> Result<Arc<dyn LiveProperty>, FactoryError>
            + Send
            + Sync
            + 'static,
    {
        self.factory = Some(Arc::new(factory));
        self
    }
}
