//! Inheritance-merged views of class declarations.
//!
//! Every class keeps three own tables (signals, properties, initial
//! connections) that are never modified by its subclasses. The merged view
//! for a class overlays the own tables of every ancestor, root first:
//!
//! - a same-named entry from a class closer to the target replaces the
//!   farther one in place, so declaration order follows the ancestor that
//!   first declared the name;
//! - initial-connection lists are concatenated instead, ancestor handlers
//!   first.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::descriptor::{Arity, DeclaredIn, Name, PropertyDescriptor, SignalDescriptor};
use crate::object::Object;
use crate::value::Value;

/// Handler declared at class level. Runs with the constructed object as its
/// receiver and the emitted arguments.
pub type ObjectHandler = Arc<dyn Fn(&Object, &[Value]) + Send + Sync>;

/// One class-level handler, with what it was declared against.
#[derive(Clone)]
pub struct InitialConnection {
    pub(crate) handler: ObjectHandler,
    pub(crate) declared_in: DeclaredIn,
    /// Arity of the signal as the declaring class saw it.
    pub(crate) expected: Arity,
}

impl InitialConnection {
    pub fn declared_in(&self) -> &DeclaredIn {
        &self.declared_in
    }

    pub fn expected_arity(&self) -> &Arity {
        &self.expected
    }
}

impl fmt::Debug for InitialConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitialConnection")
            .field("declared_in", &self.declared_in.name)
            .field("expected", &self.expected)
            .finish()
    }
}

/// Declarations made by one class itself.
#[derive(Debug, Default)]
pub(crate) struct OwnTables {
    pub(crate) signals: IndexMap<Name, SignalDescriptor>,
    pub(crate) properties: IndexMap<Name, PropertyDescriptor>,
    pub(crate) initial_connections: IndexMap<Name, Vec<InitialConnection>>,
}

/// The effective declarations visible to a class.
#[derive(Debug, Default, Clone)]
pub struct MergedView {
    signals: IndexMap<Name, SignalDescriptor>,
    properties: IndexMap<Name, PropertyDescriptor>,
    initial_connections: IndexMap<Name, Vec<InitialConnection>>,
}

impl MergedView {
    /// Lay `own` over what has been merged so far.
    pub(crate) fn overlay(&mut self, own: &OwnTables) {
        for (name, signal) in &own.signals {
            self.signals.insert(name.clone(), signal.clone());
        }
        for (name, property) in &own.properties {
            self.properties.insert(name.clone(), property.clone());
        }
        for (name, connections) in &own.initial_connections {
            self.initial_connections
                .entry(name.clone())
                .or_default()
                .extend(connections.iter().cloned());
        }
    }

    /// Add or replace one signal, as if the target class declared it.
    pub(crate) fn insert_signal(&mut self, descriptor: SignalDescriptor) {
        self.signals.insert(descriptor.name().clone(), descriptor);
    }

    /// Add or replace one property and its notifier.
    pub(crate) fn insert_property(&mut self, descriptor: PropertyDescriptor) {
        self.insert_signal(descriptor.notifier().clone());
        self.properties.insert(descriptor.name().clone(), descriptor);
    }

    pub fn signals(&self) -> &IndexMap<Name, SignalDescriptor> {
        &self.signals
    }

    pub fn properties(&self) -> &IndexMap<Name, PropertyDescriptor> {
        &self.properties
    }

    pub fn initial_connections(&self) -> &IndexMap<Name, Vec<InitialConnection>> {
        &self.initial_connections
    }

    pub fn signal(&self, name: &str) -> Option<&SignalDescriptor> {
        self.signals.get(name)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    pub fn signal_names(&self) -> Vec<Name> {
        self.signals.keys().cloned().collect()
    }

    pub fn property_names(&self) -> Vec<Name> {
        self.properties.keys().cloned().collect()
    }
}
