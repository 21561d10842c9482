//! Instance binding.
//!
//! Materializes one live property per canonical property name and one live
//! signal per canonical signal name of a sealed class. Properties go first:
//! each live property brings its own notifier, and those notifiers must not
//! be bound a second time as plain signals.

use std::sync::Arc;

use indexmap::IndexMap;

use super::{PropertyContext, SignalContext, WeakObject};
use crate::error::{BindError, LookupError, Phase};
use crate::meta::{Class, Name, Sealed};
use crate::reactive::{LiveProperty, LiveSignal, Property, Signal};

/// Live bindings of one object, keyed by canonical name.
#[derive(Default)]
pub(crate) struct InstanceState {
    pub(crate) signals: IndexMap<Name, Arc<dyn LiveSignal>>,
    pub(crate) properties: IndexMap<Name, Arc<dyn LiveProperty>>,
}

fn unbound(class: &Class, name: &Name) -> BindError {
    BindError::Lookup {
        class: class.name().clone(),
        phase: Phase::Binding,
        source: LookupError::Unbound {
            class: class.name().clone(),
            name: name.clone(),
        },
    }
}

pub(crate) fn bind(
    class: &Class,
    sealed: &Sealed,
    owner: &WeakObject,
) -> Result<InstanceState, BindError> {
    let view = sealed.view();
    let dispatch = sealed.dispatch();
    let mut state = InstanceState::default();

    for canonical in dispatch.canonical_properties() {
        let descriptor = view
            .property(&canonical)
            .ok_or_else(|| unbound(class, &canonical))?;

        let live: Arc<dyn LiveProperty> = match descriptor.factory() {
            Some(factory) => {
                let context = PropertyContext {
                    class,
                    descriptor,
                    owner,
                };
                factory(&context).map_err(|source| BindError::Factory {
                    class: class.name().clone(),
                    name: canonical.clone(),
                    phase: Phase::Binding,
                    source,
                })?
            }
            None => Arc::new(Property::from_descriptor(descriptor)),
        };

        state
            .signals
            .insert(descriptor.notifier().original().clone(), live.changed());
        state.properties.insert(canonical, live);
    }

    for canonical in dispatch.canonical_signals() {
        // Already bound as a property notifier.
        if state.signals.contains_key(&canonical) {
            continue;
        }

        let descriptor = view
            .signal(&canonical)
            .ok_or_else(|| unbound(class, &canonical))?;

        let live: Arc<dyn LiveSignal> = match descriptor.factory() {
            Some(factory) => {
                let context = SignalContext {
                    class,
                    descriptor,
                    owner,
                };
                factory(&context).map_err(|source| BindError::Factory {
                    class: class.name().clone(),
                    name: canonical.clone(),
                    phase: Phase::Binding,
                    source,
                })?
            }
            None => Arc::new(Signal::from_descriptor(descriptor)),
        };
        state.signals.insert(canonical, live);
    }

    tracing::debug!(
        class = %class.name(),
        signals = state.signals.len(),
        properties = state.properties.len(),
        "bound"
    );
    Ok(state)
}
