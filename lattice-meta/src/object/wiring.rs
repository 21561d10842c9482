//! Initial-connection wiring.
//!
//! Attaches every class-level handler in the merged view to the object's
//! live signal, ancestor handlers first. Handlers hold the object weakly and
//! receive it as their first argument.

use std::sync::Arc;

use super::Object;
use crate::config::ArityPolicy;
use crate::error::{BindError, Phase};
use crate::value::Value;

pub(crate) fn wire(object: &Object) -> Result<(), BindError> {
    let class = object.class();
    let sealed = &object.inner.sealed;
    let policy = class.config().arity_mismatch;

    for (name, connections) in sealed.view().initial_connections() {
        let live = object.signal(name).map_err(|source| BindError::Lookup {
            class: class.name().clone(),
            phase: Phase::Wiring,
            source,
        })?;

        for connection in connections {
            let expected = connection.expected_arity();
            if !expected.same_shape(live.arity()) {
                match policy {
                    ArityPolicy::Warn => tracing::warn!(
                        class = %class.name(),
                        declared_in = %connection.declared_in().name,
                        signal = %name,
                        expected = %expected,
                        actual = %live.arity(),
                        "inherited handler expects a different signal arity"
                    ),
                    ArityPolicy::Deny => {
                        return Err(BindError::HandlerArityMismatch {
                            class: class.name().clone(),
                            declared_in: connection.declared_in().name.clone(),
                            signal: name.clone(),
                            expected: expected.clone(),
                            actual: live.arity().clone(),
                        })
                    }
                }
            }

            let owner = object.downgrade();
            let handler = Arc::clone(&connection.handler);
            live.connect(Arc::new(move |args: &[Value]| {
                if let Some(object) = owner.upgrade() {
                    handler(&object, args);
                }
            }));
        }
    }

    Ok(())
}
