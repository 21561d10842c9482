//! Live Signal Implementation
//!
//! A live signal is the per-object event channel materialized from a
//! `SignalDescriptor` when an object is constructed.
//!
//! # How Signals Work
//!
//! 1. Handlers are connected and kept in registration order.
//!
//! 2. `emit` checks the argument count against the signal's arity, then
//!    invokes every connected handler synchronously on the emitting thread.
//!
//! 3. The handler list is snapshotted before delivery, so a handler may
//!    connect further handlers or emit other signals without deadlocking.
//!    Handlers connected during an emission see the next one.
//!
//! # Thread Safety
//!
//! The handler list is protected by a RwLock. No lock is held while
//! handlers run.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::connection::{Connection, ConnectionId, Handler};
use crate::error::SignalError;
use crate::meta::{Arity, Name, SignalDescriptor};
use crate::value::Value;

/// Counter for generating unique signal IDs.
static SIGNAL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique signal ID.
fn next_signal_id() -> u64 {
    SIGNAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Behavior every live signal provides.
///
/// The default implementation is `Signal`; descriptors may carry a factory
/// producing a different one.
pub trait LiveSignal: Send + Sync {
    /// Unique identifier of this live instance.
    fn id(&self) -> u64;

    /// Canonical name the signal was bound under.
    fn name(&self) -> &str;

    fn arity(&self) -> &Arity;

    /// Attach a handler. Handlers run in the order they were connected.
    fn connect(&self, handler: Handler) -> ConnectionId;

    /// Invoke every connected handler with `args`.
    fn emit(&self, args: &[Value]) -> Result<(), SignalError>;

    fn connection_count(&self) -> usize;
}

impl dyn LiveSignal {
    /// Connect a closure without boxing it by hand.
    pub fn connect_fn<F>(&self, handler: F) -> ConnectionId
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        self.connect(Arc::new(handler))
    }
}

impl Debug for dyn LiveSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveSignal")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("arity", self.arity())
            .field("connection_count", &self.connection_count())
            .finish()
    }
}

/// The default live signal.
///
/// # Example
///
/// ```rust
/// use lattice_meta::reactive::{LiveSignal, Signal};
/// use lattice_meta::meta::Arity;
/// use lattice_meta::Value;
///
/// let pressed = Signal::new("pressed", Arity::fixed(["pos"]));
/// pressed.connect(std::sync::Arc::new(|args: &[Value]| println!("pressed at {:?}", args[0])));
/// pressed.emit(&[vec![10, 20].into()]).unwrap();
/// ```
pub struct Signal {
    /// Unique identifier for this signal.
    id: u64,

    name: Name,

    arity: Arity,

    /// Connected handlers, in registration order.
    connections: Arc<RwLock<Vec<Connection>>>,
}

impl Signal {
    /// Create a signal with no connections.
    pub fn new(name: impl Into<Name>, arity: Arity) -> Self {
        Self {
            id: next_signal_id(),
            name: name.into(),
            arity,
            connections: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create the default live signal for a descriptor.
    pub fn from_descriptor(descriptor: &SignalDescriptor) -> Self {
        Self::new(descriptor.name().clone(), descriptor.arity().clone())
    }
}

impl LiveSignal for Signal {
    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> &Arity {
        &self.arity
    }

    fn connect(&self, handler: Handler) -> ConnectionId {
        let connection = Connection::new(handler);
        let id = connection.id();
        self.connections.write().push(connection);
        id
    }

    fn emit(&self, args: &[Value]) -> Result<(), SignalError> {
        if let Arity::Fixed(params) = &self.arity {
            if params.len() != args.len() {
                return Err(SignalError::ArityMismatch {
                    signal: self.name.clone(),
                    expected: params.len(),
                    got: args.len(),
                });
            }
        }

        // Snapshot so handlers can connect re-entrantly.
        let connections = self.connections.read().clone();
        tracing::trace!(
            signal = %self.name,
            id = self.id,
            handlers = connections.len(),
            "emit"
        );

        for connection in &connections {
            connection.invoke(args);
        }
        Ok(())
    }

    fn connection_count(&self) -> usize {
        self.connections.read().len()
    }
}

impl Clone for Signal {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            arity: self.arity.clone(),
            connections: Arc::clone(&self.connections),
        }
    }
}

impl Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("connection_count", &self.connection_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicI32;

    #[test]
    fn signal_notifies_handlers_in_order() {
        let signal = Signal::new("clicked", Arity::none());
        let order = Arc::new(RwLock::new(Vec::new()));

        for tag in 1..=3 {
            let order = order.clone();
            signal.connect(Arc::new(move |_: &[Value]| order.write().push(tag)));
        }

        signal.emit(&[]).unwrap();
        assert_eq!(*order.read(), vec![1, 2, 3]);
    }

    #[test]
    fn fixed_arity_rejects_wrong_argument_count() {
        let signal = Signal::new("moved", Arity::fixed(["x", "y"]));
        let calls = Arc::new(AtomicI32::new(0));
        let calls_clone = calls.clone();
        signal.connect(Arc::new(move |_: &[Value]| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        }));

        let err = signal.emit(&[Value::Int(1)]).unwrap_err();
        assert_eq!(
            err,
            SignalError::ArityMismatch {
                signal: "moved".into(),
                expected: 2,
                got: 1,
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        signal.emit(&[Value::Int(1), Value::Int(2)]).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn variadic_accepts_any_count() {
        let signal = Signal::new("log", Arity::Variadic);
        let total = Arc::new(AtomicI32::new(0));
        let total_clone = total.clone();
        signal.connect(Arc::new(move |args: &[Value]| {
            total_clone.fetch_add(args.len() as i32, Ordering::SeqCst);
        }));

        signal.emit(&[]).unwrap();
        signal.emit(&["a".into(), "b".into(), "c".into()]).unwrap();
        assert_eq!(total.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn reentrant_connect_does_not_deadlock() {
        let signal = Signal::new("tick", Arity::none());
        let inner = signal.clone();
        let calls = Arc::new(AtomicI32::new(0));
        let calls_clone = calls.clone();

        signal.connect(Arc::new(move |_: &[Value]| {
            let calls = calls_clone.clone();
            inner.connect(Arc::new(move |_: &[Value]| {
                calls.fetch_add(1, Ordering::SeqCst);
            }));
        }));

        signal.emit(&[]).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(signal.connection_count(), 2);

        signal.emit(&[]).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn signal_clone_shares_connections() {
        let signal1 = Signal::new("s", Arity::none());
        let signal2 = signal1.clone();

        signal2.connect(Arc::new(|_: &[Value]| {}));
        assert_eq!(signal1.connection_count(), 1);
        assert_eq!(signal1.id(), signal2.id());
    }

    #[test]
    fn signal_ids_are_unique() {
        let s1 = Signal::new("a", Arity::none());
        let s2 = Signal::new("a", Arity::none());

        assert_ne!(s1.id(), s2.id());
    }
}
