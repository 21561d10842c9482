//! Connection types for live signals.
//!
//! A Connection is one handler attached to a live signal. Handlers run in
//! the order they were connected.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::value::Value;

/// A handler receiving the arguments of an emission.
pub type Handler = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Unique identifier for a connection.
///
/// Identifiers are process-wide, so two connections never share one even
/// when they are attached to different signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// A handler attached to a signal.
#[derive(Clone)]
pub struct Connection {
    id: ConnectionId,
    handler: Handler,
}

impl Connection {
    pub fn new(handler: Handler) -> Self {
        Self {
            id: ConnectionId::new(),
            handler,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Deliver one emission to the handler.
    pub fn invoke(&self, args: &[Value]) {
        (self.handler)(args);
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicI64;

    #[test]
    fn connection_ids_are_unique() {
        let id1 = ConnectionId::new();
        let id2 = ConnectionId::new();
        let id3 = ConnectionId::new();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn invoke_passes_arguments() {
        let seen = Arc::new(AtomicI64::new(0));
        let seen_clone = seen.clone();

        let connection = Connection::new(Arc::new(move |args: &[Value]| {
            let sum: i64 = args.iter().filter_map(Value::as_int).sum();
            seen_clone.store(sum, Ordering::SeqCst);
        }));

        connection.invoke(&[Value::Int(2), Value::Int(40)]);
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }
}
