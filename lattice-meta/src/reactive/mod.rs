//! Live Primitives
//!
//! The per-object runtime side of the meta-object system: live signals and
//! live properties. Class declarations describe them; object construction
//! materializes one live instance per canonical name.
//!
//! # Contracts
//!
//! ## Signals
//!
//! A live signal keeps its handlers in registration order. `emit` invokes
//! all of them synchronously on the emitting thread.
//!
//! ## Properties
//!
//! A live property stores a value and owns a notifier signal. Writing a value
//! different from the stored one emits the new value on the notifier.
//!
//! Both contracts are traits (`LiveSignal`, `LiveProperty`) so declarations
//! can plug in their own implementations through factories. `Signal` and
//! `Property` are the defaults.

mod connection;
mod property;
mod signal;

pub use connection::{Connection, ConnectionId, Handler};
pub use property::{LiveProperty, Property};
pub use signal::{LiveSignal, Signal};
