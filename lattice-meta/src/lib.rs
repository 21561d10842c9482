//! Lattice Meta
//!
//! This crate provides the meta-object layer of the Lattice reactive UI
//! framework: classes that declare named signals and observable properties,
//! inherit and override them, and materialize live instances of them for
//! every constructed object.
//!
//! It implements:
//!
//! - Signal and property declarations with aliases
//! - Inheritance-merged declaration views, nearest class winning
//! - Per-object binding of live signals and properties
//! - Class-level handlers connected to every new object
//!
//! # Architecture
//!
//! - `meta`: descriptors, classes, merged views, alias resolution
//! - `object`: construction (binding and wiring) and accessors
//! - `reactive`: the live signal and property primitives
//! - `value`: the dynamic values flowing through them
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use lattice_meta::{Class, Value};
//!
//! let counter = Class::root("Counter");
//! counter.property("count", 0).unwrap();
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let seen_in_handler = seen.clone();
//! counter
//!     .on_changed("count", move |_, args| seen_in_handler.lock().unwrap().push(args[0].clone()))
//!     .unwrap();
//!
//! let c = counter.instantiate().unwrap();
//! assert_eq!(c.get("count").unwrap(), Value::Int(0));
//!
//! c.set("count", 5).unwrap();
//! assert_eq!(c.get("count").unwrap(), Value::Int(5));
//! assert_eq!(*seen.lock().unwrap(), vec![Value::Int(5)]);
//! ```

pub mod config;
pub mod error;
pub mod meta;
pub mod object;
pub mod reactive;
pub mod value;

pub use config::{ArityPolicy, Config};
pub use error::{BindError, DeclarationError, Error, LookupError, Phase, Result, SignalError};
pub use meta::{class_of, Class, MetaType, Name, PropertyDecl, SignalDecl};
pub use object::{Object, WeakObject};
pub use reactive::{LiveProperty, LiveSignal};
pub use value::Value;
