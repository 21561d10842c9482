//! Error Types
//!
//! Failures are split by when they can happen:
//!
//! - `DeclarationError`: while a type declares its signals, properties,
//!   aliases and handlers, or when the declarations are sealed.
//! - `LookupError`: when an object is asked for a name its type never declared.
//! - `BindError`: while an object is being constructed. An object whose
//!   construction failed is never handed out.
//! - `SignalError`: when an emission does not match the signal's arity.

use std::{fmt, result};

use thiserror::Error;

use crate::meta::{Arity, Name};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("invalid {kind} name {name:?}")]
    InvalidName { kind: &'static str, name: String },

    #[error("signal `{signal}` declares parameter `{param}` more than once")]
    DuplicateParameter { signal: Name, param: Name },

    #[error("undefined signal `{name}` for class `{class}`")]
    NoSuchSignal { class: Name, name: Name },

    #[error("undefined property `{name}` for class `{class}`")]
    NoSuchProperty { class: Name, name: Name },

    #[error("class `{class}` is sealed and cannot declare `{name}`")]
    Sealed { class: Name, name: Name },

    #[error("alias cycle while resolving `{name}` in class `{class}`")]
    AliasCycle { class: Name, name: Name },

    #[error("alias chain for `{name}` in class `{class}` exceeds {limit} hops")]
    AliasTooDeep {
        class: Name,
        name: Name,
        limit: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("undefined signal `{name}` for class `{class}`")]
    NoSuchSignal { class: Name, name: Name },

    #[error("undefined property `{name}` for class `{class}`")]
    NoSuchProperty { class: Name, name: Name },

    #[error("`{name}` is declared by class `{class}` but has no live binding")]
    Unbound { class: Name, name: Name },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    #[error("signal `{signal}` expects {expected} argument(s), got {got}")]
    ArityMismatch {
        signal: Name,
        expected: usize,
        got: usize,
    },
}

/// Construction phase an object was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Binding,
    Wiring,
    Ready,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Binding => "binding",
            Phase::Wiring => "wiring",
            Phase::Ready => "ready",
        };
        f.write_str(phase)
    }
}

/// Error type returned by user-supplied signal and property factories.
pub type FactoryError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum BindError {
    #[error("class `{class}` could not be sealed: {source}")]
    Declaration {
        class: Name,
        #[source]
        source: DeclarationError,
    },

    #[error("factory for `{name}` in class `{class}` failed during {phase}: {source}")]
    Factory {
        class: Name,
        name: Name,
        phase: Phase,
        #[source]
        source: FactoryError,
    },

    #[error(
        "handler declared by `{declared_in}` expects signal `{signal}` to be {expected}, \
         but class `{class}` binds it as {actual}"
    )]
    HandlerArityMismatch {
        class: Name,
        declared_in: Name,
        signal: Name,
        expected: Arity,
        actual: Arity,
    },

    #[error("{phase} of class `{class}` failed: {source}")]
    Lookup {
        class: Name,
        phase: Phase,
        #[source]
        source: LookupError,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Signal(#[from] SignalError),
}

pub type Result<T> = result::Result<T, Error>;
