//! Meta-Object Declarations
//!
//! This module holds the class-level half of the system: what a type
//! declares, and how declarations combine across inheritance.
//!
//! # Concepts
//!
//! ## Descriptors
//!
//! A descriptor describes one signal or property as declared. An alias is a
//! descriptor whose `original` names another declaration; alias chains
//! collapse so every alias points straight at a non-alias name.
//!
//! ## Merged Views
//!
//! Each class owns its declarations. The merged view of a class overlays
//! its ancestors' declarations and its own, nearest class winning by name.
//! Canonical names are resolved against the merged view, so an ancestor's
//! alias follows a subclass override of its original.
//!
//! ## Sealing
//!
//! The first object constructed from a class seals it: the merged view and
//! the name-to-canonical dispatch table are computed once and cached, and
//! the class and its ancestors stop accepting declarations.

mod class;
mod decl;
mod descriptor;
mod dispatch;
mod registry;
mod resolve;
mod view;

pub use class::{Class, Sealed};
pub use decl::{PropertyDecl, SignalDecl};
pub use descriptor::{
    notifier_name, Arity, ClassId, DeclaredIn, Init, InitBinding, Name, PropertyDescriptor,
    PropertyFactory, SignalDescriptor, SignalFactory,
};
pub use dispatch::DispatchTable;
pub use registry::{class_of, MetaType};
pub use resolve::{resolve, resolve_name, Aliasable};
pub use view::{InitialConnection, MergedView, ObjectHandler};
