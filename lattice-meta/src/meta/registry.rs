//! Typed opt-in.
//!
//! A Rust type joins the meta-object system by implementing `MetaType`.
//! Its `Class` is built on first use and cached per `TypeId`, so declarations
//! run exactly once per type no matter how many objects are constructed.

use std::any::TypeId;
use std::sync::OnceLock;

use dashmap::DashMap;

use super::class::Class;
use crate::config::Config;
use crate::error::DeclarationError;

/// A Rust type with declared signals and properties.
///
/// # Example
///
/// ```rust
/// use lattice_meta::{class_of, Class, DeclarationError, MetaType, Object, Value};
///
/// struct Counter;
///
/// impl MetaType for Counter {
///     const NAME: &'static str = "Counter";
///
///     fn declare(class: &Class) -> Result<(), DeclarationError> {
///         class.property("count", 0)?;
///         Ok(())
///     }
/// }
///
/// let counter = Object::of::<Counter>().unwrap();
/// assert_eq!(counter.get("count").unwrap(), Value::Int(0));
/// assert_eq!(class_of::<Counter>().unwrap(), *counter.class());
/// ```
pub trait MetaType: 'static {
    const NAME: &'static str;

    /// The class this type derives from, usually `class_of::<Parent>()`.
    fn superclass() -> Result<Option<Class>, DeclarationError> {
        Ok(None)
    }

    /// Configuration for this type. `None` inherits the superclass's, or
    /// uses the default for a root.
    fn config() -> Option<Config> {
        None
    }

    /// Make this type's own declarations.
    fn declare(class: &Class) -> Result<(), DeclarationError>;
}

fn classes() -> &'static DashMap<TypeId, Class> {
    static CLASSES: OnceLock<DashMap<TypeId, Class>> = OnceLock::new();
    CLASSES.get_or_init(DashMap::new)
}

/// The class of `T`, declaring it on first use.
pub fn class_of<T: MetaType>() -> Result<Class, DeclarationError> {
    let key = TypeId::of::<T>();
    if let Some(class) = classes().get(&key) {
        return Ok(class.value().clone());
    }

    // No map lock is held here: declaring the superclass re-enters.
    let class = match (T::superclass()?, T::config()) {
        (Some(parent), Some(config)) => Class::derive_with_config(T::NAME, &parent, config),
        (Some(parent), None) => Class::derive(T::NAME, &parent),
        (None, Some(config)) => Class::root_with_config(T::NAME, config),
        (None, None) => Class::root(T::NAME),
    };
    T::declare(&class)?;

    let class = classes().entry(key).or_insert(class).value().clone();
    Ok(class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArityPolicy;

    struct Shape;
    struct Circle;
    struct Broken;

    impl MetaType for Shape {
        const NAME: &'static str = "Shape";

        fn config() -> Option<Config> {
            Some(Config::default().with_arity_policy(ArityPolicy::Deny))
        }

        fn declare(class: &Class) -> Result<(), DeclarationError> {
            class.property("area", 0.0)?;
            Ok(())
        }
    }

    impl MetaType for Circle {
        const NAME: &'static str = "Circle";

        fn superclass() -> Result<Option<Class>, DeclarationError> {
            class_of::<Shape>().map(Some)
        }

        fn declare(class: &Class) -> Result<(), DeclarationError> {
            class.property("radius", 1.0)?;
            Ok(())
        }
    }

    impl MetaType for Broken {
        const NAME: &'static str = "Broken";

        fn declare(class: &Class) -> Result<(), DeclarationError> {
            class.alias_property("nick", "name")?;
            Ok(())
        }
    }

    #[test]
    fn class_is_built_once() {
        let first = class_of::<Circle>().unwrap();
        let second = class_of::<Circle>().unwrap();
        assert_eq!(first, second);

        let shape = class_of::<Shape>().unwrap();
        assert_eq!(first.parent(), Some(&shape));
        assert_eq!(first.config().arity_mismatch, ArityPolicy::Deny);
        let properties: Vec<String> = first.properties().iter().map(|n| n.to_string()).collect();
        assert_eq!(properties, vec!["area", "radius"]);
    }

    #[test]
    fn failed_declaration_is_not_cached() {
        assert!(matches!(
            class_of::<Broken>().unwrap_err(),
            DeclarationError::NoSuchProperty { .. }
        ));
        assert!(classes().get(&TypeId::of::<Broken>()).is_none());
    }
}
