//! Signal and property descriptors.
//!
//! A descriptor is the immutable, declaration-time description of one signal
//! or property. Objects never share descriptors' runtime state: each object
//! binds its own live instance from them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::{DeclarationError, FactoryError};
use crate::object::{PropertyContext, SignalContext};
use crate::reactive::{LiveProperty, LiveSignal};
use crate::value::Value;

/// Interned-by-sharing name of a signal, property, parameter or class.
pub type Name = Arc<str>;

/// Closure producing a property's initial value.
pub type InitBinding = Arc<dyn Fn() -> Value + Send + Sync>;

/// Builds a custom live signal for one object.
pub type SignalFactory =
    Arc<dyn Fn(&SignalContext<'_>) -> Result<Arc<dyn LiveSignal>, FactoryError> + Send + Sync>;

/// Builds a custom live property for one object.
pub type PropertyFactory =
    Arc<dyn Fn(&PropertyContext<'_>) -> Result<Arc<dyn LiveProperty>, FactoryError> + Send + Sync>;

/// Unique identifier of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(u64);

impl ClassId {
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// The class a descriptor was declared in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredIn {
    pub id: ClassId,
    pub name: Name,
}

/// Parameter shape of a signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arity {
    /// Exactly these parameters, in order. Empty means zero-arity.
    Fixed(SmallVec<[Name; 4]>),
    /// Any number of arguments.
    Variadic,
}

impl Arity {
    pub fn none() -> Self {
        Arity::Fixed(SmallVec::new())
    }

    pub fn fixed<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Name>,
    {
        Arity::Fixed(params.into_iter().map(Into::into).collect())
    }

    /// Parameter names. Empty for variadic signals.
    pub fn params(&self) -> &[Name] {
        match self {
            Arity::Fixed(params) => params,
            Arity::Variadic => &[],
        }
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self, Arity::Variadic)
    }

    /// Whether an emission with `count` arguments fits.
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Fixed(params) => params.len() == count,
            Arity::Variadic => true,
        }
    }

    /// Whether emissions valid for `self` are valid for `other`. Parameter
    /// names do not matter, only their count.
    pub fn same_shape(&self, other: &Arity) -> bool {
        match (self, other) {
            (Arity::Variadic, Arity::Variadic) => true,
            (Arity::Fixed(a), Arity::Fixed(b)) => a.len() == b.len(),
            _ => false,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Variadic => f.write_str("variadic"),
            Arity::Fixed(params) => {
                f.write_str("(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(param)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// How a property gets its initial value.
#[derive(Clone)]
pub enum Init {
    Value(Value),
    Binding(InitBinding),
}

impl Default for Init {
    fn default() -> Self {
        Init::Value(Value::Null)
    }
}

impl fmt::Debug for Init {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Init::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Init::Binding(_) => f.write_str("Binding(..)"),
        }
    }
}

/// Name of the notifier signal generated for `property`.
pub fn notifier_name(property: &str) -> String {
    format!("{property}_changed")
}

pub(crate) fn validate_name(kind: &'static str, name: &str) -> Result<Name, DeclarationError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(DeclarationError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(Name::from(name))
}

/// Description of one declared signal.
#[derive(Clone)]
pub struct SignalDescriptor {
    name: Name,
    arity: Arity,
    declared_in: DeclaredIn,
    factory: Option<SignalFactory>,
    /// Canonical name. Equal to `name` unless this is an alias.
    original: Name,
}

impl SignalDescriptor {
    pub(crate) fn new(
        name: Name,
        arity: Arity,
        declared_in: DeclaredIn,
        factory: Option<SignalFactory>,
    ) -> Self {
        Self {
            original: name.clone(),
            name,
            arity,
            declared_in,
            factory,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn arity(&self) -> &Arity {
        &self.arity
    }

    pub fn declared_in(&self) -> &DeclaredIn {
        &self.declared_in
    }

    pub fn factory(&self) -> Option<&SignalFactory> {
        self.factory.as_ref()
    }

    /// Name of the descriptor this one aliases, or its own name.
    pub fn original(&self) -> &Name {
        &self.original
    }

    pub fn is_alias(&self) -> bool {
        self.original != self.name
    }

    /// An alias named `name`, declared in `declared_in`. Chains collapse:
    /// the alias points at this descriptor's original, not at this one.
    pub fn alias(&self, name: Name, declared_in: DeclaredIn) -> Self {
        Self {
            name,
            arity: self.arity.clone(),
            declared_in,
            factory: self.factory.clone(),
            original: self.original.clone(),
        }
    }
}

impl fmt::Debug for SignalDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalDescriptor")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("declared_in", &self.declared_in.name)
            .field("factory", &self.factory.is_some())
            .field("original", &self.original)
            .finish()
    }
}

/// Description of one declared property.
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: Name,
    init: Init,
    declared_in: DeclaredIn,
    factory: Option<PropertyFactory>,
    original: Name,
    notifier: SignalDescriptor,
}

impl PropertyDescriptor {
    /// A property and its notifier, `<name>_changed(new_<name>)`.
    pub(crate) fn new(
        name: Name,
        init: Init,
        declared_in: DeclaredIn,
        factory: Option<PropertyFactory>,
    ) -> Self {
        let notifier = SignalDescriptor::new(
            notifier_name(&name).into(),
            Arity::fixed([format!("new_{name}")]),
            declared_in.clone(),
            None,
        );
        Self {
            original: name.clone(),
            name,
            init,
            declared_in,
            factory,
            notifier,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn init(&self) -> &Init {
        &self.init
    }

    pub fn declared_in(&self) -> &DeclaredIn {
        &self.declared_in
    }

    pub fn factory(&self) -> Option<&PropertyFactory> {
        self.factory.as_ref()
    }

    pub fn original(&self) -> &Name {
        &self.original
    }

    pub fn is_alias(&self) -> bool {
        self.original != self.name
    }

    /// The notifier signal. For an alias this is itself an alias,
    /// `<alias>_changed`, of the original's notifier.
    pub fn notifier(&self) -> &SignalDescriptor {
        &self.notifier
    }

    pub fn alias(&self, name: Name, declared_in: DeclaredIn) -> Self {
        let notifier = self
            .notifier
            .alias(notifier_name(&name).into(), declared_in.clone());
        Self {
            name,
            init: self.init.clone(),
            declared_in,
            factory: self.factory.clone(),
            original: self.original.clone(),
            notifier,
        }
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("init", &self.init)
            .field("declared_in", &self.declared_in.name)
            .field("factory", &self.factory.is_some())
            .field("original", &self.original)
            .field("notifier", &self.notifier.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(name: &str) -> DeclaredIn {
        DeclaredIn {
            id: ClassId::next(),
            name: name.into(),
        }
    }

    #[test]
    fn alias_chains_collapse_to_one_hop() {
        let base = owner("Base");
        let pressed = SignalDescriptor::new("pressed".into(), Arity::fixed(["pos"]), base.clone(), None);
        let tapped = pressed.alias("tapped".into(), base.clone());
        let touched = tapped.alias("touched".into(), base);

        assert!(!pressed.is_alias());
        assert_eq!(tapped.original().as_ref(), "pressed");
        assert_eq!(touched.original().as_ref(), "pressed");
        assert_eq!(touched.arity(), pressed.arity());
    }

    #[test]
    fn property_owns_notifier() {
        let property = PropertyDescriptor::new("count".into(), Init::Value(0.into()), owner("Counter"), None);
        let notifier = property.notifier();

        assert_eq!(notifier.name().as_ref(), "count_changed");
        assert_eq!(notifier.arity(), &Arity::fixed(["new_count"]));
        assert!(!notifier.is_alias());
    }

    #[test]
    fn property_alias_aliases_notifier() {
        let property = PropertyDescriptor::new("name".into(), Init::default(), owner("Person"), None);
        let nick = property.alias("nick".into(), owner("Person"));

        assert_eq!(nick.original().as_ref(), "name");
        assert_eq!(nick.notifier().name().as_ref(), "nick_changed");
        assert_eq!(nick.notifier().original().as_ref(), "name_changed");
    }

    #[test]
    fn arity_display_and_acceptance() {
        let arity = Arity::fixed(["pos", "color"]);
        assert_eq!(arity.to_string(), "(pos, color)");
        assert!(arity.accepts(2));
        assert!(!arity.accepts(1));
        assert!(Arity::Variadic.accepts(7));
        assert_eq!(Arity::none().to_string(), "()");
        assert!(arity.same_shape(&Arity::fixed(["a", "b"])));
        assert!(!arity.same_shape(&Arity::Variadic));
    }

    #[test]
    fn names_are_validated() {
        assert!(validate_name("signal", "pressed").is_ok());
        assert!(validate_name("signal", "").is_err());
        assert!(validate_name("signal", "two words").is_err());
    }
}
