//! Alias resolution.
//!
//! A descriptor's canonical form is found by looking its `original` up in
//! the same merged table, repeating while the name found differs from the
//! descriptor's own. Looking up in the merged table (rather than following
//! the descriptor captured at alias time) means an alias declared by an
//! ancestor follows a subclass that overrides the original.

use indexmap::IndexMap;
use smallvec::SmallVec;

use super::descriptor::{Name, PropertyDescriptor, SignalDescriptor};
use crate::error::DeclarationError;

/// A descriptor that can alias another of the same kind.
pub trait Aliasable {
    fn name(&self) -> &Name;
    fn original(&self) -> &Name;

    /// The error reported when an original is missing from the table.
    fn missing(class: &Name, name: &Name) -> DeclarationError;
}

impl Aliasable for SignalDescriptor {
    fn name(&self) -> &Name {
        SignalDescriptor::name(self)
    }

    fn original(&self) -> &Name {
        SignalDescriptor::original(self)
    }

    fn missing(class: &Name, name: &Name) -> DeclarationError {
        DeclarationError::NoSuchSignal {
            class: class.clone(),
            name: name.clone(),
        }
    }
}

impl Aliasable for PropertyDescriptor {
    fn name(&self) -> &Name {
        PropertyDescriptor::name(self)
    }

    fn original(&self) -> &Name {
        PropertyDescriptor::original(self)
    }

    fn missing(class: &Name, name: &Name) -> DeclarationError {
        DeclarationError::NoSuchProperty {
            class: class.clone(),
            name: name.clone(),
        }
    }
}

/// Follow `start` to its canonical descriptor within `table`.
///
/// Idempotent: a canonical descriptor resolves to itself. Fails on a cycle
/// or after `max_depth` hops.
pub fn resolve<'t, D: Aliasable>(
    table: &'t IndexMap<Name, D>,
    start: &'t D,
    class: &Name,
    max_depth: usize,
) -> Result<&'t D, DeclarationError> {
    let mut current = start;
    let mut visited: SmallVec<[&Name; 4]> = SmallVec::new();
    visited.push(current.name());

    while current.original() != current.name() {
        if visited.len() > max_depth {
            return Err(DeclarationError::AliasTooDeep {
                class: class.clone(),
                name: start.name().clone(),
                limit: max_depth,
            });
        }

        let next = table
            .get(current.original())
            .ok_or_else(|| D::missing(class, current.original()))?;
        if visited.contains(&next.name()) {
            return Err(DeclarationError::AliasCycle {
                class: class.clone(),
                name: start.name().clone(),
            });
        }

        visited.push(next.name());
        current = next;
    }

    Ok(current)
}

/// Resolve `name` within `table`, returning the canonical descriptor.
pub fn resolve_name<'t, D: Aliasable>(
    table: &'t IndexMap<Name, D>,
    name: &str,
    class: &Name,
    max_depth: usize,
) -> Result<&'t D, DeclarationError> {
    let start = table
        .get(name)
        .ok_or_else(|| D::missing(class, &Name::from(name)))?;
    resolve(table, start, class, max_depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::descriptor::{Arity, ClassId, DeclaredIn, Init};

    fn owner() -> DeclaredIn {
        DeclaredIn {
            id: ClassId::next(),
            name: "Widget".into(),
        }
    }

    fn signal(name: &str) -> SignalDescriptor {
        SignalDescriptor::new(name.into(), Arity::none(), owner(), None)
    }

    fn table(entries: Vec<SignalDescriptor>) -> IndexMap<Name, SignalDescriptor> {
        entries
            .into_iter()
            .map(|d| (d.name().clone(), d))
            .collect()
    }

    #[test]
    fn canonical_resolves_to_itself() {
        let signals = table(vec![signal("pressed")]);
        let class = Name::from("Widget");

        let resolved = resolve_name(&signals, "pressed", &class, 8).unwrap();
        assert_eq!(resolved.name().as_ref(), "pressed");
        let again = resolve(&signals, resolved, &class, 8).unwrap();
        assert!(std::ptr::eq(resolved, again));
    }

    #[test]
    fn alias_resolves_through_table() {
        let pressed = signal("pressed");
        let tapped = pressed.alias("tapped".into(), owner());
        let signals = table(vec![pressed, tapped]);

        let resolved = resolve_name(&signals, "tapped", &"Widget".into(), 8).unwrap();
        assert_eq!(resolved.name().as_ref(), "pressed");
    }

    #[test]
    fn alias_follows_overriding_alias() {
        // `b` aliases `a`, then a subclass re-declares `a` as an alias of `c`.
        let a = signal("a");
        let b = a.alias("b".into(), owner());
        let c = signal("c");
        let a_override = c.alias("a".into(), owner());
        let signals = table(vec![b, c, a_override]);

        let resolved = resolve_name(&signals, "b", &"Widget".into(), 8).unwrap();
        assert_eq!(resolved.name().as_ref(), "c");
    }

    #[test]
    fn cycles_are_reported() {
        let a_to_b = signal("b").alias("a".into(), owner());
        let b_to_a = signal("a").alias("b".into(), owner());
        let signals = table(vec![a_to_b, b_to_a]);

        let err = resolve_name(&signals, "a", &"Widget".into(), 8).unwrap_err();
        assert!(matches!(err, DeclarationError::AliasCycle { .. }));
    }

    #[test]
    fn depth_is_bounded() {
        let a = signal("a");
        let b = a.alias("b".into(), owner());
        let signals = table(vec![a, b]);

        let err = resolve_name(&signals, "b", &"Widget".into(), 0).unwrap_err();
        assert!(matches!(err, DeclarationError::AliasTooDeep { limit: 0, .. }));
    }

    #[test]
    fn missing_original_names_the_kind() {
        let nick = PropertyDescriptor::new("name".into(), Init::default(), owner(), None)
            .alias("nick".into(), owner());
        let mut properties = IndexMap::new();
        properties.insert(nick.name().clone(), nick);

        let err = resolve_name(&properties, "nick", &"Person".into(), 8).unwrap_err();
        assert_eq!(
            err,
            DeclarationError::NoSuchProperty {
                class: "Person".into(),
                name: "name".into(),
            }
        );
    }
}
