//! Per-class accessor dispatch.
//!
//! Built once when a class is sealed: every declared signal and property
//! name maps to the canonical name its live instance is bound under. Object
//! accessors (`get`, `set`, `signal`, ...) go through this table instead of
//! resolving aliases on each call.

use indexmap::{IndexMap, IndexSet};

use super::descriptor::Name;
use super::resolve::resolve;
use super::view::MergedView;
use crate::error::DeclarationError;

#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    signals: IndexMap<Name, Name>,
    properties: IndexMap<Name, Name>,
}

impl DispatchTable {
    pub(crate) fn build(
        view: &MergedView,
        class: &Name,
        max_depth: usize,
    ) -> Result<Self, DeclarationError> {
        let mut table = Self::default();

        for (name, descriptor) in view.properties() {
            let canonical = resolve(view.properties(), descriptor, class, max_depth)?;
            table
                .properties
                .insert(name.clone(), canonical.name().clone());
        }
        for (name, descriptor) in view.signals() {
            let canonical = resolve(view.signals(), descriptor, class, max_depth)?;
            table.signals.insert(name.clone(), canonical.name().clone());
        }

        Ok(table)
    }

    /// Canonical name for a declared signal name.
    pub fn signal(&self, name: &str) -> Option<&Name> {
        self.signals.get(name)
    }

    /// Canonical name for a declared property name.
    pub fn property(&self, name: &str) -> Option<&Name> {
        self.properties.get(name)
    }

    /// Distinct canonical signal names, in declaration order.
    pub fn canonical_signals(&self) -> IndexSet<Name> {
        self.signals.values().cloned().collect()
    }

    /// Distinct canonical property names, in declaration order.
    pub fn canonical_properties(&self) -> IndexSet<Name> {
        self.properties.values().cloned().collect()
    }
}
