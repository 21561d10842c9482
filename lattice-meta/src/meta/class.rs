//! Classes
//!
//! A `Class` is the runtime type that declarations are made against. It
//! holds its own signal, property and initial-connection tables and a link
//! to its parent; everything inherited is computed by overlaying ancestors.
//!
//! # Lifecycle
//!
//! 1. Declaration: signals, properties, aliases and handlers are added to
//!    the class's own tables. Lookups of existing names (aliases, handlers)
//!    go through the merged view, computed by walking ancestors.
//!
//! 2. Sealing: on first instantiation (or an explicit `seal`), the class
//!    and all of its ancestors are sealed. The merged view and the dispatch
//!    table are computed once and cached; further declarations fail.
//!
//! # Thread Safety
//!
//! Declarations are expected to finish before the first instance is
//! constructed. Once sealed, a class is read-only and may be instantiated
//! from any number of threads.

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use super::decl::{PropertyDecl, SignalDecl};
use super::descriptor::{
    notifier_name, validate_name, Arity, ClassId, DeclaredIn, Name, PropertyDescriptor,
    SignalDescriptor,
};
use super::dispatch::DispatchTable;
use super::resolve::resolve;
use super::view::{InitialConnection, MergedView, OwnTables};
use crate::config::Config;
use crate::error::{self, DeclarationError};
use crate::object::Object;
use crate::value::Value;

/// Cached declarations of a sealed class.
#[derive(Debug)]
pub struct Sealed {
    view: Arc<MergedView>,
    dispatch: DispatchTable,
}

impl Sealed {
    pub fn view(&self) -> &Arc<MergedView> {
        &self.view
    }

    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }
}

struct ClassInner {
    id: ClassId,
    name: Name,
    parent: Option<Class>,
    config: Config,
    own: RwLock<OwnTables>,
    sealed: OnceLock<Arc<Sealed>>,
}

/// A type participating in the meta-object system.
///
/// Cloning is cheap and yields a handle to the same class.
///
/// # Example
///
/// ```rust
/// use lattice_meta::Class;
///
/// let button = Class::root("Button");
/// button.signal("pressed", ["pos"]).unwrap();
///
/// let color_button = button.subclass("ColorButton");
/// color_button.signal("pressed", ["pos", "color"]).unwrap();
///
/// let object = color_button.instantiate().unwrap();
/// assert_eq!(object.signal("pressed").unwrap().arity().params().len(), 2);
/// ```
#[derive(Clone)]
pub struct Class {
    inner: Arc<ClassInner>,
}

impl Class {
    /// Create a class with no parent and the default configuration.
    pub fn root(name: impl Into<Name>) -> Self {
        Self::root_with_config(name, Config::default())
    }

    pub fn root_with_config(name: impl Into<Name>, config: Config) -> Self {
        Self::create(name.into(), None, config)
    }

    /// Create a subclass of `parent`, inheriting its configuration.
    pub fn derive(name: impl Into<Name>, parent: &Class) -> Self {
        Self::derive_with_config(name, parent, parent.config().clone())
    }

    pub fn derive_with_config(name: impl Into<Name>, parent: &Class, config: Config) -> Self {
        Self::create(name.into(), Some(parent.clone()), config)
    }

    /// Shorthand for `Class::derive(name, self)`.
    pub fn subclass(&self, name: impl Into<Name>) -> Self {
        Self::derive(name, self)
    }

    fn create(name: Name, parent: Option<Class>, config: Config) -> Self {
        tracing::debug!(
            class = %name,
            parent = parent.as_ref().map(|p| p.name().as_ref()),
            "class created"
        );
        Self {
            inner: Arc::new(ClassInner {
                id: ClassId::next(),
                name,
                parent,
                config,
                own: RwLock::new(OwnTables::default()),
                sealed: OnceLock::new(),
            }),
        }
    }

    pub fn id(&self) -> ClassId {
        self.inner.id
    }

    pub fn name(&self) -> &Name {
        &self.inner.name
    }

    pub fn parent(&self) -> Option<&Class> {
        self.inner.parent.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// This class followed by its parent, grandparent, and so on.
    pub fn ancestors(&self) -> impl Iterator<Item = &Class> {
        std::iter::successors(Some(self), |class| class.parent())
    }

    /// Whether `self` is `other` or derives from it.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        self.ancestors().any(|class| class == other)
    }

    pub fn is_sealed(&self) -> bool {
        self.inner.sealed.get().is_some()
    }

    fn declared_in(&self) -> DeclaredIn {
        DeclaredIn {
            id: self.inner.id,
            name: self.inner.name.clone(),
        }
    }

    fn ensure_open(&self, name: &str) -> Result<(), DeclarationError> {
        if self.is_sealed() {
            return Err(DeclarationError::Sealed {
                class: self.inner.name.clone(),
                name: name.into(),
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------------

    /// Declare a fixed-arity signal.
    pub fn signal<I, S>(&self, name: &str, params: I) -> Result<Name, DeclarationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Name>,
    {
        self.declare_signal(SignalDecl::new(name).params(params))
    }

    /// Declare a signal accepting any number of arguments.
    pub fn variadic_signal(&self, name: &str) -> Result<Name, DeclarationError> {
        self.declare_signal(SignalDecl::new(name).variadic())
    }

    pub fn declare_signal(&self, decl: SignalDecl) -> Result<Name, DeclarationError> {
        let name = validate_name("signal", &decl.name)?;
        if let Arity::Fixed(params) = &decl.arity {
            for (i, param) in params.iter().enumerate() {
                validate_name("parameter", param)?;
                if params[..i].contains(param) {
                    return Err(DeclarationError::DuplicateParameter {
                        signal: name,
                        param: param.clone(),
                    });
                }
            }
        }

        let descriptor =
            SignalDescriptor::new(name.clone(), decl.arity, self.declared_in(), decl.factory);
        self.add_signal(descriptor)?;
        Ok(name)
    }

    /// Declare `name` as another name for the signal `original`.
    pub fn alias_signal(&self, name: &str, original: &str) -> Result<Name, DeclarationError> {
        let name = validate_name("signal", name)?;
        self.ensure_open(&name)?;

        let mut view = self.compute_view();
        let alias = view
            .signal(original)
            .ok_or_else(|| DeclarationError::NoSuchSignal {
                class: self.inner.name.clone(),
                name: original.into(),
            })?
            .alias(name.clone(), self.declared_in());

        view.insert_signal(alias.clone());
        self.check_resolvable(&view)?;
        self.add_signal(alias)?;
        Ok(name)
    }

    fn add_signal(&self, descriptor: SignalDescriptor) -> Result<(), DeclarationError> {
        let mut own = self.inner.own.write();
        self.ensure_open(descriptor.name())?;

        tracing::debug!(
            class = %self.inner.name,
            signal = %descriptor.name(),
            original = %descriptor.original(),
            arity = %descriptor.arity(),
            "signal declared"
        );
        own.signals.insert(descriptor.name().clone(), descriptor);
        Ok(())
    }

    /// Declare a property with an initial value. Also declares its notifier
    /// signal, `<name>_changed`.
    pub fn property(&self, name: &str, initial: impl Into<Value>) -> Result<Name, DeclarationError> {
        self.declare_property(PropertyDecl::new(name).initial(initial))
    }

    /// Declare a property whose initial value is computed per object.
    pub fn property_with<F>(&self, name: &str, binding: F) -> Result<Name, DeclarationError>
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.declare_property(PropertyDecl::new(name).binding(binding))
    }

    pub fn declare_property(&self, decl: PropertyDecl) -> Result<Name, DeclarationError> {
        let name = validate_name("property", &decl.name)?;
        let descriptor =
            PropertyDescriptor::new(name.clone(), decl.init, self.declared_in(), decl.factory);
        self.add_property(descriptor)?;
        Ok(name)
    }

    /// Declare `name` as another name for the property `original`. The alias
    /// gets an alias notifier, `<name>_changed`, as well.
    pub fn alias_property(&self, name: &str, original: &str) -> Result<Name, DeclarationError> {
        let name = validate_name("property", name)?;
        self.ensure_open(&name)?;

        let mut view = self.compute_view();
        let alias = view
            .property(original)
            .ok_or_else(|| DeclarationError::NoSuchProperty {
                class: self.inner.name.clone(),
                name: original.into(),
            })?
            .alias(name.clone(), self.declared_in());

        view.insert_property(alias.clone());
        self.check_resolvable(&view)?;
        self.add_property(alias)?;
        Ok(name)
    }

    /// Every name in `view` must still resolve once an alias is added. An
    /// alias that overrides a name further down an existing chain can close
    /// a cycle or push the chain past `max_alias_depth`.
    fn check_resolvable(&self, view: &MergedView) -> Result<(), DeclarationError> {
        DispatchTable::build(view, &self.inner.name, self.inner.config.max_alias_depth)?;
        Ok(())
    }

    fn add_property(&self, descriptor: PropertyDescriptor) -> Result<(), DeclarationError> {
        let mut own = self.inner.own.write();
        self.ensure_open(descriptor.name())?;

        tracing::debug!(
            class = %self.inner.name,
            property = %descriptor.name(),
            original = %descriptor.original(),
            "property declared"
        );
        let notifier = descriptor.notifier().clone();
        own.signals.insert(notifier.name().clone(), notifier);
        own.properties.insert(descriptor.name().clone(), descriptor);
        Ok(())
    }

    /// Connect `handler` to `signal` on every object of this class (and its
    /// subclasses) when the object is constructed.
    pub fn on<F>(&self, signal: &str, handler: F) -> Result<(), DeclarationError>
    where
        F: Fn(&Object, &[Value]) + Send + Sync + 'static,
    {
        self.ensure_open(signal)?;

        let view = self.compute_view();
        let descriptor = view
            .signal(signal)
            .ok_or_else(|| DeclarationError::NoSuchSignal {
                class: self.inner.name.clone(),
                name: signal.into(),
            })?;
        let canonical = resolve(
            view.signals(),
            descriptor,
            &self.inner.name,
            self.inner.config.max_alias_depth,
        )?;

        let connection = InitialConnection {
            handler: Arc::new(handler),
            declared_in: self.declared_in(),
            expected: canonical.arity().clone(),
        };

        let mut own = self.inner.own.write();
        self.ensure_open(signal)?;
        tracing::debug!(class = %self.inner.name, signal, "initial connection declared");
        own.initial_connections
            .entry(descriptor.name().clone())
            .or_default()
            .push(connection);
        Ok(())
    }

    /// Shorthand for `on("<property>_changed", handler)`.
    pub fn on_changed<F>(&self, property: &str, handler: F) -> Result<(), DeclarationError>
    where
        F: Fn(&Object, &[Value]) + Send + Sync + 'static,
    {
        self.on(&notifier_name(property), handler)
    }

    // ------------------------------------------------------------------------
    // Merged views
    // ------------------------------------------------------------------------

    /// Overlay own tables from the nearest sealed ancestor (or the root)
    /// down to this class.
    fn compute_view(&self) -> MergedView {
        let mut pending = Vec::new();
        let mut view = MergedView::default();
        for class in self.ancestors() {
            if let Some(sealed) = class.inner.sealed.get() {
                view = MergedView::clone(&sealed.view);
                break;
            }
            pending.push(class);
        }

        for class in pending.into_iter().rev() {
            view.overlay(&class.inner.own.read());
        }
        view
    }

    /// The inheritance-merged declarations visible to this class.
    pub fn merged_view(&self) -> Arc<MergedView> {
        match self.inner.sealed.get() {
            Some(sealed) => Arc::clone(&sealed.view),
            None => Arc::new(self.compute_view()),
        }
    }

    /// Declared signal names, including inherited ones and notifiers.
    pub fn signals(&self) -> Vec<Name> {
        self.merged_view().signal_names()
    }

    /// Declared property names, including inherited ones.
    pub fn properties(&self) -> Vec<Name> {
        self.merged_view().property_names()
    }

    /// Close this class and its ancestors for declarations and cache the
    /// merged view and dispatch table. Idempotent.
    pub fn seal(&self) -> Result<Arc<Sealed>, DeclarationError> {
        if let Some(sealed) = self.inner.sealed.get() {
            return Ok(Arc::clone(sealed));
        }
        if let Some(parent) = self.parent() {
            parent.seal()?;
        }

        let view = self.compute_view();
        let dispatch =
            DispatchTable::build(&view, &self.inner.name, self.inner.config.max_alias_depth)?;
        let sealed = Arc::new(Sealed {
            view: Arc::new(view),
            dispatch,
        });

        let sealed = self.inner.sealed.get_or_init(|| sealed);
        tracing::debug!(
            class = %self.inner.name,
            signals = sealed.view.signals().len(),
            properties = sealed.view.properties().len(),
            "class sealed"
        );
        Ok(Arc::clone(sealed))
    }

    /// Construct an object of this class. Seals the class first.
    pub fn instantiate(&self) -> error::Result<Object> {
        Object::new(self)
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Class {}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("parent", &self.parent().map(|p| p.name()))
            .field("sealed", &self.is_sealed())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
