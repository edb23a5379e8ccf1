use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::key::TypeKey;
use crate::raw::{Annotation, Modifiers, RawConstructor, RawField, RawMethod};

// -----------------------------------------------------------------------------
// RawClass

/// The description of a single class, as handed over by the type system.
///
/// A `RawClass` is immutable once built and is shared as `Arc<RawClass>`.
/// Its identity is its [`TypeKey`]: two descriptions with the same key are
/// assumed to describe the same class.
///
/// # Example
///
/// ```
/// use bk_reflect::raw::{Annotation, Modifiers, RawClass, RawConstructor};
///
/// let base = RawClass::builder("shop.PaymentProcessor")
///     .modifiers(Modifiers::PUBLIC | Modifiers::INTERFACE)
///     .build();
///
/// let class = RawClass::builder("shop.CardProcessor")
///     .modifiers(Modifiers::PUBLIC)
///     .interface(base.clone())
///     .annotation(Annotation::new("RequestScoped"))
///     .constructor(RawConstructor::new().with_modifiers(Modifiers::PUBLIC))
///     .build();
///
/// assert_eq!(class.simple_name(), "CardProcessor");
/// assert_eq!(class.interfaces().len(), 1);
/// assert!(class.no_args_constructor().is_some());
/// ```
#[derive(Debug)]
pub struct RawClass {
    key: TypeKey,
    modifiers: Modifiers,
    superclass: Option<Arc<RawClass>>,
    interfaces: Vec<Arc<RawClass>>,
    annotations: Vec<Annotation>,
    fields: Vec<RawField>,
    methods: Vec<RawMethod>,
    constructors: Vec<RawConstructor>,
}

impl RawClass {
    /// Starts describing the class with the given fully-qualified name.
    #[inline]
    pub fn builder(name: impl Into<Arc<str>>) -> RawClassBuilder {
        RawClassBuilder {
            class: RawClass {
                key: TypeKey::new(name),
                modifiers: Modifiers::empty(),
                superclass: None,
                interfaces: Vec::new(),
                annotations: Vec::new(),
                fields: Vec::new(),
                methods: Vec::new(),
                constructors: Vec::new(),
            },
        }
    }

    /// Describes a primitive type such as `int`.
    pub fn primitive(name: impl Into<Arc<str>>) -> Arc<RawClass> {
        Self::builder(name)
            .modifiers(Modifiers::PUBLIC | Modifiers::FINAL | Modifiers::PRIMITIVE)
            .build()
    }

    #[inline]
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// Returns the fully-qualified name.
    #[inline]
    pub fn name(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the name without its package prefix.
    #[inline]
    pub fn simple_name(&self) -> &str {
        self.key.simple_name()
    }

    #[inline]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    #[inline]
    pub fn superclass(&self) -> Option<&Arc<RawClass>> {
        self.superclass.as_ref()
    }

    #[inline]
    pub fn interfaces(&self) -> &[Arc<RawClass>] {
        &self.interfaces
    }

    #[inline]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    #[inline]
    pub fn fields(&self) -> &[RawField] {
        &self.fields
    }

    #[inline]
    pub fn methods(&self) -> &[RawMethod] {
        &self.methods
    }

    #[inline]
    pub fn constructors(&self) -> &[RawConstructor] {
        &self.constructors
    }

    /// Returns the constructor without parameters.
    ///
    /// A class declaring no constructor at all has an implicit public one.
    pub fn no_args_constructor(&self) -> Option<RawConstructor> {
        if self.constructors.is_empty() && !self.modifiers.contains(Modifiers::INTERFACE) {
            return Some(RawConstructor::new().with_modifiers(Modifiers::PUBLIC));
        }
        self.constructors
            .iter()
            .find(|c| c.parameters().is_empty())
            .cloned()
    }
}

// -----------------------------------------------------------------------------
// RawClassBuilder

/// Consuming builder of [`RawClass`], see [`RawClass::builder`].
#[derive(Debug)]
pub struct RawClassBuilder {
    class: RawClass,
}

impl RawClassBuilder {
    #[inline]
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.class.modifiers = modifiers;
        self
    }

    #[inline]
    pub fn superclass(mut self, superclass: Arc<RawClass>) -> Self {
        self.class.superclass = Some(superclass);
        self
    }

    #[inline]
    pub fn interface(mut self, interface: Arc<RawClass>) -> Self {
        self.class.interfaces.push(interface);
        self
    }

    #[inline]
    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.class.annotations.push(annotation);
        self
    }

    #[inline]
    pub fn field(mut self, field: RawField) -> Self {
        self.class.fields.push(field);
        self
    }

    #[inline]
    pub fn method(mut self, method: RawMethod) -> Self {
        self.class.methods.push(method);
        self
    }

    #[inline]
    pub fn constructor(mut self, constructor: RawConstructor) -> Self {
        self.class.constructors.push(constructor);
        self
    }

    #[inline]
    pub fn build(self) -> Arc<RawClass> {
        Arc::new(self.class)
    }
}
