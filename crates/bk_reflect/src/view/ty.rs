use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;

use crate::cache::{SharedObjectCache, TypeClosure};
use crate::key::{MemberKey, MemberKind, TypeKey};
use crate::raw::{Annotation, Modifiers, RawClass};
use crate::view::{Annotated, AnnotatedConstructor, AnnotatedElement, AnnotatedField};
use crate::view::{AnnotatedMethod, AnnotatedParameter, LazyClosure, impl_structural_identity};

// -----------------------------------------------------------------------------
// AnnotatedType

/// A view over a class and all of its declared members.
///
/// Member views are built eagerly and shared as `Arc`, so looking one up
/// by key always yields the same object for a given `AnnotatedType`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use bk_reflect::Annotated;
/// use bk_reflect::cache::SharedObjectCache;
/// use bk_reflect::raw::{Annotation, Modifiers, RawClass, RawField};
/// use bk_reflect::view::AnnotatedType;
///
/// let cache = Arc::new(SharedObjectCache::new());
/// let base = RawClass::builder("shop.Base")
///     .annotation(Annotation::new("SessionScoped"))
///     .build();
/// let cart = RawClass::builder("shop.Cart")
///     .superclass(base)
///     .field(RawField::new("total", RawClass::primitive("int")).with_annotation(Annotation::new("Current")))
///     .build();
///
/// let view = AnnotatedType::new(cart, &cache);
/// assert_eq!(view.declared_fields_with("Current").count(), 1);
/// assert!(view.superclass().unwrap().is_annotation_present("SessionScoped"));
/// assert_eq!(view.type_closure().len(), 2);
/// ```
pub struct AnnotatedType {
    raw: Arc<RawClass>,
    tags: Arc<[Annotation]>,
    superclass: Option<Arc<AnnotatedType>>,
    fields: Box<[Arc<AnnotatedField>]>,
    methods: Box<[Arc<AnnotatedMethod>]>,
    constructors: Box<[Arc<AnnotatedConstructor>]>,
    closure: LazyClosure,
}

impl AnnotatedType {
    /// Builds a standalone view, superclass views included.
    ///
    /// Views built this way are equal to the canonical ones but are not
    /// the same objects; use a [`ClassTransformer`] to get interned views.
    ///
    /// [`ClassTransformer`]: crate::transformer::ClassTransformer
    pub fn new(raw: Arc<RawClass>, cache: &Arc<SharedObjectCache>) -> Self {
        let superclass = raw
            .superclass()
            .map(|s| Arc::new(AnnotatedType::new(s.clone(), cache)));
        Self::with_superclass(raw, superclass, cache)
    }

    pub(crate) fn with_superclass(
        raw: Arc<RawClass>,
        superclass: Option<Arc<AnnotatedType>>,
        cache: &Arc<SharedObjectCache>,
    ) -> Self {
        let key = raw.key();
        let fields = raw
            .fields()
            .iter()
            .map(|f| Arc::new(AnnotatedField::new(key, f, cache)))
            .collect();
        let methods = raw
            .methods()
            .iter()
            .map(|m| Arc::new(AnnotatedMethod::new(key, m, cache)))
            .collect();
        let constructors = raw
            .constructors()
            .iter()
            .map(|c| Arc::new(AnnotatedConstructor::new(&raw, c, cache)))
            .collect();

        Self {
            tags: cache.shared_tags(raw.annotations()),
            superclass,
            fields,
            methods,
            constructors,
            closure: LazyClosure::new(cache),
            raw,
        }
    }

    #[inline]
    pub fn key(&self) -> &TypeKey {
        self.raw.key()
    }

    #[inline]
    pub fn simple_name(&self) -> &str {
        self.raw.simple_name()
    }

    #[inline]
    pub fn modifiers(&self) -> Modifiers {
        self.raw.modifiers()
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.modifiers().contains(Modifiers::ABSTRACT)
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.modifiers().contains(Modifiers::FINAL)
    }

    #[inline]
    pub fn is_interface(&self) -> bool {
        self.modifiers().contains(Modifiers::INTERFACE)
    }

    /// A nested class bound to an instance of its enclosing class.
    #[inline]
    pub fn is_inner_instance(&self) -> bool {
        self.modifiers().is_inner_instance()
    }

    #[inline]
    pub fn superclass(&self) -> Option<&Arc<AnnotatedType>> {
        self.superclass.as_ref()
    }

    /// Iterates over `self` and then its superclasses, nearest first.
    pub fn hierarchy(&self) -> impl Iterator<Item = &AnnotatedType> {
        core::iter::successors(Some(self), |t| t.superclass().map(|s| &**s))
    }

    #[inline]
    pub fn fields(&self) -> &[Arc<AnnotatedField>] {
        &self.fields
    }

    #[inline]
    pub fn methods(&self) -> &[Arc<AnnotatedMethod>] {
        &self.methods
    }

    #[inline]
    pub fn constructors(&self) -> &[Arc<AnnotatedConstructor>] {
        &self.constructors
    }

    /// Returns the declared field with the given name.
    pub fn field(&self, name: &str) -> Option<&Arc<AnnotatedField>> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Returns the declared method with the given name and signature.
    pub fn method(&self, name: &str, signature: &[TypeKey]) -> Option<&Arc<AnnotatedMethod>> {
        self.methods
            .iter()
            .find(|m| m.name() == name && m.key().signature() == signature)
    }

    /// Returns the declared constructor with the given signature.
    pub fn constructor(&self, signature: &[TypeKey]) -> Option<&Arc<AnnotatedConstructor>> {
        self.constructors
            .iter()
            .find(|c| c.key().signature() == signature)
    }

    /// Returns the parameter list owner designated by `key`.
    ///
    /// Fields own no parameters and yield `None`.
    pub fn callable_parameters(&self, key: &MemberKey) -> Option<&[Arc<AnnotatedParameter>]> {
        if key.declaring() != self.key() {
            return None;
        }
        match key.kind() {
            MemberKind::Field => None,
            MemberKind::Method => self
                .method(key.name(), key.signature())
                .map(|m| m.parameters()),
            MemberKind::Constructor => self.constructor(key.signature()).map(|c| c.parameters()),
        }
    }

    pub fn declared_fields_with<'a>(
        &'a self,
        tag: &'a str,
    ) -> impl Iterator<Item = &'a Arc<AnnotatedField>> + 'a {
        self.fields
            .iter()
            .filter(move |f| f.is_annotation_present(tag))
    }

    pub fn declared_methods_with<'a>(
        &'a self,
        tag: &'a str,
    ) -> impl Iterator<Item = &'a Arc<AnnotatedMethod>> + 'a {
        self.methods
            .iter()
            .filter(move |m| m.is_annotation_present(tag))
    }

    /// Returns the parameters of declared methods carrying the given tag.
    pub fn declared_method_parameters_with<'a>(
        &'a self,
        tag: &'a str,
    ) -> impl Iterator<Item = &'a Arc<AnnotatedParameter>> + 'a {
        self.methods
            .iter()
            .flat_map(move |m| m.parameters_with(tag))
    }

    /// Returns the constructor without parameters, if the class has one.
    ///
    /// A class declaring no constructor has an implicit public one, which
    /// is reported as `Some(Modifiers::PUBLIC)`.
    pub fn no_args_constructor_modifiers(&self) -> Option<Modifiers> {
        self.raw.no_args_constructor().map(|c| c.modifiers())
    }
}

impl Annotated for AnnotatedType {
    #[inline]
    fn raw_type(&self) -> &Arc<RawClass> {
        &self.raw
    }

    #[inline]
    fn declared_tags(&self) -> &[Annotation] {
        &self.tags
    }

    #[inline]
    fn type_closure(&self) -> &TypeClosure {
        self.closure.get(&self.raw)
    }

    #[inline]
    fn annotated_element(&self) -> Option<AnnotatedElement<'_>> {
        Some(AnnotatedElement::Type(&self.raw))
    }

    #[inline]
    fn name(&self) -> &str {
        self.raw.name()
    }
}

impl_structural_identity!(AnnotatedType);

impl fmt::Debug for AnnotatedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotatedType")
            .field("key", self.key())
            .field("tags", &self.tags)
            .field("fields", &self.fields.len())
            .field("methods", &self.methods.len())
            .field("constructors", &self.constructors.len())
            .finish()
    }
}
