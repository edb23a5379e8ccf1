use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::key::TypeKey;
use crate::raw::{Annotation, Modifiers, RawClass};

// -----------------------------------------------------------------------------
// RawField

/// A field declared on a [`RawClass`].
#[derive(Debug, Clone)]
pub struct RawField {
    name: Arc<str>,
    ty: Arc<RawClass>,
    modifiers: Modifiers,
    annotations: Vec<Annotation>,
}

impl RawField {
    /// Creates a field with no modifier and no annotation.
    pub fn new(name: impl Into<Arc<str>>, ty: Arc<RawClass>) -> Self {
        Self {
            name: name.into(),
            ty,
            modifiers: Modifiers::empty(),
            annotations: Vec::new(),
        }
    }

    #[inline]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[inline]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type of the field.
    #[inline]
    pub fn ty(&self) -> &Arc<RawClass> {
        &self.ty
    }

    #[inline]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    #[inline]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

// -----------------------------------------------------------------------------
// RawParameter

/// A parameter of a [`RawMethod`] or [`RawConstructor`].
#[derive(Debug, Clone)]
pub struct RawParameter {
    ty: Arc<RawClass>,
    annotations: Vec<Annotation>,
}

impl RawParameter {
    pub fn new(ty: Arc<RawClass>) -> Self {
        Self {
            ty,
            annotations: Vec::new(),
        }
    }

    #[inline]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[inline]
    pub fn ty(&self) -> &Arc<RawClass> {
        &self.ty
    }

    #[inline]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// The erased parameter types of a callable, used as its signature.
fn signature_of(parameters: &[RawParameter]) -> Arc<[TypeKey]> {
    parameters.iter().map(|p| p.ty.key().clone()).collect()
}

// -----------------------------------------------------------------------------
// RawMethod

/// A method declared on a [`RawClass`].
#[derive(Debug, Clone)]
pub struct RawMethod {
    name: Arc<str>,
    return_type: Arc<RawClass>,
    modifiers: Modifiers,
    annotations: Vec<Annotation>,
    parameters: Vec<RawParameter>,
}

impl RawMethod {
    pub fn new(name: impl Into<Arc<str>>, return_type: Arc<RawClass>) -> Self {
        Self {
            name: name.into(),
            return_type,
            modifiers: Modifiers::empty(),
            annotations: Vec::new(),
            parameters: Vec::new(),
        }
    }

    #[inline]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[inline]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[inline]
    pub fn with_parameter(mut self, parameter: RawParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn return_type(&self) -> &Arc<RawClass> {
        &self.return_type
    }

    #[inline]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    #[inline]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    #[inline]
    pub fn parameters(&self) -> &[RawParameter] {
        &self.parameters
    }

    /// Returns the parameter types, in declaration order.
    pub fn signature(&self) -> Arc<[TypeKey]> {
        signature_of(&self.parameters)
    }
}

// -----------------------------------------------------------------------------
// RawConstructor

/// A constructor declared on a [`RawClass`].
#[derive(Debug, Clone, Default)]
pub struct RawConstructor {
    modifiers: Modifiers,
    annotations: Vec<Annotation>,
    parameters: Vec<RawParameter>,
}

impl RawConstructor {
    /// Creates a constructor without parameters.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[inline]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[inline]
    pub fn with_parameter(mut self, parameter: RawParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[inline]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    #[inline]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    #[inline]
    pub fn parameters(&self) -> &[RawParameter] {
        &self.parameters
    }

    pub fn signature(&self) -> Arc<[TypeKey]> {
        signature_of(&self.parameters)
    }
}
