//! Dependency request sites.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use bk_reflect::cache::SharedObjectCache;
use bk_reflect::raw::Annotation;
use bk_reflect::view::{AnnotatedField, AnnotatedParameter};
use bk_reflect::{Annotated, TypeKey};

use crate::definition::DefinitionId;
use crate::meta::{MetaAnnotationStore, MetaKind};
use crate::tags;

// -----------------------------------------------------------------------------
// InjectionPoint

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InjectionPointKind {
    Field,
    Parameter,
}

/// The view an injection point is declared on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InjectionElement {
    Field(Arc<AnnotatedField>),
    Parameter(Arc<AnnotatedParameter>),
}

/// A field or parameter the container fills with a dependency.
///
/// The dependency itself is found by the runtime resolver, matching the
/// [required type](Self::required_type) and [bindings](Self::bindings)
/// against the registered definitions.
#[derive(Debug, Clone)]
pub struct InjectionPoint {
    element: InjectionElement,
    owner: DefinitionId,
    bindings: Arc<[Annotation]>,
    decoration_point: bool,
}

impl InjectionPoint {
    /// Creates the injection point of `element` for the definition `owner`.
    ///
    /// The required bindings are the binding tags of the element, or
    /// [`Current`](tags::CURRENT) if it declares none.
    pub fn new(
        element: InjectionElement,
        owner: DefinitionId,
        store: &MetaAnnotationStore,
        cache: &SharedObjectCache,
    ) -> Self {
        let (declared, decoration_point) = {
            let annotated = annotated(&element);
            (
                store
                    .filter(annotated.declared_tags(), MetaKind::Binding)
                    .cloned()
                    .collect::<Vec<_>>(),
                annotated.is_annotation_present(tags::DECORATES),
            )
        };

        let bindings = if declared.is_empty() {
            cache.shared_tags(&[Annotation::new(tags::CURRENT)])
        } else {
            cache.shared_tags(&declared)
        };

        Self {
            element,
            owner,
            bindings,
            decoration_point,
        }
    }

    pub fn kind(&self) -> InjectionPointKind {
        match &self.element {
            InjectionElement::Field(_) => InjectionPointKind::Field,
            InjectionElement::Parameter(_) => InjectionPointKind::Parameter,
        }
    }

    #[inline]
    pub fn element(&self) -> &InjectionElement {
        &self.element
    }

    pub fn annotated(&self) -> &dyn Annotated {
        annotated(&self.element)
    }

    /// The definition declaring this injection point.
    #[inline]
    pub fn owner(&self) -> &DefinitionId {
        &self.owner
    }

    #[inline]
    pub fn required_type(&self) -> &TypeKey {
        self.annotated().raw_type().key()
    }

    #[inline]
    pub fn bindings(&self) -> &[Annotation] {
        &self.bindings
    }

    /// The point receives the instance a decorator decorates.
    #[inline]
    pub fn is_decoration_point(&self) -> bool {
        self.decoration_point
    }

    /// A transient field is skipped when its owner is serialized.
    /// Parameters are never transient.
    pub fn is_transient(&self) -> bool {
        match &self.element {
            InjectionElement::Field(field) => field.is_transient(),
            InjectionElement::Parameter(_) => false,
        }
    }
}

impl fmt::Display for InjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.element {
            InjectionElement::Field(field) => write!(f, "field {}", field.key()),
            InjectionElement::Parameter(param) => write!(f, "parameter {}", param.key()),
        }
    }
}

fn annotated(element: &InjectionElement) -> &dyn Annotated {
    match element {
        InjectionElement::Field(field) => &**field,
        InjectionElement::Parameter(param) => &**param,
    }
}

// -----------------------------------------------------------------------------
// Tests
