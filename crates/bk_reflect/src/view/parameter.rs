use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use crate::cache::{SharedObjectCache, TypeClosure};
use crate::key::{MemberKey, ParameterKey};
use crate::raw::{Annotation, RawClass, RawParameter};
use crate::view::{Annotated, AnnotatedElement, LazyClosure, impl_structural_identity};

// -----------------------------------------------------------------------------
// AnnotatedParameter

/// A view over a parameter, identified by its callable and position.
///
/// A parameter has no reflective handle of its own, so
/// [`annotated_element`](Annotated::annotated_element) returns `None`.
pub struct AnnotatedParameter {
    key: ParameterKey,
    ty: Arc<RawClass>,
    name: String,
    tags: Arc<[Annotation]>,
    closure: LazyClosure,
}

impl AnnotatedParameter {
    pub fn new(
        callable: MemberKey,
        position: u16,
        raw: &RawParameter,
        cache: &Arc<SharedObjectCache>,
    ) -> Self {
        Self {
            key: ParameterKey::new(callable, position),
            ty: raw.ty().clone(),
            name: format!("arg{position}"),
            tags: cache.shared_tags(raw.annotations()),
            closure: LazyClosure::new(cache),
        }
    }

    #[inline]
    pub fn key(&self) -> &ParameterKey {
        &self.key
    }

    #[inline]
    pub fn callable(&self) -> &MemberKey {
        self.key.callable()
    }

    #[inline]
    pub fn position(&self) -> u16 {
        self.key.position()
    }
}

impl Annotated for AnnotatedParameter {
    #[inline]
    fn raw_type(&self) -> &Arc<RawClass> {
        &self.ty
    }

    #[inline]
    fn declared_tags(&self) -> &[Annotation] {
        &self.tags
    }

    #[inline]
    fn type_closure(&self) -> &TypeClosure {
        self.closure.get(&self.ty)
    }

    #[inline]
    fn annotated_element(&self) -> Option<AnnotatedElement<'_>> {
        None
    }

    #[inline]
    fn name(&self) -> &str {
        &self.name
    }
}

impl_structural_identity!(AnnotatedParameter);

impl fmt::Debug for AnnotatedParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotatedParameter")
            .field("key", &self.key)
            .field("type", self.ty.key())
            .field("tags", &self.tags)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
