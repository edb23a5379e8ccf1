use alloc::sync::Arc;
use core::fmt;

use crate::cache::{SharedObjectCache, TypeClosure};
use crate::key::{MemberKey, TypeKey};
use crate::raw::{Annotation, Modifiers, RawClass, RawField};
use crate::view::{Annotated, AnnotatedElement, LazyClosure, impl_structural_identity};

// -----------------------------------------------------------------------------
// AnnotatedField

/// A view over a field, identified by declaring type and field name.
///
/// # Example
///
/// ```
/// use core::hash::BuildHasher;
/// use std::sync::Arc;
/// use bk_reflect::{Annotated, TypeKey};
/// use bk_reflect::cache::SharedObjectCache;
/// use bk_reflect::raw::{Annotation, RawClass, RawField};
/// use bk_reflect::view::AnnotatedField;
/// use bk_utils::hash::FixedHashState;
///
/// let cache = Arc::new(SharedObjectCache::new());
/// let raw = RawField::new("items", RawClass::builder("shop.Items").build())
///     .with_annotation(Annotation::new("Current"));
/// let declaring = TypeKey::new("shop.Cart");
///
/// let a = AnnotatedField::new(&declaring, &raw, &cache);
/// let b = AnnotatedField::new(&declaring, &raw.clone().with_annotation(Annotation::new("X")), &cache);
/// assert_eq!(a, b); // tags never take part in identity
/// assert_eq!(FixedHashState.hash_one(&a), FixedHashState.hash_one(&b));
/// assert!(a.is_annotation_present("Current"));
/// ```
pub struct AnnotatedField {
    key: MemberKey,
    raw: RawField,
    tags: Arc<[Annotation]>,
    closure: LazyClosure,
}

impl AnnotatedField {
    pub fn new(declaring: &TypeKey, raw: &RawField, cache: &Arc<SharedObjectCache>) -> Self {
        Self {
            key: MemberKey::field(declaring.clone(), raw.name()),
            raw: raw.clone(),
            tags: cache.shared_tags(raw.annotations()),
            closure: LazyClosure::new(cache),
        }
    }

    #[inline]
    pub fn key(&self) -> &MemberKey {
        &self.key
    }

    #[inline]
    pub fn declaring(&self) -> &TypeKey {
        self.key.declaring()
    }

    #[inline]
    pub fn modifiers(&self) -> Modifiers {
        self.raw.modifiers()
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.modifiers().contains(Modifiers::STATIC)
    }

    #[inline]
    pub fn is_transient(&self) -> bool {
        self.modifiers().contains(Modifiers::TRANSIENT)
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.modifiers().contains(Modifiers::PUBLIC)
    }
}

impl Annotated for AnnotatedField {
    #[inline]
    fn raw_type(&self) -> &Arc<RawClass> {
        self.raw.ty()
    }

    #[inline]
    fn declared_tags(&self) -> &[Annotation] {
        &self.tags
    }

    #[inline]
    fn type_closure(&self) -> &TypeClosure {
        self.closure.get(self.raw.ty())
    }

    #[inline]
    fn annotated_element(&self) -> Option<AnnotatedElement<'_>> {
        Some(AnnotatedElement::Field(&self.raw))
    }

    #[inline]
    fn name(&self) -> &str {
        self.raw.name()
    }
}

impl_structural_identity!(AnnotatedField);

impl fmt::Debug for AnnotatedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotatedField")
            .field("key", &self.key)
            .field("type", self.raw.ty().key())
            .field("tags", &self.tags)
            .finish()
    }
}
