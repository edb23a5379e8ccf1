//! Reflective metadata views.
//!
//! A view wraps one raw program element and answers the capability
//! queries of [`Annotated`]. Views compare and hash by their structural
//! key only: two views built independently over the same element are
//! interchangeable in collections, even though only the ones handed out
//! by the [`ClassTransformer`](crate::transformer::ClassTransformer) are
//! the same object.
//!
//! ## Menu
//!
//! - [`Annotated`]: the capability query trait.
//! - [`AnnotatedElement`]: the raw handle behind a view, if any.
//! - [`AnnotatedType`]: a class with its members.
//! - [`AnnotatedField`], [`AnnotatedMethod`], [`AnnotatedConstructor`]: members.
//! - [`AnnotatedParameter`]: a parameter, identified by callable and position.

// -----------------------------------------------------------------------------
// Modules

mod callable;
mod field;
mod parameter;
mod ty;

// -----------------------------------------------------------------------------
// Exports

pub use callable::{AnnotatedConstructor, AnnotatedMethod};
pub use field::AnnotatedField;
pub use parameter::AnnotatedParameter;
pub use ty::AnnotatedType;

// -----------------------------------------------------------------------------
// Annotated

use alloc::sync::Arc;
use core::fmt::Debug;
use std::sync::OnceLock;

use crate::cache::{SharedObjectCache, TypeClosure};
use crate::key::TypeKey;
use crate::raw::{Annotation, Modifiers, RawClass, RawConstructor, RawField, RawMethod};

/// The raw handle wrapped by a view.
#[derive(Debug, Clone, Copy)]
pub enum AnnotatedElement<'a> {
    Type(&'a RawClass),
    Field(&'a RawField),
    Method(&'a RawMethod),
    Constructor(&'a RawConstructor),
}

/// Capability queries over a program element.
///
/// Definition building only ever talks to this trait, never to the raw
/// model directly.
pub trait Annotated: Debug + Send + Sync {
    /// The class of the element: the type itself, the type of a field or
    /// parameter, the return type of a method, the class built by a
    /// constructor.
    fn raw_type(&self) -> &Arc<RawClass>;

    /// The tags declared directly on the element, sorted.
    fn declared_tags(&self) -> &[Annotation];

    /// The flattened hierarchy of [`raw_type`](Annotated::raw_type).
    ///
    /// Computed on first call and shared through the [`SharedObjectCache`].
    fn type_closure(&self) -> &TypeClosure;

    /// The raw handle, for consumers that need direct access.
    /// Parameters have none.
    fn annotated_element(&self) -> Option<AnnotatedElement<'_>>;

    /// The name of the element. Parameters are named `arg{position}`.
    fn name(&self) -> &str;

    /// Returns the declared tag of the given type.
    fn annotation(&self, ty: &str) -> Option<&Annotation> {
        self.declared_tags().iter().find(|a| a.ty() == ty)
    }

    fn is_annotation_present(&self, ty: &str) -> bool {
        self.annotation(ty).is_some()
    }

    fn is_primitive(&self) -> bool {
        self.raw_type().modifiers().contains(Modifiers::PRIMITIVE)
    }

    /// See [`TypeClosure::is_serializable`].
    fn is_serializable(&self) -> bool {
        self.type_closure().is_serializable()
    }

    /// Returns `true` if a value of this element's type can be used where
    /// `ty` is expected.
    fn is_assignable_to(&self, ty: &TypeKey) -> bool {
        self.type_closure().contains(ty)
    }
}

// -----------------------------------------------------------------------------
// Internal API

/// A type closure fetched from the shared cache on first access.
pub(crate) struct LazyClosure {
    cache: Arc<SharedObjectCache>,
    cell: OnceLock<Arc<TypeClosure>>,
}

impl LazyClosure {
    #[inline]
    pub(crate) fn new(cache: &Arc<SharedObjectCache>) -> Self {
        Self {
            cache: cache.clone(),
            cell: OnceLock::new(),
        }
    }

    #[inline]
    pub(crate) fn get(&self, class: &RawClass) -> &TypeClosure {
        self.cell.get_or_init(|| self.cache.type_closure(class))
    }
}

/// Implement `PartialEq`, `Eq` and `Hash` through the `key()` method.
macro_rules! impl_structural_identity {
    ($ty:ty) => {
        impl PartialEq for $ty {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.key() == other.key()
            }
        }

        impl Eq for $ty {}

        impl ::core::hash::Hash for $ty {
            #[inline]
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                ::core::hash::Hash::hash(self.key(), state);
            }
        }
    };
}

pub(crate) use impl_structural_identity;
