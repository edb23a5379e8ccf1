//! Reflective metadata views for the Beankit container.
//!
//! The container never touches a reflection API directly. An external
//! type-system collaborator describes the program with the [`raw`] model,
//! and everything downstream works against the [`Annotated`] capability
//! trait implemented by the views in [`view`].
//!
//! ## Menu
//!
//! - [`raw`]: the input model (`RawClass`, members, [`Annotation`], [`Modifiers`]).
//! - [`key`]: structural identities, the only thing views compare and hash by.
//! - [`cache`]: the [`SharedObjectCache`] interning type closures and tag sets.
//! - [`view`]: [`AnnotatedType`], [`AnnotatedField`], [`AnnotatedMethod`],
//!   [`AnnotatedConstructor`] and [`AnnotatedParameter`].
//! - [`transformer`]: the [`ClassTransformer`] handing out canonical views.
//! - [`serde`]: the serialization proxy protocol.
//!
//! [`Annotation`]: raw::Annotation
//! [`Modifiers`]: raw::Modifiers
//! [`SharedObjectCache`]: cache::SharedObjectCache
//! [`Annotated`]: view::Annotated
//! [`AnnotatedType`]: view::AnnotatedType
//! [`AnnotatedField`]: view::AnnotatedField
//! [`AnnotatedMethod`]: view::AnnotatedMethod
//! [`AnnotatedConstructor`]: view::AnnotatedConstructor
//! [`AnnotatedParameter`]: view::AnnotatedParameter
//! [`ClassTransformer`]: transformer::ClassTransformer
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// The process-wide caches lock with `std::sync`, std is always linked.
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod cache;
pub mod key;
pub mod raw;
pub mod serde;
pub mod transformer;
pub mod view;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::{InvariantViolation, ProxyError};
pub use key::{MemberKey, MemberKind, ParameterKey, TypeKey};
pub use view::Annotated;
