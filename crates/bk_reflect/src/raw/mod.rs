//! The raw type model supplied by the type-system collaborator.
//!
//! These structs are plain descriptions of classes and their members.
//! They are shared through [`Arc`](alloc::sync::Arc) and are never
//! serialized; persisting anything that refers to them goes through
//! the [proxy protocol](crate::serde).

// -----------------------------------------------------------------------------
// Modules

mod annotation;
mod class;
mod member;
mod modifiers;
mod source;

// -----------------------------------------------------------------------------
// Exports

pub use annotation::Annotation;
pub use class::{RawClass, RawClassBuilder};
pub use member::{RawConstructor, RawField, RawMethod, RawParameter};
pub use modifiers::Modifiers;
pub use source::{ClassSet, ClassSource};
