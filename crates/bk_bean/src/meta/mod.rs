//! Classification of tag types.
//!
//! Tags are plain names on the raw model. Whether a tag is a binding, a
//! scope, a deployment type or a stereotype is decided by the
//! [`MetaAnnotationStore`], filled from configuration, from tag types
//! described by the class source, and, with the `auto_register` feature,
//! from registrations collected at link time.
//!
//! ## Menu
//!
//! - [`MetaKind`]: the role of a tag type.
//! - [`ScopeModel`], [`BindingModel`], [`StereotypeModel`]: per-role models.
//! - [`PolicyContribution`]: what a stereotype contributes to a definition.
//! - [`MetaAnnotationStore`]: the registry of all of the above.
//! - [`MetaRegistration`]: a statically submitted tag type.

// -----------------------------------------------------------------------------
// Modules

mod model;
mod registration;
mod store;

// -----------------------------------------------------------------------------
// Exports

pub use model::{BindingModel, MetaKind, PolicyContribution, ScopeModel, StereotypeModel};
pub use registration::{MetaRegistration, RegistrationKind};
pub use store::MetaAnnotationStore;

#[cfg(feature = "auto_register")]
#[doc(hidden)]
pub use inventory as __inventory;
