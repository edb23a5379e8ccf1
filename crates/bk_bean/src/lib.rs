//! Component-definition resolution for the Beankit container.
//!
//! Given the metadata views of [`bk_reflect`], this crate derives and
//! validates everything the runtime resolver needs to know about a
//! component: its bindings, name, scope, deployment type, proxy
//! eligibility, serializability, injection points and specialization.
//!
//! ## Menu
//!
//! - [`config`]: the container configuration loaded before bootstrap.
//! - [`meta`]: the [`MetaAnnotationStore`] classifying tag types.
//! - [`stereotype`]: merging the policy contributions of stereotypes.
//! - [`deployment`]: the ordered list of enabled deployment types.
//! - [`injection`]: dependency request sites.
//! - [`specialization`]: the predecessor to successor map.
//! - [`definition`]: the builder, its strategies and the resulting
//!   [`ComponentDefinition`].
//! - [`environment`]: the services a build runs against.
//! - [`registry`]: the output registry and typesafe resolution.
//!
//! [`MetaAnnotationStore`]: meta::MetaAnnotationStore
//! [`ComponentDefinition`]: definition::ComponentDefinition
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

pub mod config;
pub mod definition;
pub mod deployment;
pub mod environment;
pub mod injection;
pub mod meta;
pub mod registry;
pub mod specialization;
pub mod stereotype;
pub mod tags;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::DefinitionError;
