//! Building and validating component definitions.
//!
//! A [`DefinitionBuilder`] runs the fixed initialization sequence of
//! [`InitStep`] over a [`DefinitionStrategy`], the part that differs
//! between lifecycle categories, and produces an immutable
//! [`ComponentDefinition`].
//!
//! ## Menu
//!
//! - [`DefinitionId`], [`DefinitionKind`], [`DefinitionElement`]: identity,
//!   category and source view of a definition.
//! - [`DefinitionStrategy`]: category-specific steps, implemented by
//!   [`ManagedStrategy`], [`DecoratorStrategy`], [`ProducerMethodStrategy`],
//!   [`ProducerFieldStrategy`] and [`BuiltInStrategy`].
//! - [`DefinitionBuilder`], [`InitStep`]: the initialization sequence.
//! - [`ComponentDefinition`], [`DependencyResolver`]: the result.

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod builtin;
mod component;
mod managed;
mod producer;
mod strategy;

// -----------------------------------------------------------------------------
// Exports

pub use builder::{DefinitionBuilder, InitStep, resolve_default_bindings};
pub use builtin::BuiltInStrategy;
pub use component::{ComponentDefinition, DefinitionFlags, DependencyResolver};
pub use managed::{DecoratorStrategy, ManagedStrategy};
pub use producer::{ProducerFieldStrategy, ProducerMethodStrategy};
pub use strategy::{DefinitionStrategy, decapitalize, is_proxyable_class};

// -----------------------------------------------------------------------------
// DefinitionId

use alloc::sync::Arc;
use core::fmt;

use bk_reflect::view::{AnnotatedField, AnnotatedMethod, AnnotatedType};
use bk_reflect::{Annotated, MemberKey, TypeKey};

/// Identity of a definition.
///
/// Class-based definitions are identified by their class, producers by the
/// producing member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DefinitionId {
    Class(TypeKey),
    Member(MemberKey),
}

impl fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(key) => fmt::Display::fmt(key, f),
            Self::Member(key) => fmt::Display::fmt(key, f),
        }
    }
}

// -----------------------------------------------------------------------------
// DefinitionKind

/// The lifecycle category of a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Managed,
    Decorator,
    ProducerMethod,
    ProducerField,
    BuiltIn,
}

impl DefinitionKind {
    #[inline]
    pub const fn is_decorator(self) -> bool {
        matches!(self, Self::Decorator)
    }

    #[inline]
    pub const fn is_producer(self) -> bool {
        matches!(self, Self::ProducerMethod | Self::ProducerField)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Managed => "managed",
            Self::Decorator => "decorator",
            Self::ProducerMethod => "producer method",
            Self::ProducerField => "producer field",
            Self::BuiltIn => "built-in",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// DefinitionElement

/// The metadata view a definition was built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DefinitionElement {
    Type(Arc<AnnotatedType>),
    Method(Arc<AnnotatedMethod>),
    Field(Arc<AnnotatedField>),
}

impl DefinitionElement {
    pub fn annotated(&self) -> &dyn Annotated {
        match self {
            Self::Type(ty) => &**ty,
            Self::Method(method) => &**method,
            Self::Field(field) => &**field,
        }
    }

    pub fn as_type(&self) -> Option<&Arc<AnnotatedType>> {
        match self {
            Self::Type(ty) => Some(ty),
            _ => None,
        }
    }
}
