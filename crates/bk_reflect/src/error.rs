use alloc::string::String;

use thiserror::Error;

use crate::key::{MemberKey, ParameterKey, TypeKey};

// -----------------------------------------------------------------------------
// ProxyError

/// Failure to persist or restore a metadata view.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProxyError {
    #[error("{view} wraps a reflective handle and can only be restored through its serialization proxy (proxy required)")]
    ProxyRequired { view: &'static str },

    #[error("Type {0} is unknown to the class transformer and its class source")]
    UnknownType(TypeKey),

    #[error("Member {0} is not declared by its type")]
    UnknownMember(MemberKey),

    #[error("Parameter {0} is out of range for its callable")]
    UnknownParameter(ParameterKey),

    #[error("Proxy token resolved to a {found}, expected a {expected}")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

// -----------------------------------------------------------------------------
// InvariantViolation

/// A broken assumption about the collaborators of this crate.
///
/// These are programming errors: a correct type system never produces them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvariantViolation {
    #[error("Cache entry for {requested} holds the structural identity {found}")]
    IdentityMismatch { requested: String, found: String },

    #[error("Callable {callable} declares {count} parameters, more than a position can address")]
    ParameterOverflow { callable: String, count: usize },
}

impl InvariantViolation {
    #[cold]
    #[inline(never)]
    pub fn handle_error(&self) -> ! {
        panic!("{self}");
    }
}
