use super::{MetaKind, ScopeModel};
use crate::tags;

// -----------------------------------------------------------------------------
// MetaRegistration

/// A tag type submitted at link time.
///
/// With the `auto_register` feature, registrations are collected through
/// `inventory` and picked up by
/// [`MetaAnnotationStore::auto_register`](super::MetaAnnotationStore::auto_register).
///
/// ```ignore
/// bk_bean::meta::__inventory::submit! {
///     bk_bean::meta::MetaRegistration::scope("FlowScoped", true, true)
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaRegistration {
    pub name: &'static str,
    pub kind: RegistrationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationKind {
    Binding,
    Scope(ScopeModel),
    DeploymentType,
    InterceptorBinding,
}

impl RegistrationKind {
    pub const fn meta_kind(self) -> MetaKind {
        match self {
            Self::Binding => MetaKind::Binding,
            Self::Scope(_) => MetaKind::Scope,
            Self::DeploymentType => MetaKind::DeploymentType,
            Self::InterceptorBinding => MetaKind::InterceptorBinding,
        }
    }
}

impl MetaRegistration {
    pub const fn binding(name: &'static str) -> Self {
        Self {
            name,
            kind: RegistrationKind::Binding,
        }
    }

    pub const fn scope(name: &'static str, normal: bool, passivating: bool) -> Self {
        Self {
            name,
            kind: RegistrationKind::Scope(ScopeModel::new(normal, passivating)),
        }
    }

    pub const fn deployment_type(name: &'static str) -> Self {
        Self {
            name,
            kind: RegistrationKind::DeploymentType,
        }
    }

    pub const fn interceptor_binding(name: &'static str) -> Self {
        Self {
            name,
            kind: RegistrationKind::InterceptorBinding,
        }
    }
}

/// The tag types every container knows about.
pub(crate) const BUILTIN: &[MetaRegistration] = &[
    MetaRegistration::binding(tags::CURRENT),
    MetaRegistration::binding(tags::ANY),
    MetaRegistration::binding(tags::NAMED),
    MetaRegistration::scope(tags::DEPENDENT, false, false),
    MetaRegistration::scope(tags::REQUEST_SCOPED, true, false),
    MetaRegistration::scope(tags::APPLICATION_SCOPED, true, false),
    MetaRegistration::scope(tags::SESSION_SCOPED, true, true),
    MetaRegistration::scope(tags::CONVERSATION_SCOPED, true, true),
    MetaRegistration::deployment_type(tags::STANDARD),
    MetaRegistration::deployment_type(tags::PRODUCTION),
];

#[cfg(feature = "auto_register")]
inventory::collect!(MetaRegistration);
