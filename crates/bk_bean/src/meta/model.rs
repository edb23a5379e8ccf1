use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use bk_reflect::TypeKey;
use bk_reflect::raw::Annotation;

use super::MetaAnnotationStore;
use crate::DefinitionError;
use crate::tags;

// -----------------------------------------------------------------------------
// MetaKind

/// The role of a tag type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaKind {
    Binding,
    Scope,
    DeploymentType,
    Stereotype,
    InterceptorBinding,
}

impl MetaKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Binding => "binding",
            Self::Scope => "scope",
            Self::DeploymentType => "deployment type",
            Self::Stereotype => "stereotype",
            Self::InterceptorBinding => "interceptor binding",
        }
    }
}

impl fmt::Display for MetaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// ScopeModel

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScopeModel {
    normal: bool,
    passivating: bool,
}

impl ScopeModel {
    pub const PSEUDO: Self = Self::new(false, false);

    #[inline]
    pub const fn new(normal: bool, passivating: bool) -> Self {
        Self {
            normal,
            passivating,
        }
    }

    #[inline]
    pub const fn is_normal(self) -> bool {
        self.normal
    }

    #[inline]
    pub const fn is_passivating(self) -> bool {
        self.passivating
    }
}

// -----------------------------------------------------------------------------
// BindingModel

/// A binding type and the members ignored when two instances are matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingModel {
    non_binding: Box<[Arc<str>]>,
}

impl BindingModel {
    pub fn new<I, S>(non_binding: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self {
            non_binding: non_binding.into_iter().map(Into::into).collect(),
        }
    }

    pub fn non_binding(&self) -> impl ExactSizeIterator<Item = &str> {
        self.non_binding.iter().map(|s| &**s)
    }

    /// Returns `true` if `candidate` satisfies the `required` binding.
    pub fn matches(&self, required: &Annotation, candidate: &Annotation) -> bool {
        let ignored: Vec<&str> = self.non_binding().collect();
        required.matches_ignoring(candidate, &ignored)
    }
}

// -----------------------------------------------------------------------------
// PolicyContribution

/// What a stereotype contributes to the definitions carrying it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyContribution {
    pub scope: Option<Arc<str>>,
    pub deployment_type: Option<Arc<str>>,
    pub name_defaulted: bool,
    pub required_types: Box<[TypeKey]>,
}

// -----------------------------------------------------------------------------
// StereotypeModel

/// A validated stereotype.
///
/// A stereotype declares at most one scope and at most one deployment
/// type, may carry [`Named`](tags::NAMED) only without a value, and
/// declares no other binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StereotypeModel {
    name: Arc<str>,
    contribution: PolicyContribution,
}

impl StereotypeModel {
    /// Validates the tags declared on a stereotype.
    ///
    /// Tags the store does not classify, and interceptor bindings, are
    /// ignored.
    pub fn from_tags(
        name: impl Into<Arc<str>>,
        declared: &[Annotation],
        required_types: Box<[TypeKey]>,
        store: &MetaAnnotationStore,
    ) -> Result<Self, DefinitionError> {
        let name: Arc<str> = name.into();
        let invalid = |reason| DefinitionError::InvalidStereotype {
            stereotype: name.clone(),
            reason,
        };

        let mut contribution = PolicyContribution {
            required_types,
            ..PolicyContribution::default()
        };

        for tag in declared {
            match store.kind_of(tag.ty()) {
                Some(MetaKind::Scope) => {
                    if contribution.scope.is_some() {
                        return Err(invalid("declares more than one scope"));
                    }
                    contribution.scope = Some(tag.ty().into());
                }
                Some(MetaKind::DeploymentType) => {
                    if contribution.deployment_type.is_some() {
                        return Err(invalid("declares more than one deployment type"));
                    }
                    contribution.deployment_type = Some(tag.ty().into());
                }
                Some(MetaKind::Binding) if tag.ty() == tags::NAMED => {
                    if tag.value().is_some_and(|v| !v.is_empty()) {
                        return Err(invalid("declares Named with a value"));
                    }
                    contribution.name_defaulted = true;
                }
                Some(MetaKind::Binding) => {
                    return Err(invalid("declares a binding other than Named"));
                }
                _ => {}
            }
        }

        Ok(Self { name, contribution })
    }

    /// Builds a stereotype from already-validated parts.
    pub fn new(name: impl Into<Arc<str>>, contribution: PolicyContribution) -> Self {
        Self {
            name: name.into(),
            contribution,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn contribution(&self) -> &PolicyContribution {
        &self.contribution
    }

    #[inline]
    pub fn default_scope(&self) -> Option<&Arc<str>> {
        self.contribution.scope.as_ref()
    }

    #[inline]
    pub fn default_deployment_type(&self) -> Option<&Arc<str>> {
        self.contribution.deployment_type.as_ref()
    }

    #[inline]
    pub fn is_name_defaulted(&self) -> bool {
        self.contribution.name_defaulted
    }

    #[inline]
    pub fn required_types(&self) -> &[TypeKey] {
        &self.contribution.required_types
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use bk_reflect::raw::Annotation;

    use super::{BindingModel, StereotypeModel};
    use crate::DefinitionError;
    use crate::meta::MetaAnnotationStore;
    use crate::tags;

    fn store() -> MetaAnnotationStore {
        MetaAnnotationStore::with_defaults()
    }

    #[test]
    fn stereotype_contribution() {
        let model = StereotypeModel::from_tags(
            "Action",
            &[
                Annotation::new(tags::REQUEST_SCOPED),
                Annotation::new(tags::NAMED),
                Annotation::new("Documented"),
            ],
            Box::new([]),
            &store(),
        )
        .unwrap();

        assert_eq!(model.default_scope().map(|s| &**s), Some(tags::REQUEST_SCOPED));
        assert!(model.default_deployment_type().is_none());
        assert!(model.is_name_defaulted());
    }

    #[test]
    fn stereotype_validation() {
        let store = store();
        let check = |declared: &[Annotation]| {
            StereotypeModel::from_tags("Bad", declared, Box::new([]), &store).unwrap_err()
        };

        let reason = |err: DefinitionError| match err {
            DefinitionError::InvalidStereotype { reason, .. } => reason,
            other => panic!("unexpected {other}"),
        };

        assert_eq!(
            reason(check(&[
                Annotation::new(tags::REQUEST_SCOPED),
                Annotation::new(tags::SESSION_SCOPED),
            ])),
            "declares more than one scope"
        );
        assert_eq!(
            reason(check(&[
                Annotation::new(tags::STANDARD),
                Annotation::new(tags::PRODUCTION),
            ])),
            "declares more than one deployment type"
        );
        assert_eq!(
            reason(check(&[Annotation::new(tags::NAMED).with_value("cart")])),
            "declares Named with a value"
        );
        assert_eq!(
            reason(check(&[Annotation::new(tags::CURRENT)])),
            "declares a binding other than Named"
        );
    }

    #[test]
    fn non_binding_members() {
        let model = BindingModel::new(["comment"]);
        let required = Annotation::new("Pay").with_member("kind", "card").with_member("comment", "a");
        let candidate = Annotation::new("Pay").with_member("kind", "card").with_member("comment", "b");
        let other = Annotation::new("Pay").with_member("kind", "cash");

        assert!(model.matches(&required, &candidate));
        assert!(!model.matches(&required, &other));
        assert!(!BindingModel::default().matches(&required, &candidate));
    }
}
