//! Merging the policy contributions of a definition's stereotypes.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::sync::Arc;

use bk_reflect::TypeKey;
use bk_reflect::raw::Annotation;

use crate::deployment::DeploymentTypes;
use crate::meta::MetaAnnotationStore;

// -----------------------------------------------------------------------------
// MergedStereotypes

/// The union of the contributions of every stereotype declared on a
/// definition.
///
/// Computed once per definition and not cached: stereotype combinations
/// are specific to the definition.
///
/// # Example
///
/// ```
/// use bk_bean::config::{ContainerConfig, StereotypeConfig};
/// use bk_bean::meta::MetaAnnotationStore;
/// use bk_bean::stereotype::MergedStereotypes;
/// use bk_reflect::raw::Annotation;
///
/// let mut config = ContainerConfig::default();
/// config.stereotypes.push(StereotypeConfig {
///     name: "Action".into(),
///     scope: Some("RequestScoped".into()),
///     named: true,
///     ..Default::default()
/// });
/// let store = MetaAnnotationStore::from_config(&config).unwrap();
///
/// let merged = MergedStereotypes::merge(&[Annotation::new("Action")], &store);
/// assert_eq!(merged.single_scope().as_deref(), Some("RequestScoped"));
/// assert!(merged.is_name_defaulted());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedStereotypes {
    possible_scopes: BTreeSet<Arc<str>>,
    possible_deployment_types: BTreeMap<Arc<str>, Arc<str>>,
    name_defaulted: bool,
    required_types: BTreeSet<TypeKey>,
}

impl MergedStereotypes {
    /// Merges the stereotypes among `declared`. Other tags are ignored.
    pub fn merge(declared: &[Annotation], store: &MetaAnnotationStore) -> Self {
        let mut merged = Self::default();
        for tag in declared {
            let Some(model) = store.stereotype_model(tag.ty()) else {
                continue;
            };
            let contribution = model.contribution();
            if let Some(scope) = &contribution.scope {
                merged.possible_scopes.insert(scope.clone());
            }
            if let Some(ty) = &contribution.deployment_type {
                merged
                    .possible_deployment_types
                    .insert(ty.clone(), model.name().into());
            }
            merged.name_defaulted |= contribution.name_defaulted;
            merged
                .required_types
                .extend(contribution.required_types.iter().cloned());
        }
        merged
    }

    /// Union of the stereotype scopes.
    pub fn possible_scopes(&self) -> &BTreeSet<Arc<str>> {
        &self.possible_scopes
    }

    /// The stereotype scope, if exactly one is contributed.
    pub fn single_scope(&self) -> Option<Arc<str>> {
        match self.possible_scopes.len() {
            1 => self.possible_scopes.first().cloned(),
            _ => None,
        }
    }

    /// More than one scope is contributed.
    #[inline]
    pub fn is_scope_ambiguous(&self) -> bool {
        self.possible_scopes.len() > 1
    }

    /// Deployment type to the stereotype contributing it.
    pub fn possible_deployment_types(&self) -> &BTreeMap<Arc<str>, Arc<str>> {
        &self.possible_deployment_types
    }

    /// The highest-priority contributed deployment type that is enabled.
    pub fn deployment_type(&self, enabled: &DeploymentTypes) -> Option<Arc<str>> {
        if self.possible_deployment_types.is_empty() {
            return None;
        }
        enabled.highest_priority_present(|ty| self.possible_deployment_types.contains_key(ty))
    }

    #[inline]
    pub fn is_name_defaulted(&self) -> bool {
        self.name_defaulted
    }

    pub fn required_types(&self) -> &BTreeSet<TypeKey> {
        &self.required_types
    }

    /// The contributed scopes, for error messages.
    pub(crate) fn scopes_label(&self) -> String {
        let mut label = String::new();
        for (i, scope) in self.possible_scopes.iter().enumerate() {
            if i > 0 {
                label.push_str(", ");
            }
            label.push_str(scope);
        }
        label
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::sync::Arc;

    use bk_reflect::TypeKey;
    use bk_reflect::raw::Annotation;

    use super::MergedStereotypes;
    use crate::deployment::DeploymentTypes;
    use crate::meta::{MetaAnnotationStore, PolicyContribution, StereotypeModel};
    use crate::tags;

    fn store() -> MetaAnnotationStore {
        let mut store = MetaAnnotationStore::with_defaults();
        store.register_deployment_type("Mock");
        store.register_deployment_type("Staging");
        let mut add = |name: &str, scope: Option<&str>, ty: Option<&str>, named: bool, required: &[&str]| {
            store.register_stereotype(StereotypeModel::new(
                name,
                PolicyContribution {
                    scope: scope.map(Arc::from),
                    deployment_type: ty.map(Arc::from),
                    name_defaulted: named,
                    required_types: required.iter().map(|t| TypeKey::new(*t)).collect::<Box<[_]>>(),
                },
            ));
        };
        add("Action", Some(tags::REQUEST_SCOPED), Some("Staging"), true, &[]);
        add("Wizard", Some(tags::CONVERSATION_SCOPED), Some("Mock"), false, &["shop.Flow"]);
        add("Tested", None, Some("Mock"), false, &["shop.Service"]);
        store
    }

    #[test]
    fn unions() {
        let store = store();
        let declared = [
            Annotation::new("Action"),
            Annotation::new("Wizard"),
            Annotation::new("Tested"),
            Annotation::new(tags::CURRENT),
        ];
        let merged = MergedStereotypes::merge(&declared, &store);

        assert_eq!(merged.possible_scopes().len(), 2);
        assert!(merged.is_scope_ambiguous());
        assert_eq!(merged.single_scope(), None);
        assert_eq!(merged.scopes_label(), "ConversationScoped, RequestScoped");
        assert!(merged.is_name_defaulted());
        assert_eq!(merged.required_types().len(), 2);
        assert_eq!(merged.possible_deployment_types().len(), 2);
    }

    #[test]
    fn deployment_type_by_priority() {
        let store = store();
        let declared = [Annotation::new("Action"), Annotation::new("Tested")];
        let merged = MergedStereotypes::merge(&declared, &store);

        let enabled = DeploymentTypes::new(["Standard", "Production", "Mock", "Staging"]);
        assert_eq!(merged.deployment_type(&enabled).as_deref(), Some("Staging"));

        let enabled = DeploymentTypes::new(["Standard", "Production", "Staging", "Mock"]);
        assert_eq!(merged.deployment_type(&enabled).as_deref(), Some("Mock"));

        let enabled = DeploymentTypes::default();
        assert_eq!(merged.deployment_type(&enabled), None);
    }

    #[test]
    fn empty() {
        let merged = MergedStereotypes::merge(&[Annotation::new(tags::NAMED)], &store());
        assert_eq!(merged, MergedStereotypes::default());
        assert_eq!(merged.deployment_type(&DeploymentTypes::default()), None);
    }
}
