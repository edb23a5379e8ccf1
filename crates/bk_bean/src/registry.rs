//! The output registry of component definitions.

use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::{PoisonError, RwLock};

use bk_reflect::TypeKey;
use bk_reflect::raw::Annotation;
use bk_utils::hash::HashMap;

use crate::definition::{ComponentDefinition, DefinitionId, DependencyResolver};
use crate::deployment::DeploymentTypes;
use crate::injection::InjectionPoint;
use crate::meta::MetaAnnotationStore;
use crate::specialization::SpecializationMap;
use crate::tags;

// -----------------------------------------------------------------------------
// DefinitionRegistry

/// The definitions built during bootstrap, with typesafe resolution.
///
/// Resolution by type and bindings:
///
/// - keeps the definitions whose deployment type is enabled, whose API
///   types contain the requested type and whose bindings satisfy every
///   requested binding (non-binding members ignored);
/// - drops the definitions replaced by a registered specializing
///   definition;
/// - keeps only those with the highest deployment type priority.
#[derive(Debug)]
pub struct DefinitionRegistry {
    definitions: RwLock<HashMap<DefinitionId, Arc<ComponentDefinition>>>,
    store: Arc<MetaAnnotationStore>,
    deployment_types: DeploymentTypes,
    specialization: Arc<SpecializationMap>,
}

impl DefinitionRegistry {
    pub fn new(
        store: Arc<MetaAnnotationStore>,
        deployment_types: DeploymentTypes,
        specialization: Arc<SpecializationMap>,
    ) -> Self {
        Self {
            definitions: RwLock::new(HashMap::default()),
            store,
            deployment_types,
            specialization,
        }
    }

    /// Registers a definition and returns the registered instance.
    ///
    /// A definition with the same identity that is already registered is
    /// kept, and returned instead.
    pub fn register(&self, definition: Arc<ComponentDefinition>) -> Arc<ComponentDefinition> {
        let mut definitions = self
            .definitions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let registered = definitions
            .entry(definition.id().clone())
            .or_insert_with(|| definition.clone());
        if !Arc::ptr_eq(registered, &definition) {
            log::warn!("{} registered twice, keeping the first", definition.id());
        }
        registered.clone()
    }

    pub fn get(&self, id: &DefinitionId) -> Option<Arc<ComponentDefinition>> {
        self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Every registered definition, ordered by identity.
    pub fn definitions(&self) -> Vec<Arc<ComponentDefinition>> {
        let mut all: Vec<_> = self
            .definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        all.sort_by(|a, b| a.id().cmp(b.id()));
        all
    }

    /// Resolves the definitions for a type and required bindings.
    ///
    /// No required binding means [`Current`](tags::CURRENT). The result is
    /// ordered by identity.
    pub fn resolve(&self, ty: &TypeKey, required: &[Annotation]) -> Vec<Arc<ComponentDefinition>> {
        let current = [Annotation::new(tags::CURRENT)];
        let required = if required.is_empty() { &current[..] } else { required };

        let mut candidates: Vec<_> = self
            .definitions()
            .into_iter()
            .filter(|d| self.deployment_types.is_enabled(d.deployment_type()))
            .filter(|d| d.types().contains(ty))
            .filter(|d| self.satisfies(d, required))
            .collect();

        candidates.retain(|d| !self.is_replaced(d));

        let highest = candidates
            .iter()
            .filter_map(|d| self.deployment_types.priority(d.deployment_type()))
            .max();
        candidates.retain(|d| self.deployment_types.priority(d.deployment_type()) == highest);
        candidates
    }

    /// Forgets every definition. Called on shutdown.
    pub fn clear(&self) {
        self.definitions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn satisfies(&self, definition: &ComponentDefinition, required: &[Annotation]) -> bool {
        required.iter().all(|r| {
            definition
                .bindings()
                .iter()
                .any(|b| self.store.binding_matches(r, b))
        })
    }

    fn is_replaced(&self, definition: &ComponentDefinition) -> bool {
        self.specialization
            .successor_of(definition.id())
            .and_then(|successor| self.get(&successor))
            .is_some_and(|s| self.deployment_types.is_enabled(s.deployment_type()))
    }
}

impl DependencyResolver for DefinitionRegistry {
    fn resolve_dependency(&self, point: &InjectionPoint) -> Option<Arc<ComponentDefinition>> {
        let mut found = self.resolve(point.required_type(), point.bindings());
        match found.len() {
            1 => found.pop(),
            0 => {
                log::trace!("{point} of {} is unsatisfied", point.owner());
                None
            }
            n => {
                log::trace!("{point} of {} is ambiguous, {n} candidates", point.owner());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;

    use bk_reflect::TypeKey;
    use bk_reflect::raw::{Annotation, RawClass};

    use crate::config::{BindingConfig, ContainerConfig};
    use crate::environment::BootstrapEnvironment;

    fn env() -> BootstrapEnvironment {
        let mut config = ContainerConfig::default();
        config.deployment_types.push(String::from("Mock"));
        config.bindings.push(BindingConfig {
            name: String::from("Pay"),
            non_binding: vec![String::from("comment")],
        });
        BootstrapEnvironment::new(&config).unwrap()
    }

    fn payment() -> Arc<RawClass> {
        RawClass::builder("shop.Payment").build()
    }

    #[test]
    fn highest_priority_wins() {
        let env = env();
        let payment = payment();
        let real = RawClass::builder("shop.CardPayment").interface(payment.clone()).build();
        let mock = RawClass::builder("shop.MockPayment")
            .interface(payment)
            .annotation(Annotation::new("Mock"))
            .build();
        env.deploy_class(&real).unwrap();
        let mock = env.deploy_class(&mock).unwrap();

        let found = env.registry().resolve(&TypeKey::new("shop.Payment"), &[]);
        assert_eq!(found.len(), 1);
        assert!(Arc::ptr_eq(&found[0], &mock));

        let card = env.registry().resolve(&TypeKey::new("shop.CardPayment"), &[]);
        assert_eq!(card.len(), 1);
    }

    #[test]
    fn binding_members() {
        let env = env();
        let cheque = RawClass::builder("shop.Cheque")
            .interface(payment())
            .annotation(Annotation::new("Pay").with_value("cheque").with_member("comment", "slow"))
            .build();
        env.deploy_class(&cheque).unwrap();
        let ty = TypeKey::new("shop.Payment");

        let pay = |value: &str, comment: &str| {
            Annotation::new("Pay").with_value(value).with_member("comment", comment)
        };
        assert_eq!(env.registry().resolve(&ty, &[pay("cheque", "anything")]).len(), 1);
        assert!(env.registry().resolve(&ty, &[pay("card", "slow")]).is_empty());
        assert!(env.registry().resolve(&ty, &[]).is_empty());
        assert_eq!(env.registry().resolve(&ty, &[Annotation::new("Any")]).len(), 1);
    }

    #[test]
    fn definitions_are_ordered() {
        let env = env();
        env.deploy_class(&RawClass::builder("shop.B").build()).unwrap();
        env.deploy_class(&RawClass::builder("shop.A").build()).unwrap();
        let ids: vec::Vec<_> = env
            .registry()
            .definitions()
            .iter()
            .map(|d| alloc::format!("{}", d.id()))
            .collect();
        assert_eq!(ids, ["shop.A", "shop.B"]);
    }
}
