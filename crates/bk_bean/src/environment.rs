//! The services a definition build runs against.

use alloc::sync::Arc;
use alloc::vec::Vec;

use bk_reflect::cache::SharedObjectCache;
use bk_reflect::raw::RawClass;
use bk_reflect::transformer::ClassTransformer;
use bk_reflect::{Annotated, TypeKey};
use bk_utils::hash::HashSet;

use crate::DefinitionError;
use crate::config::ContainerConfig;
use crate::definition::{
    BuiltInStrategy, ComponentDefinition, DecoratorStrategy, DefinitionBuilder, DefinitionStrategy,
    ManagedStrategy, ProducerFieldStrategy, ProducerMethodStrategy,
};
use crate::deployment::DeploymentTypes;
use crate::meta::MetaAnnotationStore;
use crate::registry::DefinitionRegistry;
use crate::specialization::SpecializationMap;
use crate::tags;

// -----------------------------------------------------------------------------
// BootstrapEnvironment

/// Everything the [`DefinitionBuilder`] needs besides the strategy.
///
/// The shared cache, the transformer and the specialization map are
/// process-wide services. They are handed in explicitly and follow the
/// bootstrap lifecycle: populated by [`deploy`](Self::deploy), made
/// read-only by [`finish`](Self::finish), reset by
/// [`shutdown`](Self::shutdown).
///
/// # Example
///
/// ```
/// use bk_bean::config::ContainerConfig;
/// use bk_bean::environment::BootstrapEnvironment;
/// use bk_reflect::TypeKey;
/// use bk_reflect::raw::{Annotation, RawClass};
///
/// let env = BootstrapEnvironment::new(&ContainerConfig::default()).unwrap();
/// let cart = env
///     .deploy_class(&RawClass::builder("shop.ShoppingCart").annotation(Annotation::new("Named")).build())
///     .unwrap();
///
/// assert_eq!(cart.name().map(|n| &**n), Some("shoppingCart"));
/// assert_eq!(&**cart.scope(), "Dependent");
/// assert_eq!(&**cart.deployment_type(), "Production");
///
/// // `Named` is a binding, so the cart does not get the default `Current`.
/// assert_eq!(cart.bindings(), [Annotation::new("Any"), Annotation::new("Named")]);
/// let ty = TypeKey::new("shop.ShoppingCart");
/// assert!(env.registry().resolve(&ty, &[]).is_empty());
/// assert_eq!(env.registry().resolve(&ty, &[Annotation::new("Any")]).len(), 1);
/// ```
#[derive(Debug)]
pub struct BootstrapEnvironment {
    deployment_types: DeploymentTypes,
    standard_types: HashSet<TypeKey>,
    store: Arc<MetaAnnotationStore>,
    transformer: Arc<ClassTransformer>,
    specialization: Arc<SpecializationMap>,
    registry: DefinitionRegistry,
}

impl BootstrapEnvironment {
    /// Creates an environment with fresh process-wide services.
    pub fn new(config: &ContainerConfig) -> Result<Self, DefinitionError> {
        let store = Arc::new(MetaAnnotationStore::from_config(config)?);
        let transformer = Arc::new(ClassTransformer::new(Arc::new(SharedObjectCache::new())));
        Ok(Self::with_services(
            config,
            store,
            transformer,
            Arc::new(SpecializationMap::new()),
        ))
    }

    /// Creates an environment over existing services.
    pub fn with_services(
        config: &ContainerConfig,
        store: Arc<MetaAnnotationStore>,
        transformer: Arc<ClassTransformer>,
        specialization: Arc<SpecializationMap>,
    ) -> Self {
        let deployment_types = DeploymentTypes::from_config(config);
        let registry = DefinitionRegistry::new(
            store.clone(),
            deployment_types.clone(),
            specialization.clone(),
        );
        Self {
            standard_types: config
                .standard_types
                .iter()
                .map(|t| TypeKey::new(t.as_str()))
                .collect(),
            deployment_types,
            store,
            transformer,
            specialization,
            registry,
        }
    }

    #[inline]
    pub fn deployment_types(&self) -> &DeploymentTypes {
        &self.deployment_types
    }

    #[inline]
    pub fn store(&self) -> &MetaAnnotationStore {
        &self.store
    }

    #[inline]
    pub fn cache(&self) -> &Arc<SharedObjectCache> {
        self.transformer.cache()
    }

    #[inline]
    pub fn transformer(&self) -> &Arc<ClassTransformer> {
        &self.transformer
    }

    #[inline]
    pub fn specialization(&self) -> &Arc<SpecializationMap> {
        &self.specialization
    }

    #[inline]
    pub fn registry(&self) -> &DefinitionRegistry {
        &self.registry
    }

    /// Returns `true` if the class may have the `Standard` deployment type.
    pub fn is_standard_type(&self, ty: &TypeKey) -> bool {
        self.standard_types.contains(ty)
    }

    // -------------------------------------------------------------------------
    // Deployment

    /// Builds a definition and registers it.
    pub fn deploy<S: DefinitionStrategy>(
        &self,
        strategy: S,
    ) -> Result<Arc<ComponentDefinition>, DefinitionError> {
        let definition = DefinitionBuilder::new(self, strategy).build()?;
        Ok(self.registry.register(definition))
    }

    /// Deploys a class as a managed definition, or as a decorator if it is
    /// tagged [`Decorator`](tags::DECORATOR).
    pub fn deploy_class(&self, class: &Arc<RawClass>) -> Result<Arc<ComponentDefinition>, DefinitionError> {
        let ty = self.transformer.annotated_type(class);
        if ty.is_annotation_present(tags::DECORATOR) {
            self.deploy(DecoratorStrategy::new(ty))
        } else {
            self.deploy(ManagedStrategy::new(ty))
        }
    }

    /// Deploys a container-internal class.
    pub fn deploy_builtin(&self, class: &Arc<RawClass>) -> Result<Arc<ComponentDefinition>, DefinitionError> {
        let ty = self.transformer.annotated_type(class);
        self.deploy(BuiltInStrategy::new(ty))
    }

    /// Deploys the producer methods and fields declared by the class of
    /// `declaring`.
    pub fn deploy_producers(
        &self,
        declaring: &Arc<ComponentDefinition>,
    ) -> Result<Vec<Arc<ComponentDefinition>>, DefinitionError> {
        let Some(ty) = declaring.element().as_type() else {
            return Ok(Vec::new());
        };
        let mut deployed = Vec::new();
        for method in ty.declared_methods_with(tags::PRODUCES) {
            deployed.push(self.deploy(ProducerMethodStrategy::new(declaring.clone(), method.clone()))?);
        }
        for field in ty.declared_fields_with(tags::PRODUCES) {
            deployed.push(self.deploy(ProducerFieldStrategy::new(declaring.clone(), field.clone()))?);
        }
        Ok(deployed)
    }

    // -------------------------------------------------------------------------
    // Lifecycle

    /// Ends bootstrap: the specialization map becomes read-only.
    pub fn finish(&self) {
        self.specialization.freeze();
        log::debug!(
            "bootstrap finished: {} definitions, {} specializations",
            self.registry.len(),
            self.specialization.len()
        );
    }

    /// Resets every process-wide service.
    pub fn shutdown(&self) {
        self.registry.clear();
        self.specialization.clear();
        self.transformer.clear();
        self.cache().clear();
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use bk_reflect::TypeKey;
    use bk_reflect::raw::{Annotation, RawClass, RawField, RawMethod};

    use super::BootstrapEnvironment;
    use crate::DefinitionError;
    use crate::config::ContainerConfig;
    use crate::definition::{DefinitionId, DefinitionKind};
    use crate::tags;

    #[test]
    fn unknown_meta_in_config() {
        let mut config = ContainerConfig::default();
        config.stereotypes.push(crate::config::StereotypeConfig {
            name: String::from("Broken"),
            scope: Some(String::from("Nowhere")),
            ..Default::default()
        });
        assert!(matches!(
            BootstrapEnvironment::new(&config),
            Err(DefinitionError::UnknownMeta { .. })
        ));
    }

    #[test]
    fn deploy_producers() {
        let env = BootstrapEnvironment::new(&ContainerConfig::default()).unwrap();
        let money = RawClass::builder("shop.Money").build();
        let bank = RawClass::builder("shop.Bank")
            .method(RawMethod::new("getBalance", money.clone()).with_annotation(Annotation::new(tags::PRODUCES)))
            .method(RawMethod::new("audit", money.clone()))
            .field(RawField::new("reserve", money).with_annotation(Annotation::new(tags::PRODUCES)))
            .build();
        let bank = env.deploy_class(&bank).unwrap();

        let producers = env.deploy_producers(&bank).unwrap();
        let kinds: alloc::vec::Vec<_> = producers.iter().map(|p| p.kind()).collect();
        assert_eq!(kinds, [DefinitionKind::ProducerMethod, DefinitionKind::ProducerField]);
        assert_eq!(env.registry().len(), 3);
        assert_eq!(env.registry().resolve(&TypeKey::new("shop.Money"), &[]).len(), 2);
    }

    #[test]
    fn redeploy_keeps_first() {
        let env = BootstrapEnvironment::new(&ContainerConfig::default()).unwrap();
        let class = RawClass::builder("shop.Cart").build();
        let first = env.deploy_class(&class).unwrap();
        let second = env.deploy_class(&class).unwrap();
        assert!(alloc::sync::Arc::ptr_eq(&first, &second));
        assert_eq!(env.registry().len(), 1);
    }

    #[test]
    fn finish_freezes_specialization() {
        let env = BootstrapEnvironment::new(&ContainerConfig::default()).unwrap();
        let base = RawClass::builder("shop.Payment").build();
        env.deploy_class(&base).unwrap();
        env.finish();

        let late = RawClass::builder("shop.LatePayment")
            .superclass(base)
            .annotation(Annotation::new(tags::SPECIALIZES))
            .build();
        assert_eq!(
            env.deploy_class(&late).unwrap_err(),
            DefinitionError::SpecializationFrozen {
                predecessor: DefinitionId::Class(TypeKey::new("shop.Payment")),
                successor: DefinitionId::Class(TypeKey::new("shop.LatePayment")),
            }
        );
        assert!(env.registry().get(&DefinitionId::Class(TypeKey::new("shop.LatePayment"))).is_none());
    }

    #[test]
    fn shutdown_resets_services() {
        let env = BootstrapEnvironment::new(&ContainerConfig::default()).unwrap();
        env.deploy_class(&RawClass::builder("shop.Cart").build()).unwrap();
        assert_eq!(env.transformer().len(), 1);

        env.shutdown();
        assert_eq!(env.registry().len(), 0);
        assert_eq!(env.transformer().len(), 0);
        assert_eq!(env.specialization().len(), 0);
    }
}
