use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use bk_reflect::Annotated;
use bk_reflect::raw::Modifiers;
use bk_reflect::view::{AnnotatedField, AnnotatedMethod};

use super::{ComponentDefinition, DefinitionElement, DefinitionId, DefinitionKind, DefinitionStrategy};
use crate::DefinitionError;
use crate::environment::BootstrapEnvironment;
use crate::injection::{InjectionElement, InjectionPoint};
use crate::tags;

// -----------------------------------------------------------------------------
// ProducerMethodStrategy

/// A definition whose instances are returned by a method of another
/// definition.
///
/// The producer inherits the deployment type of its declaring definition
/// unless it declares one. Its parameters are its injection points.
#[derive(Debug, Clone)]
pub struct ProducerMethodStrategy {
    declaring: Arc<ComponentDefinition>,
    method: Arc<AnnotatedMethod>,
}

impl ProducerMethodStrategy {
    pub fn new(declaring: Arc<ComponentDefinition>, method: Arc<AnnotatedMethod>) -> Self {
        Self { declaring, method }
    }

    #[inline]
    pub fn declaring(&self) -> &Arc<ComponentDefinition> {
        &self.declaring
    }

    /// The producer method of the superclass that this one overrides.
    fn overridden(&self) -> Option<Arc<AnnotatedMethod>> {
        let declaring = self.declaring.element().as_type()?;
        let key = self.method.key();
        declaring
            .superclass()?
            .method(key.name(), key.signature())
            .filter(|m| m.is_annotation_present(tags::PRODUCES))
            .cloned()
    }
}

impl DefinitionStrategy for ProducerMethodStrategy {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::ProducerMethod
    }

    fn id(&self) -> DefinitionId {
        DefinitionId::Member(self.method.key().clone())
    }

    fn element(&self) -> DefinitionElement {
        DefinitionElement::Method(self.method.clone())
    }

    fn annotated(&self) -> &dyn Annotated {
        &*self.method
    }

    fn pre_specialize(&self, _env: &BootstrapEnvironment) -> Result<(), DefinitionError> {
        if self.method.is_static() {
            return Err(DefinitionError::InvalidSpecialization(self.id()));
        }
        Ok(())
    }

    /// The producer defined by the overridden superclass method.
    fn predecessor(
        &self,
        env: &BootstrapEnvironment,
    ) -> Result<Arc<ComponentDefinition>, DefinitionError> {
        let overridden = self
            .overridden()
            .ok_or_else(|| DefinitionError::ProducerNotOverriding(self.id()))?;
        env.registry()
            .get(&DefinitionId::Member(overridden.key().clone()))
            .ok_or_else(|| DefinitionError::MissingPredecessor(self.id()))
    }

    /// The property name of a getter, the method name otherwise.
    fn default_name(&self) -> String {
        self.method
            .property_name()
            .unwrap_or_else(|| self.method.name().to_string())
    }

    fn default_deployment_type(&self, _env: &BootstrapEnvironment) -> Option<Arc<str>> {
        Some(self.declaring.deployment_type().clone())
    }

    fn collect_injection_points(
        &self,
        env: &BootstrapEnvironment,
    ) -> Result<Vec<InjectionPoint>, DefinitionError> {
        let owner = self.id();
        Ok(self
            .method
            .parameters()
            .iter()
            .map(|p| {
                InjectionPoint::new(
                    InjectionElement::Parameter(p.clone()),
                    owner.clone(),
                    env.store(),
                    env.cache(),
                )
            })
            .collect())
    }

    fn check_implementation(
        &self,
        definition: &ComponentDefinition,
        _env: &BootstrapEnvironment,
    ) -> Result<(), DefinitionError> {
        check_producer_type(self.annotated(), definition)
    }
}

// -----------------------------------------------------------------------------
// ProducerFieldStrategy

/// A definition whose instance is the value of a field of another
/// definition. Producer fields have no injection points and cannot
/// specialize.
#[derive(Debug, Clone)]
pub struct ProducerFieldStrategy {
    declaring: Arc<ComponentDefinition>,
    field: Arc<AnnotatedField>,
}

impl ProducerFieldStrategy {
    pub fn new(declaring: Arc<ComponentDefinition>, field: Arc<AnnotatedField>) -> Self {
        Self { declaring, field }
    }

    #[inline]
    pub fn declaring(&self) -> &Arc<ComponentDefinition> {
        &self.declaring
    }
}

impl DefinitionStrategy for ProducerFieldStrategy {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::ProducerField
    }

    fn id(&self) -> DefinitionId {
        DefinitionId::Member(self.field.key().clone())
    }

    fn element(&self) -> DefinitionElement {
        DefinitionElement::Field(self.field.clone())
    }

    fn annotated(&self) -> &dyn Annotated {
        &*self.field
    }

    fn pre_specialize(&self, _env: &BootstrapEnvironment) -> Result<(), DefinitionError> {
        Err(DefinitionError::InvalidSpecialization(self.id()))
    }

    fn predecessor(
        &self,
        _env: &BootstrapEnvironment,
    ) -> Result<Arc<ComponentDefinition>, DefinitionError> {
        Err(DefinitionError::InvalidSpecialization(self.id()))
    }

    fn default_name(&self) -> String {
        self.field.name().to_string()
    }

    fn default_deployment_type(&self, _env: &BootstrapEnvironment) -> Option<Arc<str>> {
        Some(self.declaring.deployment_type().clone())
    }

    fn collect_injection_points(
        &self,
        _env: &BootstrapEnvironment,
    ) -> Result<Vec<InjectionPoint>, DefinitionError> {
        Ok(Vec::new())
    }

    fn check_implementation(
        &self,
        definition: &ComponentDefinition,
        _env: &BootstrapEnvironment,
    ) -> Result<(), DefinitionError> {
        check_producer_type(self.annotated(), definition)
    }
}

fn check_producer_type(
    annotated: &dyn Annotated,
    definition: &ComponentDefinition,
) -> Result<(), DefinitionError> {
    if annotated
        .raw_type()
        .modifiers()
        .contains(Modifiers::TYPE_VARIABLE)
    {
        return Err(DefinitionError::ProducerTypeVariable(definition.id().clone()));
    }
    Ok(())
}
