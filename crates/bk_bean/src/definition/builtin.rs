use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use bk_reflect::Annotated;
use bk_reflect::view::AnnotatedType;

use super::strategy::decapitalize;
use super::{ComponentDefinition, DefinitionElement, DefinitionId, DefinitionKind, DefinitionStrategy};
use crate::DefinitionError;
use crate::environment::BootstrapEnvironment;
use crate::injection::InjectionPoint;
use crate::tags;

// -----------------------------------------------------------------------------
// BuiltInStrategy

/// A container-internal definition, such as the manager itself or the
/// metadata of the injection point being filled.
///
/// Built-ins default to the [`Standard`](tags::STANDARD) deployment type,
/// so their class must be on the configured allow-list.
#[derive(Debug, Clone)]
pub struct BuiltInStrategy {
    ty: Arc<AnnotatedType>,
}

impl BuiltInStrategy {
    pub fn new(ty: Arc<AnnotatedType>) -> Self {
        Self { ty }
    }
}

impl DefinitionStrategy for BuiltInStrategy {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::BuiltIn
    }

    fn id(&self) -> DefinitionId {
        DefinitionId::Class(self.ty.key().clone())
    }

    fn element(&self) -> DefinitionElement {
        DefinitionElement::Type(self.ty.clone())
    }

    fn annotated(&self) -> &dyn Annotated {
        &*self.ty
    }

    fn is_specializing(&self) -> bool {
        false
    }

    fn predecessor(
        &self,
        _env: &BootstrapEnvironment,
    ) -> Result<Arc<ComponentDefinition>, DefinitionError> {
        Err(DefinitionError::InvalidSpecialization(self.id()))
    }

    fn default_name(&self) -> String {
        decapitalize(self.ty.simple_name())
    }

    fn default_deployment_type(&self, _env: &BootstrapEnvironment) -> Option<Arc<str>> {
        Some(tags::STANDARD.into())
    }

    fn collect_injection_points(
        &self,
        _env: &BootstrapEnvironment,
    ) -> Result<Vec<InjectionPoint>, DefinitionError> {
        Ok(Vec::new())
    }

    fn check_implementation(
        &self,
        _definition: &ComponentDefinition,
        env: &BootstrapEnvironment,
    ) -> Result<(), DefinitionError> {
        if !env.is_standard_type(self.ty.key()) {
            return Err(DefinitionError::NotBuiltIn(self.ty.key().clone()));
        }
        Ok(())
    }
}
