use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use bk_reflect::Annotated;
use bk_reflect::view::AnnotatedType;

use super::strategy::{decapitalize, single_scope};
use super::{ComponentDefinition, DefinitionElement, DefinitionId, DefinitionKind, DefinitionStrategy};
use crate::DefinitionError;
use crate::environment::BootstrapEnvironment;
use crate::injection::{InjectionElement, InjectionPoint};
use crate::tags;

// -----------------------------------------------------------------------------
// ManagedStrategy

/// A definition backed by a class the container instantiates itself.
///
/// Injection points are the fields tagged [`Inject`](tags::INJECT) or
/// [`Decorates`](tags::DECORATES) along the class hierarchy, the
/// parameters of the `Inject` constructor and those of `Inject`
/// initializer methods.
#[derive(Debug, Clone)]
pub struct ManagedStrategy {
    ty: Arc<AnnotatedType>,
}

impl ManagedStrategy {
    pub fn new(ty: Arc<AnnotatedType>) -> Self {
        Self { ty }
    }

    #[inline]
    pub fn annotated_type(&self) -> &Arc<AnnotatedType> {
        &self.ty
    }

    fn check_class(&self, definition: &ComponentDefinition) -> Result<(), DefinitionError> {
        let ty = &self.ty;
        if ty.is_inner_instance() {
            return Err(DefinitionError::InnerClass(ty.key().clone()));
        }
        if ty.is_abstract() && !definition.kind().is_decorator() {
            return Err(DefinitionError::AbstractClass(ty.key().clone()));
        }
        if definition.is_passivating() && !definition.is_intrinsically_serializable() {
            return Err(DefinitionError::PassivatingNotSerializable {
                definition: definition.id().clone(),
                scope: definition.scope().clone(),
            });
        }
        if !definition.is_dependent() {
            let public = ty
                .hierarchy()
                .flat_map(|t| t.fields().iter())
                .find(|f| f.is_public() && !f.is_static());
            if let Some(field) = public {
                return Err(DefinitionError::PublicFieldNotDependent {
                    definition: definition.id().clone(),
                    field: field.name().into(),
                });
            }
        }
        Ok(())
    }
}

impl DefinitionStrategy for ManagedStrategy {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::Managed
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

    fn pre_specialize(&self, _env: &BootstrapEnvironment) -> Result<(), DefinitionError> {
        match self.ty.superclass() {
            Some(_) => Ok(()),
            None => Err(DefinitionError::InvalidSpecialization(self.id())),
        }
    }

    /// The definition of the direct superclass.
    fn predecessor(
        &self,
        env: &BootstrapEnvironment,
    ) -> Result<Arc<ComponentDefinition>, DefinitionError> {
        self.ty
            .superclass()
            .map(|s| DefinitionId::Class(s.key().clone()))
            .and_then(|id| env.registry().get(&id))
            .ok_or_else(|| DefinitionError::MissingPredecessor(self.id()))
    }

    fn default_name(&self) -> String {
        decapitalize(self.ty.simple_name())
    }

    /// The nearest scope declared along the class hierarchy.
    fn local_scope(&self, env: &BootstrapEnvironment) -> Result<Option<Arc<str>>, DefinitionError> {
        for class in self.ty.hierarchy() {
            if let Some(scope) = single_scope(class, env, || String::from(class.key().as_str()))? {
                if class.key() != self.ty.key() {
                    log::trace!("{} inherits scope {scope} from {}", self.ty.key(), class.key());
                }
                return Ok(Some(scope));
            }
        }
        Ok(None)
    }

    fn collect_injection_points(
        &self,
        env: &BootstrapEnvironment,
    ) -> Result<Vec<InjectionPoint>, DefinitionError> {
        let owner = self.id();
        let mut points = Vec::new();
        let mut push = |element| {
            points.push(InjectionPoint::new(element, owner.clone(), env.store(), env.cache()));
        };

        for class in self.ty.hierarchy() {
            for field in class.fields().iter().filter(|f| !f.is_static()) {
                if field.is_annotation_present(tags::INJECT)
                    || field.is_annotation_present(tags::DECORATES)
                {
                    push(InjectionElement::Field(field.clone()));
                }
            }
        }

        let constructor = self
            .ty
            .constructors()
            .iter()
            .find(|c| c.is_annotation_present(tags::INJECT));
        for param in constructor.into_iter().flat_map(|c| c.parameters().iter()) {
            push(InjectionElement::Parameter(param.clone()));
        }

        for class in self.ty.hierarchy() {
            for method in class.declared_methods_with(tags::INJECT) {
                for param in method.parameters() {
                    push(InjectionElement::Parameter(param.clone()));
                }
            }
        }

        Ok(points)
    }

    fn check_implementation(
        &self,
        definition: &ComponentDefinition,
        _env: &BootstrapEnvironment,
    ) -> Result<(), DefinitionError> {
        self.check_class(definition)
    }
}

// -----------------------------------------------------------------------------
// DecoratorStrategy

/// A managed class tagged [`Decorator`](tags::DECORATOR).
///
/// A decorator may be abstract and must declare exactly one decoration
/// point.
#[derive(Debug, Clone)]
pub struct DecoratorStrategy {
    managed: ManagedStrategy,
}

impl DecoratorStrategy {
    pub fn new(ty: Arc<AnnotatedType>) -> Self {
        Self {
            managed: ManagedStrategy::new(ty),
        }
    }
}

impl DefinitionStrategy for DecoratorStrategy {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::Decorator
    }

    fn id(&self) -> DefinitionId {
        self.managed.id()
    }

    fn element(&self) -> DefinitionElement {
        self.managed.element()
    }

    fn annotated(&self) -> &dyn Annotated {
        self.managed.annotated()
    }

    fn pre_specialize(&self, env: &BootstrapEnvironment) -> Result<(), DefinitionError> {
        self.managed.pre_specialize(env)
    }

    fn predecessor(
        &self,
        env: &BootstrapEnvironment,
    ) -> Result<Arc<ComponentDefinition>, DefinitionError> {
        self.managed.predecessor(env)
    }

    fn default_name(&self) -> String {
        self.managed.default_name()
    }

    fn local_scope(&self, env: &BootstrapEnvironment) -> Result<Option<Arc<str>>, DefinitionError> {
        self.managed.local_scope(env)
    }

    fn collect_injection_points(
        &self,
        env: &BootstrapEnvironment,
    ) -> Result<Vec<InjectionPoint>, DefinitionError> {
        self.managed.collect_injection_points(env)
    }

    fn check_implementation(
        &self,
        definition: &ComponentDefinition,
        _env: &BootstrapEnvironment,
    ) -> Result<(), DefinitionError> {
        self.managed.check_class(definition)?;
        let found = definition
            .injection_points()
            .iter()
            .filter(|p| p.is_decoration_point())
            .count();
        if found != 1 {
            return Err(DefinitionError::DecorationPointCount {
                definition: definition.id().clone(),
                found,
            });
        }
        Ok(())
    }
}
