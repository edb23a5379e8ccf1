use alloc::boxed::Box;
use alloc::sync::{Arc, Weak};
use core::fmt;

use bitflags::bitflags;
use bk_reflect::Annotated;
use bk_reflect::cache::TypeClosure;
use bk_reflect::raw::Annotation;

use super::{DefinitionElement, DefinitionId, DefinitionKind};
use crate::injection::InjectionPoint;
use crate::tags;

// -----------------------------------------------------------------------------
// DependencyResolver

/// Finds the definition satisfying an injection point.
///
/// Implemented by the [`DefinitionRegistry`](crate::registry::DefinitionRegistry);
/// the serializability check of passivating definitions is its only
/// consumer here.
pub trait DependencyResolver {
    /// Returns the unique definition satisfying `point`, if there is one.
    fn resolve_dependency(&self, point: &InjectionPoint) -> Option<Arc<ComponentDefinition>>;
}

// -----------------------------------------------------------------------------
// DefinitionFlags

bitflags! {
    /// Boolean facets of a resolved definition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DefinitionFlags: u8 {
        const PRIMITIVE = 1 << 0;
        const PROXYABLE = 1 << 1;
        const INTRINSICALLY_SERIALIZABLE = 1 << 2;
        const PASSIVATING = 1 << 3;
        /// The element declares a `Named` tag, with or without a value.
        const NAME_DECLARED = 1 << 4;
        const SPECIALIZING = 1 << 5;
    }
}

// -----------------------------------------------------------------------------
// ComponentDefinition

/// A fully resolved and validated component definition.
///
/// Immutable once built. Serializability depends on the other definitions
/// and is computed against a [`DependencyResolver`] on each request.
pub struct ComponentDefinition {
    pub(super) id: DefinitionId,
    pub(super) kind: DefinitionKind,
    pub(super) element: DefinitionElement,
    pub(super) name: Option<Arc<str>>,
    pub(super) bindings: Arc<[Annotation]>,
    pub(super) scope: Arc<str>,
    pub(super) deployment_type: Arc<str>,
    pub(super) types: Arc<TypeClosure>,
    pub(super) flags: DefinitionFlags,
    pub(super) injection_points: Box<[InjectionPoint]>,
    pub(super) predecessor: Option<(DefinitionId, Weak<ComponentDefinition>)>,
}

impl ComponentDefinition {
    #[inline]
    pub fn id(&self) -> &DefinitionId {
        &self.id
    }

    #[inline]
    pub fn kind(&self) -> DefinitionKind {
        self.kind
    }

    #[inline]
    pub fn element(&self) -> &DefinitionElement {
        &self.element
    }

    #[inline]
    pub fn annotated(&self) -> &dyn Annotated {
        self.element.annotated()
    }

    /// The name the definition is exposed under, if any.
    #[inline]
    pub fn name(&self) -> Option<&Arc<str>> {
        self.name.as_ref()
    }

    /// Never empty; always contains [`Any`](tags::ANY).
    #[inline]
    pub fn bindings(&self) -> &[Annotation] {
        &self.bindings
    }

    #[inline]
    pub fn scope(&self) -> &Arc<str> {
        &self.scope
    }

    #[inline]
    pub fn is_dependent(&self) -> bool {
        &*self.scope == tags::DEPENDENT
    }

    #[inline]
    pub fn deployment_type(&self) -> &Arc<str> {
        &self.deployment_type
    }

    /// The API types of the definition.
    #[inline]
    pub fn types(&self) -> &TypeClosure {
        &self.types
    }

    #[inline]
    pub fn flags(&self) -> DefinitionFlags {
        self.flags
    }

    #[inline]
    pub fn is_primitive(&self) -> bool {
        self.flags.contains(DefinitionFlags::PRIMITIVE)
    }

    #[inline]
    pub fn is_proxyable(&self) -> bool {
        self.flags.contains(DefinitionFlags::PROXYABLE)
    }

    #[inline]
    pub fn is_passivating(&self) -> bool {
        self.flags.contains(DefinitionFlags::PASSIVATING)
    }

    #[inline]
    pub fn is_intrinsically_serializable(&self) -> bool {
        self.flags.contains(DefinitionFlags::INTRINSICALLY_SERIALIZABLE)
    }

    #[inline]
    pub fn declares_name(&self) -> bool {
        self.flags.contains(DefinitionFlags::NAME_DECLARED)
    }

    #[inline]
    pub fn is_specializing(&self) -> bool {
        self.flags.contains(DefinitionFlags::SPECIALIZING)
    }

    #[inline]
    pub fn injection_points(&self) -> &[InjectionPoint] {
        &self.injection_points
    }

    /// The identity of the definition this one specializes.
    pub fn predecessor_id(&self) -> Option<&DefinitionId> {
        self.predecessor.as_ref().map(|(id, _)| id)
    }

    /// The definition this one specializes, while it is alive.
    pub fn predecessor(&self) -> Option<Arc<ComponentDefinition>> {
        self.predecessor.as_ref().and_then(|(_, weak)| weak.upgrade())
    }

    /// Returns `true` if instances of this definition can be serialized.
    ///
    /// A definition is serializable if its type is, and, when its scope is
    /// passivating, no non-transient injection point receives a dependent
    /// definition that is not serializable itself. The answer follows the
    /// definitions known to `resolver` at the time of the call.
    pub fn is_serializable(&self, resolver: &dyn DependencyResolver) -> bool {
        if !self.is_intrinsically_serializable() {
            return false;
        }
        if !self.is_passivating() {
            return true;
        }
        // Dependent definitions are never passivating, the recursion stops
        // one level down.
        for point in self.injection_points.iter().filter(|p| !p.is_transient()) {
            let Some(dependency) = resolver.resolve_dependency(point) else {
                continue;
            };
            if dependency.is_dependent() && !dependency.is_serializable(resolver) {
                log::debug!(
                    "{} is not serializable: {point} receives {}",
                    self.id,
                    dependency.id
                );
                return false;
            }
        }
        true
    }
}

impl fmt::Debug for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("bindings", &self.bindings)
            .field("scope", &self.scope)
            .field("deployment_type", &self.deployment_type)
            .field("flags", &self.flags)
            .field("injection_points", &self.injection_points.len())
            .field("predecessor", &self.predecessor_id())
            .finish()
    }
}

impl fmt::Display for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use bk_reflect::raw::{Annotation, Modifiers, RawClass, RawField};

    use crate::config::ContainerConfig;
    use crate::environment::BootstrapEnvironment;
    use crate::tags;

    fn serializable(name: &str) -> Arc<RawClass> {
        RawClass::builder(name)
            .modifiers(Modifiers::PUBLIC | Modifiers::SERIALIZABLE)
            .build()
    }

    fn wizard_class(dependency: &Arc<RawClass>, field_modifiers: Modifiers) -> Arc<RawClass> {
        RawClass::builder("shop.Wizard")
            .modifiers(Modifiers::PUBLIC | Modifiers::SERIALIZABLE)
            .annotation(Annotation::new(tags::SESSION_SCOPED))
            .field(
                RawField::new("dependency", dependency.clone())
                    .with_modifiers(field_modifiers)
                    .with_annotation(Annotation::new(tags::INJECT)),
            )
            .build()
    }

    #[test]
    fn passivating_with_unserializable_dependency() {
        let env = BootstrapEnvironment::new(&ContainerConfig::default()).unwrap();
        let clock = RawClass::builder("shop.Clock").build();
        env.deploy_class(&clock).unwrap();

        let wizard = env.deploy_class(&wizard_class(&clock, Modifiers::PRIVATE)).unwrap();
        assert!(wizard.is_passivating());
        assert!(wizard.is_intrinsically_serializable());
        assert!(!wizard.is_serializable(env.registry()));
    }

    #[test]
    fn dependency_deployed_after_first_query() {
        let env = BootstrapEnvironment::new(&ContainerConfig::default()).unwrap();
        let clock = RawClass::builder("shop.Clock").build();
        let wizard = env
            .deploy_class(&wizard_class(&clock, Modifiers::PRIVATE))
            .unwrap();
        assert!(wizard.is_serializable(env.registry()));

        env.deploy_class(&clock).unwrap();
        assert!(!wizard.is_serializable(env.registry()));
    }

    #[test]
    fn transient_dependency_is_ignored() {
        let env = BootstrapEnvironment::new(&ContainerConfig::default()).unwrap();
        let clock = RawClass::builder("shop.Clock").build();
        env.deploy_class(&clock).unwrap();

        let wizard = env
            .deploy_class(&wizard_class(&clock, Modifiers::PRIVATE | Modifiers::TRANSIENT))
            .unwrap();
        assert!(wizard.is_serializable(env.registry()));
    }

    #[test]
    fn serializable_or_unresolved_dependency() {
        let env = BootstrapEnvironment::new(&ContainerConfig::default()).unwrap();
        let ledger = serializable("shop.Ledger");
        env.deploy_class(&ledger).unwrap();
        let wizard = env.deploy_class(&wizard_class(&ledger, Modifiers::PRIVATE)).unwrap();
        assert!(wizard.is_serializable(env.registry()));

        let env = BootstrapEnvironment::new(&ContainerConfig::default()).unwrap();
        let missing = RawClass::builder("shop.Missing").build();
        let wizard = env.deploy_class(&wizard_class(&missing, Modifiers::PRIVATE)).unwrap();
        assert!(wizard.is_serializable(env.registry()));
    }

    #[test]
    fn non_passivating() {
        let env = BootstrapEnvironment::new(&ContainerConfig::default()).unwrap();
        let plain = env.deploy_class(&RawClass::builder("shop.Plain").build()).unwrap();
        assert!(!plain.is_passivating());
        assert!(!plain.is_serializable(env.registry()));

        let ledger = env.deploy_class(&serializable("shop.Ledger")).unwrap();
        assert!(ledger.is_serializable(env.registry()));
        assert_eq!(alloc::format!("{ledger}"), "managed shop.Ledger");
    }
}
