use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use bk_reflect::TypeKey;
use bk_reflect::raw::{Annotation, RawClass};
use bk_utils::hash::HashMap;

use super::registration::BUILTIN;
use super::{BindingModel, MetaKind, MetaRegistration, PolicyContribution};
use super::{RegistrationKind, ScopeModel, StereotypeModel};
use crate::DefinitionError;
use crate::config::{ContainerConfig, StereotypeConfig};
use crate::tags;

// -----------------------------------------------------------------------------
// MetaAnnotationStore

/// The registry of tag-type roles.
///
/// Filled before bootstrap and read-only afterwards; the
/// [environment](crate::environment::BootstrapEnvironment) shares it
/// behind an `Arc`.
///
/// # Example
///
/// ```
/// use bk_bean::config::ContainerConfig;
/// use bk_bean::meta::{MetaAnnotationStore, MetaKind};
///
/// let store = MetaAnnotationStore::from_config(&ContainerConfig::default()).unwrap();
///
/// assert_eq!(store.kind_of("Current"), Some(MetaKind::Binding));
/// assert!(store.scope_model("SessionScoped").unwrap().is_passivating());
/// assert_eq!(store.kind_of("Unknown"), None);
/// ```
#[derive(Debug, Default)]
pub struct MetaAnnotationStore {
    kinds: HashMap<Arc<str>, MetaKind>,
    scopes: HashMap<Arc<str>, ScopeModel>,
    bindings: HashMap<Arc<str>, BindingModel>,
    stereotypes: HashMap<Arc<str>, Arc<StereotypeModel>>,
}

impl MetaAnnotationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store knowing the built-in bindings, scopes and
    /// deployment types.
    pub fn with_defaults() -> Self {
        let mut store = Self::new();
        store.register_all(BUILTIN.iter().copied());
        store
    }

    /// Creates a store from the container configuration.
    ///
    /// Built-in tags and, with the `auto_register` feature, statically
    /// submitted ones are registered first, so configuration can refine
    /// them.
    pub fn from_config(config: &ContainerConfig) -> Result<Self, DefinitionError> {
        let mut store = Self::with_defaults();
        store.auto_register();

        for name in &config.deployment_types {
            store.register_deployment_type(name.as_str());
        }
        for scope in &config.scopes {
            store.register_scope(scope.name.as_str(), ScopeModel::new(scope.normal, scope.passivating));
        }
        for binding in &config.bindings {
            store.register_binding(
                binding.name.as_str(),
                BindingModel::new(binding.non_binding.iter().map(|s| s.as_str())),
            );
        }
        for stereotype in &config.stereotypes {
            let model = store.stereotype_from_config(stereotype)?;
            store.register_stereotype(model);
        }

        Ok(store)
    }

    /// Registers every [`MetaRegistration`] submitted through `inventory`.
    ///
    /// Returns `false` if the `auto_register` feature is disabled.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            self.register_all(inventory::iter::<MetaRegistration>.into_iter().copied());
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    pub fn register_all(&mut self, registrations: impl IntoIterator<Item = MetaRegistration>) {
        for registration in registrations {
            match registration.kind {
                RegistrationKind::Binding => {
                    self.register_binding(registration.name, BindingModel::default());
                }
                RegistrationKind::Scope(model) => self.register_scope(registration.name, model),
                RegistrationKind::DeploymentType => self.register_deployment_type(registration.name),
                RegistrationKind::InterceptorBinding => {
                    self.register_interceptor_binding(registration.name);
                }
            }
        }
    }

    pub fn register_binding(&mut self, name: impl Into<Arc<str>>, model: BindingModel) {
        let name = name.into();
        self.set_kind(&name, MetaKind::Binding);
        self.bindings.insert(name, model);
    }

    pub fn register_scope(&mut self, name: impl Into<Arc<str>>, model: ScopeModel) {
        let name = name.into();
        self.set_kind(&name, MetaKind::Scope);
        self.scopes.insert(name, model);
    }

    pub fn register_deployment_type(&mut self, name: impl Into<Arc<str>>) {
        self.set_kind(&name.into(), MetaKind::DeploymentType);
    }

    pub fn register_interceptor_binding(&mut self, name: impl Into<Arc<str>>) {
        self.set_kind(&name.into(), MetaKind::InterceptorBinding);
    }

    pub fn register_stereotype(&mut self, model: StereotypeModel) {
        let name: Arc<str> = model.name().into();
        self.set_kind(&name, MetaKind::Stereotype);
        self.stereotypes.insert(name, Arc::new(model));
    }

    /// Registers a tag type described by the class source, from the
    /// meta-annotations declared on it.
    ///
    /// Returns the role it was registered with, or `None` if the class is
    /// not a tag type the container gives a meaning to. Tags a stereotype
    /// declares must be registered before the stereotype.
    pub fn register_tag_type(&mut self, class: &RawClass) -> Result<Option<MetaKind>, DefinitionError> {
        let name = class.name();
        let declared = class.annotations();
        let find = |ty: &str| declared.iter().find(|a| a.ty() == ty);

        if find(tags::BINDING_TYPE).is_some() {
            let non_binding = class
                .methods()
                .iter()
                .filter(|m| m.annotations().iter().any(|a| a.ty() == tags::NON_BINDING))
                .map(|m| m.name());
            self.register_binding(name, BindingModel::new(non_binding));
            return Ok(Some(MetaKind::Binding));
        }
        if let Some(normal) = find(tags::NORMAL_SCOPE) {
            let passivating = normal.member("passivating") == Some("true");
            self.register_scope(name, ScopeModel::new(true, passivating));
            return Ok(Some(MetaKind::Scope));
        }
        if find(tags::SCOPE_TYPE).is_some() {
            self.register_scope(name, ScopeModel::PSEUDO);
            return Ok(Some(MetaKind::Scope));
        }
        if find(tags::DEPLOYMENT_TYPE).is_some() {
            self.register_deployment_type(name);
            return Ok(Some(MetaKind::DeploymentType));
        }
        if find(tags::INTERCEPTOR_BINDING_TYPE).is_some() {
            self.register_interceptor_binding(name);
            return Ok(Some(MetaKind::InterceptorBinding));
        }
        if let Some(stereotype) = find(tags::STEREOTYPE) {
            let required_types = stereotype
                .member("requiredTypes")
                .map(parse_type_list)
                .unwrap_or_default();
            let model = StereotypeModel::from_tags(name, declared, required_types, self)?;
            self.register_stereotype(model);
            return Ok(Some(MetaKind::Stereotype));
        }
        Ok(None)
    }

    fn set_kind(&mut self, name: &Arc<str>, kind: MetaKind) {
        if let Some(previous) = self.kinds.insert(name.clone(), kind)
            && previous != kind
        {
            log::warn!("tag type {name} re-registered as {kind}, was {previous}");
        }
    }

    fn stereotype_from_config(&self, config: &StereotypeConfig) -> Result<StereotypeModel, DefinitionError> {
        let expect = |name: &str, kind: MetaKind| -> Result<Arc<str>, DefinitionError> {
            if self.kind_of(name) == Some(kind) {
                Ok(name.into())
            } else {
                Err(DefinitionError::UnknownMeta {
                    tag: name.into(),
                    expected: kind.as_str(),
                })
            }
        };

        let contribution = PolicyContribution {
            scope: config
                .scope
                .as_deref()
                .map(|s| expect(s, MetaKind::Scope))
                .transpose()?,
            deployment_type: config
                .deployment_type
                .as_deref()
                .map(|d| expect(d, MetaKind::DeploymentType))
                .transpose()?,
            name_defaulted: config.named,
            required_types: config
                .required_types
                .iter()
                .map(|t| TypeKey::new(t.as_str()))
                .collect(),
        };
        Ok(StereotypeModel::new(config.name.as_str(), contribution))
    }

    // -------------------------------------------------------------------------
    // Queries

    #[inline]
    pub fn kind_of(&self, tag: &str) -> Option<MetaKind> {
        self.kinds.get(tag).copied()
    }

    #[inline]
    pub fn is_binding(&self, tag: &str) -> bool {
        self.kind_of(tag) == Some(MetaKind::Binding)
    }

    #[inline]
    pub fn is_scope(&self, tag: &str) -> bool {
        self.kind_of(tag) == Some(MetaKind::Scope)
    }

    #[inline]
    pub fn is_deployment_type(&self, tag: &str) -> bool {
        self.kind_of(tag) == Some(MetaKind::DeploymentType)
    }

    #[inline]
    pub fn is_stereotype(&self, tag: &str) -> bool {
        self.kind_of(tag) == Some(MetaKind::Stereotype)
    }

    pub fn scope_model(&self, tag: &str) -> Option<ScopeModel> {
        self.scopes.get(tag).copied()
    }

    pub fn binding_model(&self, tag: &str) -> Option<&BindingModel> {
        self.bindings.get(tag)
    }

    pub fn stereotype_model(&self, tag: &str) -> Option<&Arc<StereotypeModel>> {
        self.stereotypes.get(tag)
    }

    /// Returns `true` if the scope is registered as passivating.
    pub fn is_passivating(&self, scope: &str) -> bool {
        self.scope_model(scope).is_some_and(ScopeModel::is_passivating)
    }

    /// The tags of the given role among `declared`.
    pub fn filter<'a>(
        &'a self,
        declared: &'a [Annotation],
        kind: MetaKind,
    ) -> impl Iterator<Item = &'a Annotation> + 'a {
        declared
            .iter()
            .filter(move |a| self.kind_of(a.ty()) == Some(kind))
    }

    /// Returns `true` if `candidate` satisfies the `required` binding,
    /// ignoring its non-binding members.
    pub fn binding_matches(&self, required: &Annotation, candidate: &Annotation) -> bool {
        match self.binding_model(required.ty()) {
            Some(model) => model.matches(required, candidate),
            None => required == candidate,
        }
    }
}

fn parse_type_list(list: &str) -> Box<[TypeKey]> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(TypeKey::new)
        .collect::<Vec<_>>()
        .into_boxed_slice()
}

// -----------------------------------------------------------------------------
// Tests
