use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use bk_reflect::raw::Annotation;

use super::{ComponentDefinition, DefinitionFlags, DefinitionId, DefinitionStrategy};
use crate::DefinitionError;
use crate::environment::BootstrapEnvironment;
use crate::meta::MetaKind;
use crate::stereotype::MergedStereotypes;
use crate::tags;

// -----------------------------------------------------------------------------
// InitStep

/// The initialization sequence, in execution order.
///
/// Every step only reads what earlier steps established. The pair found
/// by [`Specialize`](Self::Specialize) reaches the specialization map only
/// once every step and the implementation checks succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InitStep {
    MergeStereotypes,
    Specialize,
    DefaultBindings,
    Primitive,
    Name,
    DeploymentType,
    CheckDeploymentType,
    Scope,
    Serializable,
    Proxyable,
    RequiredTypes,
    InjectionPoints,
    DecorationPoints,
}

impl InitStep {
    pub const ALL: [InitStep; 13] = [
        Self::MergeStereotypes,
        Self::Specialize,
        Self::DefaultBindings,
        Self::Primitive,
        Self::Name,
        Self::DeploymentType,
        Self::CheckDeploymentType,
        Self::Scope,
        Self::Serializable,
        Self::Proxyable,
        Self::RequiredTypes,
        Self::InjectionPoints,
        Self::DecorationPoints,
    ];

    /// One-based position in the sequence.
    #[inline]
    pub const fn ordinal(self) -> usize {
        self as usize + 1
    }
}

impl fmt::Display for InitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {:?}", self.ordinal(), Self::ALL.len(), self)
    }
}

// -----------------------------------------------------------------------------
// DefinitionBuilder

/// Runs the initialization sequence for one definition.
///
/// Any failing step aborts the build; nothing is registered. The caller
/// registers the returned definition, usually through
/// [`BootstrapEnvironment::deploy`].
///
/// # Example
///
/// ```
/// use bk_bean::config::ContainerConfig;
/// use bk_bean::definition::{DefinitionBuilder, ManagedStrategy};
/// use bk_bean::environment::BootstrapEnvironment;
/// use bk_reflect::raw::{Annotation, RawClass};
///
/// let env = BootstrapEnvironment::new(&ContainerConfig::default()).unwrap();
/// let class = RawClass::builder("shop.ShoppingCart")
///     .annotation(Annotation::new("SessionScoped"))
///     .annotation(Annotation::new("Named"))
///     .build();
/// let view = env.transformer().annotated_type(&class);
///
/// let definition = DefinitionBuilder::new(&env, ManagedStrategy::new(view)).build();
/// assert!(matches!(
///     definition,
///     Err(bk_bean::DefinitionError::PassivatingNotSerializable { .. })
/// ));
/// ```
pub struct DefinitionBuilder<'a, S> {
    env: &'a BootstrapEnvironment,
    strategy: S,
    step: Option<InitStep>,
}

impl<'a, S: DefinitionStrategy> DefinitionBuilder<'a, S> {
    pub fn new(env: &'a BootstrapEnvironment, strategy: S) -> Self {
        Self {
            env,
            strategy,
            step: None,
        }
    }

    /// The last step entered.
    #[inline]
    pub fn step(&self) -> Option<InitStep> {
        self.step
    }

    fn enter(&mut self, step: InitStep) {
        debug_assert!(self.step < Some(step), "{step} entered out of order");
        self.step = Some(step);
        log::trace!("{}: {step}", self.strategy.id());
    }

    pub fn build(mut self) -> Result<Arc<ComponentDefinition>, DefinitionError> {
        let env = self.env;
        let store = env.store();
        let id = self.strategy.id();
        let kind = self.strategy.kind();
        let declared: Vec<Annotation> = self.strategy.annotated().declared_tags().to_vec();
        let mut flags = DefinitionFlags::empty();
        flags.set(
            DefinitionFlags::NAME_DECLARED,
            declared.iter().any(|a| a.ty() == tags::NAMED),
        );

        self.enter(InitStep::MergeStereotypes);
        let merged = MergedStereotypes::merge(&declared, store);

        self.enter(InitStep::Specialize);
        let mut bindings: Vec<Annotation> = store.filter(&declared, MetaKind::Binding).cloned().collect();
        let mut name: Option<Arc<str>> = None;
        let mut predecessor = None;
        let mut replaces: Option<DefinitionId> = None;
        if self.strategy.is_specializing() {
            flags.insert(DefinitionFlags::SPECIALIZING);
            self.strategy.pre_specialize(env)?;
            let specialized = self.strategy.predecessor(env)?;

            let declares_name = flags.contains(DefinitionFlags::NAME_DECLARED);
            if declares_name && specialized.declares_name() {
                return Err(DefinitionError::SpecializationNameConflict {
                    successor: id,
                    predecessor: specialized.id().clone(),
                });
            }
            bindings.extend(specialized.bindings().iter().cloned());
            if specialized.declares_name() {
                name = specialized.name().cloned();
            } else {
                replaces = Some(specialized.id().clone());
            }
            predecessor = Some((specialized.id().clone(), Arc::downgrade(&specialized)));
        }

        self.enter(InitStep::DefaultBindings);
        resolve_default_bindings(&mut bindings);
        let bindings = env.cache().shared_tags(&bindings);

        self.enter(InitStep::Primitive);
        flags.set(DefinitionFlags::PRIMITIVE, self.strategy.annotated().is_primitive());

        self.enter(InitStep::Name);
        if name.is_none() {
            name = match declared.iter().find(|a| a.ty() == tags::NAMED) {
                Some(named) => match named.value() {
                    Some(value) if !value.is_empty() => Some(value.into()),
                    _ => Some(self.strategy.default_name().into()),
                },
                None if merged.is_name_defaulted() => Some(self.strategy.default_name().into()),
                None => None,
            };
        }

        self.enter(InitStep::DeploymentType);
        let deployment_type = match self.strategy.local_deployment_type(env)? {
            Some(local) => local,
            None => merged
                .deployment_type(env.deployment_types())
                .or_else(|| self.strategy.default_deployment_type(env))
                .ok_or_else(|| DefinitionError::MissingDeploymentType(id.clone()))?,
        };

        self.enter(InitStep::CheckDeploymentType);
        let ty = self.strategy.annotated().raw_type().key().clone();
        if &*deployment_type == tags::STANDARD && !env.is_standard_type(&ty) {
            return Err(DefinitionError::StandardNotAllowed(id));
        }

        self.enter(InitStep::Scope);
        let scope = match self.strategy.local_scope(env)? {
            Some(local) => local,
            None if merged.is_scope_ambiguous() => {
                return Err(DefinitionError::AmbiguousScope {
                    definition: id,
                    scopes: merged.scopes_label(),
                });
            }
            None => merged.single_scope().unwrap_or_else(|| tags::DEPENDENT.into()),
        };
        flags.set(DefinitionFlags::PASSIVATING, store.is_passivating(&scope));

        self.enter(InitStep::Serializable);
        flags.set(
            DefinitionFlags::INTRINSICALLY_SERIALIZABLE,
            self.strategy.is_intrinsically_serializable(),
        );

        self.enter(InitStep::Proxyable);
        flags.set(DefinitionFlags::PROXYABLE, self.strategy.is_proxyable());

        self.enter(InitStep::RequiredTypes);
        let types = env.cache().type_closure(self.strategy.annotated().raw_type());
        if let Some(missing) = merged.required_types().iter().find(|t| !types.contains(t)) {
            return Err(DefinitionError::MissingRequiredType {
                definition: id,
                required: missing.clone(),
            });
        }

        self.enter(InitStep::InjectionPoints);
        let injection_points = self.strategy.collect_injection_points(env)?;

        self.enter(InitStep::DecorationPoints);
        if !kind.is_decorator()
            && let Some(point) = injection_points.iter().find(|p| p.is_decoration_point())
        {
            return Err(DefinitionError::DecorationPointOnNonDecorator {
                definition: id,
                point: alloc::format!("{point}"),
            });
        }

        let definition = ComponentDefinition {
            id,
            kind,
            element: self.strategy.element(),
            name,
            bindings,
            scope,
            deployment_type,
            types,
            flags,
            injection_points: injection_points.into_boxed_slice(),
            predecessor,
        };
        self.strategy.check_implementation(&definition, env)?;
        if let Some(replaced) = &replaces {
            env.specialization().register(replaced, &definition.id)?;
        }

        log::debug!(
            "{definition}: name {:?}, scope {}, deployment type {}, bindings {:?}, flags {:?}",
            definition.name,
            definition.scope,
            definition.deployment_type,
            definition.bindings,
            definition.flags,
        );
        Ok(Arc::new(definition))
    }
}

/// Installs `{Current, Any}` on an empty binding set and adds `Any` to
/// any other. Applying it to its own output changes nothing.
pub fn resolve_default_bindings(bindings: &mut Vec<Annotation>) {
    if bindings.is_empty() {
        bindings.push(Annotation::new(tags::CURRENT));
    }
    if !bindings.iter().any(|b| b.ty() == tags::ANY) {
        bindings.push(Annotation::new(tags::ANY));
    }
}

impl<S: fmt::Debug> fmt::Debug for DefinitionBuilder<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionBuilder")
            .field("strategy", &self.strategy)
            .field("step", &self.step)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;

    use bk_reflect::TypeKey;
    use bk_reflect::raw::{Annotation, Modifiers, RawClass, RawField, RawMethod};

    use super::{InitStep, resolve_default_bindings};
    use crate::DefinitionError;
    use crate::config::{BindingConfig, ContainerConfig, StereotypeConfig};
    use crate::definition::{DefinitionId, DefinitionKind, ProducerMethodStrategy};
    use crate::environment::BootstrapEnvironment;
    use crate::tags;

    fn stereotype(name: &str) -> StereotypeConfig {
        StereotypeConfig {
            name: String::from(name),
            ..StereotypeConfig::default()
        }
    }

    fn env() -> BootstrapEnvironment {
        let mut config = ContainerConfig::default();
        config.deployment_types.push(String::from("Staging"));
        config.deployment_types.push(String::from("Mock"));
        config.bindings.push(BindingConfig {
            name: String::from("Premium"),
            non_binding: vec![],
        });
        config.stereotypes = vec![
            StereotypeConfig {
                scope: Some(String::from(tags::REQUEST_SCOPED)),
                deployment_type: Some(String::from("Mock")),
                named: true,
                ..stereotype("Action")
            },
            StereotypeConfig {
                scope: Some(String::from(tags::APPLICATION_SCOPED)),
                deployment_type: Some(String::from("Staging")),
                ..stereotype("Cached")
            },
            StereotypeConfig {
                required_types: vec![String::from("shop.Service")],
                ..stereotype("ServiceLike")
            },
        ];
        BootstrapEnvironment::new(&config).unwrap()
    }

    fn tag(name: &str) -> Annotation {
        Annotation::new(name)
    }

    fn class(name: &str, tags: &[Annotation]) -> Arc<RawClass> {
        tags.iter()
            .fold(RawClass::builder(name), |b, t| b.annotation(t.clone()))
            .build()
    }

    #[test]
    fn step_order() {
        assert_eq!(InitStep::ALL.len(), 13);
        assert_eq!(InitStep::MergeStereotypes.ordinal(), 1);
        assert_eq!(InitStep::DecorationPoints.ordinal(), 13);
        assert!(InitStep::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn default_bindings() {
        let env = env();
        let cart = env.deploy_class(&class("shop.Cart", &[])).unwrap();
        assert_eq!(cart.bindings(), [tag(tags::ANY), tag(tags::CURRENT)]);

        let premium = env.deploy_class(&class("shop.Premium", &[tag("Premium")])).unwrap();
        assert_eq!(premium.bindings(), [tag(tags::ANY), tag("Premium")]);

        let any = env.deploy_class(&class("shop.Anything", &[tag(tags::ANY)])).unwrap();
        assert_eq!(any.bindings(), [tag(tags::ANY)]);
    }

    #[test]
    fn default_bindings_are_idempotent() {
        let mut bindings = vec![];
        resolve_default_bindings(&mut bindings);
        assert_eq!(bindings, [tag(tags::CURRENT), tag(tags::ANY)]);
        resolve_default_bindings(&mut bindings);
        assert_eq!(bindings, [tag(tags::CURRENT), tag(tags::ANY)]);

        let mut explicit = vec![tag("Premium")];
        resolve_default_bindings(&mut explicit);
        resolve_default_bindings(&mut explicit);
        assert_eq!(explicit, [tag("Premium"), tag(tags::ANY)]);
    }

    #[test]
    fn named_counts_as_binding() {
        let env = env();
        let cart = env
            .deploy_class(&class("shop.Cart", &[tag(tags::NAMED)]))
            .unwrap();
        assert_eq!(cart.bindings(), [tag(tags::ANY), tag(tags::NAMED)]);

        let ty = TypeKey::new("shop.Cart");
        assert!(env.registry().resolve(&ty, &[]).is_empty());
        assert_eq!(env.registry().resolve(&ty, &[tag(tags::ANY)]).len(), 1);
    }

    #[test]
    fn bindings_are_interned() {
        let env = env();
        let a = env.deploy_class(&class("shop.A", &[tag("Premium")])).unwrap();
        let b = env.deploy_class(&class("shop.B", &[tag("Premium"), tag(tags::ANY)])).unwrap();
        assert!(core::ptr::eq(a.bindings(), b.bindings()));
    }

    #[test]
    fn deployment_type_precedence() {
        let env = env();

        let plain = env.deploy_class(&class("shop.Plain", &[])).unwrap();
        assert_eq!(&**plain.deployment_type(), tags::PRODUCTION);

        let both = env
            .deploy_class(&class("shop.Both", &[tag("Cached"), tag("Action"), tag(tags::DEPENDENT)]))
            .unwrap();
        assert_eq!(&**both.deployment_type(), "Mock");

        let local = env
            .deploy_class(&class("shop.Local", &[tag("Action"), tag("Staging")]))
            .unwrap();
        assert_eq!(&**local.deployment_type(), "Staging");

        let err = env
            .deploy_class(&class("shop.Twice", &[tag("Staging"), tag("Mock")]))
            .unwrap_err();
        assert!(matches!(err, DefinitionError::MultipleDeploymentTypes { .. }));
    }

    #[test]
    fn standard_is_reserved() {
        let env = env();
        let err = env
            .deploy_class(&class("shop.Sneaky", &[tag(tags::STANDARD)]))
            .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::StandardNotAllowed(DefinitionId::Class(TypeKey::new("shop.Sneaky")))
        );
        assert!(env.registry().get(&DefinitionId::Class(TypeKey::new("shop.Sneaky"))).is_none());

        let manager = env.deploy_builtin(&class("bk.Manager", &[])).unwrap();
        assert_eq!(manager.kind(), DefinitionKind::BuiltIn);
        assert_eq!(&**manager.deployment_type(), tags::STANDARD);

        let err = env.deploy_builtin(&class("shop.NotInternal", &[])).unwrap_err();
        assert!(matches!(err, DefinitionError::StandardNotAllowed(_)));
    }

    #[test]
    fn scope_resolution() {
        let env = env();

        let err = env
            .deploy_class(&class("shop.Confused", &[tag("Action"), tag("Cached")]))
            .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::AmbiguousScope {
                definition: DefinitionId::Class(TypeKey::new("shop.Confused")),
                scopes: String::from("ApplicationScoped, RequestScoped"),
            }
        );

        let pinned = env
            .deploy_class(&class("shop.Pinned", &[tag("Action"), tag("Cached"), tag(tags::DEPENDENT)]))
            .unwrap();
        assert!(pinned.is_dependent());

        let single = env.deploy_class(&class("shop.Single", &[tag("Cached")])).unwrap();
        assert_eq!(&**single.scope(), tags::APPLICATION_SCOPED);

        let base = class("shop.Base", &[tag(tags::REQUEST_SCOPED)]);
        let derived = RawClass::builder("shop.Derived").superclass(base).build();
        let derived = env.deploy_class(&derived).unwrap();
        assert_eq!(&**derived.scope(), tags::REQUEST_SCOPED);

        let err = env
            .deploy_class(&class("shop.Two", &[tag(tags::REQUEST_SCOPED), tag(tags::APPLICATION_SCOPED)]))
            .unwrap_err();
        assert!(matches!(err, DefinitionError::MultipleScopes { .. }));
    }

    #[test]
    fn names() {
        let env = env();
        let named = |name: &str, tags: &[Annotation]| {
            env.deploy_class(&class(name, tags))
                .unwrap()
                .name()
                .map(|n| String::from(&**n))
        };

        assert_eq!(
            named("shop.Explicit", &[tag(tags::NAMED).with_value("checkout")]).as_deref(),
            Some("checkout")
        );
        assert_eq!(named("shop.EmptyName", &[tag(tags::NAMED).with_value("")]).as_deref(), Some("emptyName"));
        assert_eq!(named("shop.Bare", &[tag(tags::NAMED)]).as_deref(), Some("bare"));
        assert_eq!(named("shop.ByStereotype", &[tag("Action")]).as_deref(), Some("byStereotype"));
        assert_eq!(named("shop.Anonymous", &[]), None);
    }

    #[test]
    fn specialization_naming() {
        let env = env();
        let payment = class("shop.Payment", &[tag(tags::NAMED).with_value("payment")]);
        let base = env.deploy_class(&payment).unwrap();

        let conflict = RawClass::builder("shop.Conflict")
            .superclass(payment.clone())
            .annotation(tag(tags::SPECIALIZES))
            .annotation(tag(tags::NAMED))
            .build();
        assert_eq!(
            env.deploy_class(&conflict).unwrap_err(),
            DefinitionError::SpecializationNameConflict {
                successor: DefinitionId::Class(TypeKey::new("shop.Conflict")),
                predecessor: base.id().clone(),
            }
        );

        let adopting = RawClass::builder("shop.Adopting")
            .superclass(payment)
            .annotation(tag(tags::SPECIALIZES))
            .build();
        let adopting = env.deploy_class(&adopting).unwrap();
        assert_eq!(adopting.name().map(|n| &**n), Some("payment"));
        assert!(!env.specialization().is_specialized(base.id()));
        assert!(Arc::ptr_eq(&adopting.predecessor().unwrap(), &base));
    }

    #[test]
    fn specialization_registers_and_merges_bindings() {
        let env = env();
        let payment = class("shop.Payment", &[tag("Premium")]);
        let base = env.deploy_class(&payment).unwrap();
        let mock = RawClass::builder("shop.MockPayment")
            .superclass(payment)
            .annotation(tag(tags::SPECIALIZES))
            .build();
        let mock = env.deploy_class(&mock).unwrap();

        assert!(mock.is_specializing());
        assert_eq!(mock.bindings(), [tag(tags::ANY), tag("Premium")]);
        assert_eq!(mock.name(), None);
        assert_eq!(env.specialization().successor_of(base.id()).as_ref(), Some(mock.id()));

        let found = env.registry().resolve(&TypeKey::new("shop.Payment"), &[tag("Premium")]);
        assert_eq!(found.len(), 1);
        assert!(Arc::ptr_eq(&found[0], &mock));
    }

    #[test]
    fn failed_successor_leaves_no_specialization() {
        let env = env();
        let payment = class("shop.Payment", &[]);
        let base = env.deploy_class(&payment).unwrap();
        let bad = RawClass::builder("shop.BadPayment")
            .superclass(payment)
            .annotation(tag(tags::SPECIALIZES))
            .annotation(tag(tags::STANDARD))
            .build();

        assert!(matches!(
            env.deploy_class(&bad),
            Err(DefinitionError::StandardNotAllowed(_))
        ));
        assert!(!env.specialization().is_specialized(base.id()));
        assert_eq!(env.registry().resolve(&TypeKey::new("shop.Payment"), &[]).len(), 1);
    }

    #[test]
    fn missing_predecessor() {
        let env = env();
        let orphan = RawClass::builder("shop.Orphan")
            .superclass(class("shop.Undeployed", &[]))
            .annotation(tag(tags::SPECIALIZES))
            .build();
        assert!(matches!(
            env.deploy_class(&orphan),
            Err(DefinitionError::MissingPredecessor(_))
        ));

        let rootless = class("shop.Rootless", &[tag(tags::SPECIALIZES)]);
        assert!(matches!(
            env.deploy_class(&rootless),
            Err(DefinitionError::InvalidSpecialization(_))
        ));
    }

    #[test]
    fn required_types() {
        let env = env();
        let err = env
            .deploy_class(&class("shop.Loose", &[tag("ServiceLike")]))
            .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::MissingRequiredType {
                definition: DefinitionId::Class(TypeKey::new("shop.Loose")),
                required: TypeKey::new("shop.Service"),
            }
        );

        let service = RawClass::builder("shop.Service")
            .modifiers(Modifiers::PUBLIC | Modifiers::INTERFACE)
            .build();
        let strict = RawClass::builder("shop.Strict")
            .interface(service)
            .annotation(tag("ServiceLike"))
            .build();
        assert!(env.deploy_class(&strict).is_ok());
    }

    #[test]
    fn decoration_points() {
        let env = env();
        let payment = class("shop.Payment", &[]);
        let delegate = || RawField::new("delegate", payment.clone()).with_annotation(tag(tags::DECORATES));

        let stray = RawClass::builder("shop.Stray").field(delegate()).build();
        assert!(matches!(
            env.deploy_class(&stray),
            Err(DefinitionError::DecorationPointOnNonDecorator { .. })
        ));

        let decorator = RawClass::builder("shop.Audit")
            .modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT)
            .annotation(tag(tags::DECORATOR))
            .field(delegate())
            .build();
        let decorator = env.deploy_class(&decorator).unwrap();
        assert_eq!(decorator.kind(), DefinitionKind::Decorator);
        assert_eq!(decorator.injection_points().len(), 1);

        let empty = class("shop.Empty", &[tag(tags::DECORATOR)]);
        assert_eq!(
            env.deploy_class(&empty).unwrap_err(),
            DefinitionError::DecorationPointCount {
                definition: DefinitionId::Class(TypeKey::new("shop.Empty")),
                found: 0,
            }
        );
    }

    #[test]
    fn managed_checks() {
        let env = env();

        let inner = RawClass::builder("shop.Outer$Inner").modifiers(Modifiers::MEMBER).build();
        assert!(matches!(env.deploy_class(&inner), Err(DefinitionError::InnerClass(_))));

        let nested = RawClass::builder("shop.Outer$Nested")
            .modifiers(Modifiers::MEMBER | Modifiers::STATIC)
            .build();
        assert!(env.deploy_class(&nested).is_ok());

        let abstract_class = RawClass::builder("shop.Abstract").modifiers(Modifiers::ABSTRACT).build();
        assert!(matches!(env.deploy_class(&abstract_class), Err(DefinitionError::AbstractClass(_))));

        let exposed = RawClass::builder("shop.Exposed")
            .annotation(tag(tags::REQUEST_SCOPED))
            .field(RawField::new("total", RawClass::primitive("int")).with_modifiers(Modifiers::PUBLIC))
            .build();
        assert!(matches!(
            env.deploy_class(&exposed),
            Err(DefinitionError::PublicFieldNotDependent { .. })
        ));

        let session = RawClass::builder("shop.Session")
            .annotation(tag(tags::SESSION_SCOPED))
            .build();
        assert!(matches!(
            env.deploy_class(&session),
            Err(DefinitionError::PassivatingNotSerializable { .. })
        ));
    }

    #[test]
    fn producer_methods() {
        let env = env();
        let int = RawClass::primitive("int");
        let type_var = RawClass::builder("T").modifiers(Modifiers::TYPE_VARIABLE).build();
        let factory = RawClass::builder("shop.Factory")
            .annotation(tag("Staging"))
            .method(
                RawMethod::new("getPrice", int)
                    .with_annotation(tag(tags::PRODUCES))
                    .with_annotation(tag(tags::NAMED)),
            )
            .method(RawMethod::new("create", type_var).with_annotation(tag(tags::PRODUCES)))
            .build();
        let declaring = env.deploy_class(&factory).unwrap();
        let ty = declaring.element().as_type().unwrap().clone();

        let price = env
            .deploy(ProducerMethodStrategy::new(declaring.clone(), ty.methods()[0].clone()))
            .unwrap();
        assert_eq!(price.kind(), DefinitionKind::ProducerMethod);
        assert_eq!(price.name().map(|n| &**n), Some("price"));
        assert_eq!(&**price.deployment_type(), "Staging");
        assert!(price.is_primitive());
        assert!(!price.is_proxyable());
        assert!(price.is_intrinsically_serializable());

        let err = env
            .deploy(ProducerMethodStrategy::new(declaring, ty.methods()[1].clone()))
            .unwrap_err();
        assert!(matches!(err, DefinitionError::ProducerTypeVariable(_)));
    }

    #[test]
    fn specializing_producer_must_override() {
        let env = env();
        let item = class("shop.Item", &[]);
        let base = RawClass::builder("shop.Shop")
            .method(RawMethod::new("item", item.clone()).with_annotation(tag(tags::PRODUCES)))
            .build();
        let base_def = env.deploy_class(&base).unwrap();
        let base_producers = env.deploy_producers(&base_def).unwrap();

        let derived = RawClass::builder("shop.MockShop")
            .superclass(base)
            .method(
                RawMethod::new("item", item.clone())
                    .with_annotation(tag(tags::PRODUCES))
                    .with_annotation(tag(tags::SPECIALIZES)),
            )
            .method(
                RawMethod::new("other", item)
                    .with_annotation(tag(tags::PRODUCES))
                    .with_annotation(tag(tags::SPECIALIZES)),
            )
            .build();
        let derived_def = env.deploy_class(&derived).unwrap();
        let ty = derived_def.element().as_type().unwrap().clone();

        let overriding = env
            .deploy(ProducerMethodStrategy::new(derived_def.clone(), ty.methods()[0].clone()))
            .unwrap();
        assert_eq!(overriding.predecessor_id(), Some(base_producers[0].id()));
        assert!(env.specialization().is_specialized(base_producers[0].id()));

        let err = env
            .deploy(ProducerMethodStrategy::new(derived_def, ty.methods()[1].clone()))
            .unwrap_err();
        assert!(matches!(err, DefinitionError::ProducerNotOverriding(_)));
    }
}
