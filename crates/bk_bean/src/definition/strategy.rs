use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use bk_reflect::Annotated;
use bk_reflect::raw::{Modifiers, RawClass};

use super::{ComponentDefinition, DefinitionElement, DefinitionId, DefinitionKind};
use crate::DefinitionError;
use crate::environment::BootstrapEnvironment;
use crate::injection::InjectionPoint;
use crate::meta::MetaKind;
use crate::tags;

// -----------------------------------------------------------------------------
// DefinitionStrategy

/// The steps of definition building that depend on the lifecycle category.
///
/// The [`DefinitionBuilder`](super::DefinitionBuilder) calls these in the
/// fixed order of [`InitStep`](super::InitStep). Provided methods read the
/// tags declared on [`annotated`](Self::annotated).
pub trait DefinitionStrategy {
    fn kind(&self) -> DefinitionKind;

    fn id(&self) -> DefinitionId;

    /// The view the definition is built from.
    fn element(&self) -> DefinitionElement;

    fn annotated(&self) -> &dyn Annotated;

    fn is_specializing(&self) -> bool {
        self.annotated().is_annotation_present(tags::SPECIALIZES)
    }

    /// Checks run before the predecessor is looked up.
    fn pre_specialize(&self, _env: &BootstrapEnvironment) -> Result<(), DefinitionError> {
        Ok(())
    }

    /// The definition this one specializes.
    fn predecessor(
        &self,
        env: &BootstrapEnvironment,
    ) -> Result<Arc<ComponentDefinition>, DefinitionError>;

    /// The name used when a name is requested but not given.
    fn default_name(&self) -> String;

    /// The deployment type declared on the element itself.
    fn local_deployment_type(
        &self,
        env: &BootstrapEnvironment,
    ) -> Result<Option<Arc<str>>, DefinitionError> {
        let declared = self.annotated().declared_tags();
        let mut found = env.store().filter(declared, MetaKind::DeploymentType);
        match (found.next(), found.next()) {
            (None, _) => Ok(None),
            (Some(ty), None) => Ok(Some(ty.ty().into())),
            (Some(_), Some(_)) => Err(DefinitionError::MultipleDeploymentTypes {
                definition: self.id(),
                found: tag_list(env.store().filter(declared, MetaKind::DeploymentType)),
            }),
        }
    }

    /// The deployment type used when neither the element nor its
    /// stereotypes give one.
    fn default_deployment_type(&self, _env: &BootstrapEnvironment) -> Option<Arc<str>> {
        Some(tags::PRODUCTION.into())
    }

    /// The scope declared on the element itself.
    fn local_scope(&self, env: &BootstrapEnvironment) -> Result<Option<Arc<str>>, DefinitionError> {
        single_scope(self.annotated(), env, || alloc::format!("{}", self.id()))
    }

    fn is_intrinsically_serializable(&self) -> bool {
        self.annotated().is_serializable()
    }

    fn is_proxyable(&self) -> bool {
        is_proxyable_class(self.annotated().raw_type())
    }

    fn collect_injection_points(
        &self,
        env: &BootstrapEnvironment,
    ) -> Result<Vec<InjectionPoint>, DefinitionError>;

    /// Category-specific validation of the resolved definition.
    fn check_implementation(
        &self,
        _definition: &ComponentDefinition,
        _env: &BootstrapEnvironment,
    ) -> Result<(), DefinitionError> {
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// Returns `true` if the container can create a client proxy for the class.
///
/// Interfaces always can. Classes must not be final, primitive or arrays,
/// must not declare a final instance method anywhere in their hierarchy,
/// and need a non-private constructor without parameters.
pub fn is_proxyable_class(class: &RawClass) -> bool {
    let modifiers = class.modifiers();
    if modifiers.intersects(Modifiers::PRIMITIVE | Modifiers::ARRAY) {
        return false;
    }
    if modifiers.contains(Modifiers::INTERFACE) {
        return true;
    }
    if modifiers.contains(Modifiers::FINAL) || declares_final_method(class) {
        return false;
    }
    class
        .no_args_constructor()
        .is_some_and(|c| !c.modifiers().contains(Modifiers::PRIVATE))
}

fn declares_final_method(class: &RawClass) -> bool {
    let mut current = Some(class);
    while let Some(class) = current {
        let sealed = class.methods().iter().any(|m| {
            let modifiers = m.modifiers();
            modifiers.contains(Modifiers::FINAL)
                && !modifiers.intersects(Modifiers::STATIC | Modifiers::PRIVATE)
        });
        if sealed {
            return true;
        }
        current = class.superclass().map(|s| &**s);
    }
    false
}

/// Lower-cases the first character, unless the first two are both upper
/// case (`URLResolver` stays as is).
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if chars.next().is_some_and(char::is_uppercase) && first.is_uppercase() {
        return String::from(name);
    }
    let mut out: String = first.to_lowercase().collect();
    out.push_str(&name[first.len_utf8()..]);
    out
}

/// The scope tag declared on `annotated`, at most one.
pub(super) fn single_scope(
    annotated: &dyn Annotated,
    env: &BootstrapEnvironment,
    label: impl FnOnce() -> String,
) -> Result<Option<Arc<str>>, DefinitionError> {
    let declared = annotated.declared_tags();
    let mut found = env.store().filter(declared, MetaKind::Scope);
    match (found.next(), found.next()) {
        (None, _) => Ok(None),
        (Some(scope), None) => Ok(Some(scope.ty().into())),
        (Some(_), Some(_)) => Err(DefinitionError::MultipleScopes {
            element: label(),
            scopes: tag_list(env.store().filter(declared, MetaKind::Scope)),
        }),
    }
}

pub(super) fn tag_list<'a>(tags: impl Iterator<Item = &'a bk_reflect::raw::Annotation>) -> String {
    let mut list = String::new();
    for (i, tag) in tags.enumerate() {
        if i > 0 {
            list.push_str(", ");
        }
        list.push_str(tag.ty());
    }
    list
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use bk_reflect::raw::{Modifiers, RawClass, RawConstructor, RawMethod};

    use super::{decapitalize, is_proxyable_class};

    #[test]
    fn names() {
        assert_eq!(decapitalize("ShoppingCart"), "shoppingCart");
        assert_eq!(decapitalize("URLResolver"), "URLResolver");
        assert_eq!(decapitalize("A"), "a");
        assert_eq!(decapitalize(""), "");
    }

    #[test]
    fn proxyable() {
        let open = RawClass::builder("shop.Open").build();
        let sealed = RawClass::builder("shop.Sealed").modifiers(Modifiers::FINAL).build();
        let private = RawClass::builder("shop.Private")
            .constructor(RawConstructor::new().with_modifiers(Modifiers::PRIVATE))
            .build();
        let api = RawClass::builder("shop.Api")
            .modifiers(Modifiers::INTERFACE | Modifiers::PUBLIC)
            .build();

        assert!(is_proxyable_class(&open));
        assert!(!is_proxyable_class(&sealed));
        assert!(!is_proxyable_class(&private));
        assert!(is_proxyable_class(&api));
        assert!(!is_proxyable_class(&RawClass::primitive("int")));
    }

    #[test]
    fn final_methods_block_proxies() {
        let int = RawClass::primitive("int");
        let base = RawClass::builder("shop.Base")
            .method(RawMethod::new("total", int.clone()).with_modifiers(Modifiers::PUBLIC | Modifiers::FINAL))
            .build();
        let derived = RawClass::builder("shop.Derived").superclass(base.clone()).build();
        let helpers = RawClass::builder("shop.Helpers")
            .method(RawMethod::new("of", int.clone()).with_modifiers(Modifiers::STATIC | Modifiers::FINAL))
            .method(RawMethod::new("hidden", int).with_modifiers(Modifiers::PRIVATE | Modifiers::FINAL))
            .build();

        assert!(!is_proxyable_class(&base));
        assert!(!is_proxyable_class(&derived));
        assert!(is_proxyable_class(&helpers));
    }
}
