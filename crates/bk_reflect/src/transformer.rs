//! Canonical, interned metadata views.

use alloc::sync::Arc;
use std::sync::{PoisonError, RwLock};

use bk_utils::hash::HashMap;

use crate::cache::SharedObjectCache;
use crate::error::{InvariantViolation, ProxyError};
use crate::key::{MemberKey, MemberKind, ParameterKey, TypeKey};
use crate::raw::{ClassSource, RawClass};
use crate::serde::ResolvedView;
use crate::view::{AnnotatedConstructor, AnnotatedField, AnnotatedMethod};
use crate::view::{AnnotatedParameter, AnnotatedType};

// -----------------------------------------------------------------------------
// ClassTransformer

/// Hands out one canonical [`AnnotatedType`] per class.
///
/// Every view reachable from a canonical type (its superclass, members and
/// parameters) is canonical as well, so looking an element up by key twice
/// yields the same `Arc`. This is what lets the
/// [serialization proxy](crate::serde) restore the very instance that was
/// persisted.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use bk_reflect::cache::SharedObjectCache;
/// use bk_reflect::raw::RawClass;
/// use bk_reflect::transformer::ClassTransformer;
///
/// let transformer = ClassTransformer::new(Arc::new(SharedObjectCache::new()));
/// let class = RawClass::builder("shop.Cart").build();
///
/// let a = transformer.annotated_type(&class);
/// let b = transformer.annotated_type(&class);
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct ClassTransformer {
    cache: Arc<SharedObjectCache>,
    source: Option<Arc<dyn ClassSource>>,
    types: RwLock<HashMap<TypeKey, Arc<AnnotatedType>>>,
}

impl ClassTransformer {
    pub fn new(cache: Arc<SharedObjectCache>) -> Self {
        Self {
            cache,
            source: None,
            types: RwLock::new(HashMap::default()),
        }
    }

    /// Sets the collaborator used to load classes named by proxy tokens.
    pub fn with_source(mut self, source: Arc<dyn ClassSource>) -> Self {
        self.source = Some(source);
        self
    }

    #[inline]
    pub fn cache(&self) -> &Arc<SharedObjectCache> {
        &self.cache
    }

    /// Returns the canonical view of `raw`, building it on first request.
    pub fn annotated_type(&self, raw: &Arc<RawClass>) -> Arc<AnnotatedType> {
        if let Some(view) = self.get(raw.key()) {
            return view;
        }

        let superclass = raw.superclass().map(|s| self.annotated_type(s));
        let built = Arc::new(AnnotatedType::with_superclass(
            raw.clone(),
            superclass,
            &self.cache,
        ));
        log::trace!("transformed {}", raw.key());

        self.types
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(raw.key().clone())
            .or_insert(built)
            .clone()
    }

    /// Returns the canonical view of the class, if it was transformed.
    pub fn get(&self, key: &TypeKey) -> Option<Arc<AnnotatedType>> {
        let view = self
            .types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()?;

        if view.key() != key {
            InvariantViolation::IdentityMismatch {
                requested: key.as_str().into(),
                found: view.key().as_str().into(),
            }
            .handle_error();
        }
        Some(view)
    }

    /// Returns the canonical view of the class, loading it from the class
    /// source if it was not transformed yet.
    pub fn load(&self, key: &TypeKey) -> Result<Arc<AnnotatedType>, ProxyError> {
        if let Some(view) = self.get(key) {
            return Ok(view);
        }
        self.source
            .as_ref()
            .and_then(|source| source.load(key))
            .map(|raw| self.annotated_type(&raw))
            .ok_or_else(|| ProxyError::UnknownType(key.clone()))
    }

    pub fn field(&self, key: &MemberKey) -> Result<Arc<AnnotatedField>, ProxyError> {
        let owner = self.load(key.declaring())?;
        let found = match key.kind() {
            MemberKind::Field => owner.field(key.name()).cloned(),
            _ => None,
        };
        found.ok_or_else(|| ProxyError::UnknownMember(key.clone()))
    }

    pub fn method(&self, key: &MemberKey) -> Result<Arc<AnnotatedMethod>, ProxyError> {
        let owner = self.load(key.declaring())?;
        let found = match key.kind() {
            MemberKind::Method => owner.method(key.name(), key.signature()).cloned(),
            _ => None,
        };
        found.ok_or_else(|| ProxyError::UnknownMember(key.clone()))
    }

    pub fn constructor(&self, key: &MemberKey) -> Result<Arc<AnnotatedConstructor>, ProxyError> {
        let owner = self.load(key.declaring())?;
        let found = match key.kind() {
            MemberKind::Constructor => owner.constructor(key.signature()).cloned(),
            _ => None,
        };
        found.ok_or_else(|| ProxyError::UnknownMember(key.clone()))
    }

    /// Looks up a member of any kind.
    pub fn member(&self, key: &MemberKey) -> Result<ResolvedView, ProxyError> {
        Ok(match key.kind() {
            MemberKind::Field => ResolvedView::Field(self.field(key)?),
            MemberKind::Method => ResolvedView::Method(self.method(key)?),
            MemberKind::Constructor => ResolvedView::Constructor(self.constructor(key)?),
        })
    }

    pub fn parameter(&self, key: &ParameterKey) -> Result<Arc<AnnotatedParameter>, ProxyError> {
        let owner = self.load(key.callable().declaring())?;
        let parameters = owner
            .callable_parameters(key.callable())
            .ok_or_else(|| ProxyError::UnknownMember(key.callable().clone()))?;
        parameters
            .get(key.position() as usize)
            .cloned()
            .ok_or_else(|| ProxyError::UnknownParameter(key.clone()))
    }

    /// Number of canonical types.
    pub fn len(&self) -> usize {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Forgets every canonical view. Called on container shutdown.
    pub fn clear(&self) {
        self.types
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl core::fmt::Debug for ClassTransformer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClassTransformer")
            .field("types", &self.len())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::ClassTransformer;
    use crate::ProxyError;
    use crate::cache::SharedObjectCache;
    use crate::key::{MemberKey, ParameterKey, TypeKey};
    use crate::raw::{ClassSet, RawClass, RawConstructor, RawField, RawParameter};
    use crate::serde::ResolvedView;

    fn fixture() -> Arc<RawClass> {
        let item = RawClass::builder("shop.Item").build();
        let base = RawClass::builder("shop.Base").build();
        RawClass::builder("shop.Cart")
            .superclass(base)
            .field(RawField::new("first", item.clone()))
            .constructor(RawConstructor::new().with_parameter(RawParameter::new(item)))
            .build()
    }

    #[test]
    fn superclass_views_are_canonical() {
        let transformer = ClassTransformer::new(Arc::new(SharedObjectCache::new()));
        let cart = transformer.annotated_type(&fixture());
        let base = transformer.get(&TypeKey::new("shop.Base")).unwrap();
        assert!(Arc::ptr_eq(cart.superclass().unwrap(), &base));
        assert_eq!(transformer.len(), 2);
    }

    #[test]
    fn member_lookups() {
        let transformer = ClassTransformer::new(Arc::new(SharedObjectCache::new()));
        let cart = transformer.annotated_type(&fixture());

        let field_key = MemberKey::field(cart.key().clone(), "first");
        let field = transformer.field(&field_key).unwrap();
        assert!(Arc::ptr_eq(&field, &cart.fields()[0]));

        let ctor = cart.constructors()[0].clone();
        let param_key = ParameterKey::new(ctor.key().clone(), 0);
        let param = transformer.parameter(&param_key).unwrap();
        assert!(Arc::ptr_eq(&param, &ctor.parameters()[0]));

        let missing = ParameterKey::new(ctor.key().clone(), 3);
        assert_eq!(
            transformer.parameter(&missing),
            Err(ProxyError::UnknownParameter(missing.clone()))
        );
        assert!(transformer.method(&field_key).is_err());
        assert!(matches!(transformer.member(&field_key), Ok(ResolvedView::Field(_))));
    }

    #[test]
    fn load_through_class_source() {
        let source: ClassSet = [fixture()].into_iter().collect();
        let transformer = ClassTransformer::new(Arc::new(SharedObjectCache::new()))
            .with_source(Arc::new(source));

        assert!(transformer.get(&TypeKey::new("shop.Cart")).is_none());
        let loaded = transformer.load(&TypeKey::new("shop.Cart")).unwrap();
        assert!(Arc::ptr_eq(&loaded, &transformer.get(loaded.key()).unwrap()));
        assert!(matches!(
            transformer.load(&TypeKey::new("shop.Nope")),
            Err(ProxyError::UnknownType(_))
        ));
    }
}
