use alloc::sync::Arc;
use core::fmt;
use core::marker::PhantomData;

use ::serde::de::{DeserializeSeed, Error};
use ::serde::{Deserialize, Deserializer};

use super::{ProxyTarget, SerializationProxy};
use crate::transformer::ClassTransformer;

// -----------------------------------------------------------------------------
// ViewDeserializer

/// Reads a [`SerializationProxy`] and resolves it to the canonical view.
///
/// The token must stand for a view of type `T`, tokens of another kind
/// are rejected with [`ProxyError::KindMismatch`](crate::ProxyError::KindMismatch).
pub struct ViewDeserializer<'a, T> {
    transformer: &'a ClassTransformer,
    marker: PhantomData<fn() -> T>,
}

impl<'a, T> ViewDeserializer<'a, T> {
    #[inline]
    pub const fn new(transformer: &'a ClassTransformer) -> Self {
        Self {
            transformer,
            marker: PhantomData,
        }
    }
}

impl<T> Clone for ViewDeserializer<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ViewDeserializer<'_, T> {}

impl<T> fmt::Debug for ViewDeserializer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewDeserializer")
            .field("view", &core::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<'de, T: ProxyTarget> DeserializeSeed<'de> for ViewDeserializer<'_, T> {
    type Value = Arc<T>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        let token = SerializationProxy::deserialize(deserializer)?;
        token
            .resolve(self.transformer)
            .and_then(T::from_resolved)
            .map_err(D::Error::custom)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::sync::Arc;

    use ::serde::de::DeserializeSeed;

    use super::ViewDeserializer;
    use crate::cache::SharedObjectCache;
    use crate::raw::{Annotation, ClassSet, RawClass, RawConstructor, RawField, RawParameter};
    use crate::transformer::ClassTransformer;
    use crate::view::{AnnotatedField, AnnotatedParameter, AnnotatedType};

    fn cart() -> Arc<RawClass> {
        let item = RawClass::builder("shop.Item").build();
        RawClass::builder("shop.Cart")
            .field(RawField::new("item", item.clone()).with_annotation(Annotation::new("Inject")))
            .constructor(
                RawConstructor::new()
                    .with_parameter(RawParameter::new(item.clone()))
                    .with_parameter(RawParameter::new(item).with_annotation(Annotation::new("Named"))),
            )
            .build()
    }

    #[test]
    fn parameter_round_trip_is_identity() {
        let transformer = ClassTransformer::new(Arc::new(SharedObjectCache::new()));
        let view = transformer.annotated_type(&cart());
        let param = view.constructors()[0].parameters()[1].clone();

        let json = serde_json::to_string(&*param).unwrap();
        let mut de = serde_json::Deserializer::from_str(&json);
        let restored = ViewDeserializer::<AnnotatedParameter>::new(&transformer)
            .deserialize(&mut de)
            .unwrap();

        assert!(Arc::ptr_eq(&param, &restored));
        assert_eq!(restored.position(), 1);
    }

    #[test]
    fn round_trip_into_fresh_transformer_loads_class() {
        let first = ClassTransformer::new(Arc::new(SharedObjectCache::new()));
        let field = first.annotated_type(&cart()).fields()[0].clone();
        let text = ron::to_string(&*field).unwrap();

        let source: ClassSet = [cart()].into_iter().collect();
        let second = ClassTransformer::new(Arc::new(SharedObjectCache::new()))
            .with_source(Arc::new(source));
        let mut de = ron::Deserializer::from_str(&text).unwrap();
        let restored = ViewDeserializer::<AnnotatedField>::new(&second)
            .deserialize(&mut de)
            .unwrap();

        assert_eq!(*restored, *field);
        assert!(!Arc::ptr_eq(&restored, &field));
        let canonical = second.annotated_type(&cart());
        assert!(Arc::ptr_eq(&restored, &canonical.fields()[0]));
    }

    #[test]
    fn kind_mismatch_is_reported() {
        let transformer = ClassTransformer::new(Arc::new(SharedObjectCache::new()));
        let view = transformer.annotated_type(&cart());
        let json = serde_json::to_string(&*view).unwrap();

        let mut de = serde_json::Deserializer::from_str(&json);
        let err = ViewDeserializer::<AnnotatedField>::new(&transformer)
            .deserialize(&mut de)
            .unwrap_err();
        assert!(err.to_string().contains("expected a AnnotatedField"));

        let mut de = serde_json::Deserializer::from_str(&json);
        let ok = ViewDeserializer::<AnnotatedType>::new(&transformer).deserialize(&mut de);
        assert!(ok.is_ok());
    }
}
