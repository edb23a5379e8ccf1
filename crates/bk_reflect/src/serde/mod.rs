//! Serialization support for metadata views.
//!
//! Views wrap reflective handles that cannot be persisted. Serializing a
//! view writes a [`SerializationProxy`] instead: a token made of the
//! structural key only. Restoring goes the other way, the token is
//! resolved through a [`ClassTransformer`] to the canonical view, so the
//! instance obtained after a round trip is the very one that was written.
//!
//! Deserializing a view type directly always fails with
//! [`ProxyError::ProxyRequired`]: it would produce a copy that is not
//! interned.
//!
//! ## Menu
//!
//! - [`SerializationProxy`]: the persisted token, with [`resolve`](SerializationProxy::resolve).
//! - [`ResolvedView`]: what a token resolves to.
//! - [`ProxyTarget`]: the views that can be written as a token.
//! - [`ViewDeserializer`]: a [`DeserializeSeed`] reading a token and
//!   returning the canonical `Arc` of the expected view type.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use bk_reflect::cache::SharedObjectCache;
//! use bk_reflect::raw::RawClass;
//! use bk_reflect::serde::ViewDeserializer;
//! use bk_reflect::transformer::ClassTransformer;
//! use bk_reflect::view::AnnotatedType;
//! use serde::de::DeserializeSeed;
//!
//! let transformer = ClassTransformer::new(Arc::new(SharedObjectCache::new()));
//! let view = transformer.annotated_type(&RawClass::builder("shop.Cart").build());
//!
//! let json = serde_json::to_string(&*view).unwrap();
//! let mut de = serde_json::Deserializer::from_str(&json);
//! let restored = ViewDeserializer::<AnnotatedType>::new(&transformer)
//!     .deserialize(&mut de)
//!     .unwrap();
//!
//! assert!(Arc::ptr_eq(&view, &restored));
//! ```
//!
//! [`ClassTransformer`]: crate::transformer::ClassTransformer
//! [`ProxyError::ProxyRequired`]: crate::ProxyError::ProxyRequired
//! [`DeserializeSeed`]: ::serde::de::DeserializeSeed

// -----------------------------------------------------------------------------
// Modules

mod impls;
mod proxy;
mod seed;

// -----------------------------------------------------------------------------
// Exports

pub use proxy::{ProxyTarget, ResolvedView, SerializationProxy};
pub use seed::ViewDeserializer;
