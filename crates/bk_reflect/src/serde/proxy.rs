use alloc::sync::Arc;

use ::serde::{Deserialize, Serialize};

use crate::error::ProxyError;
use crate::key::{MemberKey, MemberKind, ParameterKey, TypeKey};
use crate::transformer::ClassTransformer;
use crate::view::{AnnotatedConstructor, AnnotatedField, AnnotatedMethod};
use crate::view::{AnnotatedParameter, AnnotatedType};

// -----------------------------------------------------------------------------
// SerializationProxy

/// The persisted form of a metadata view.
///
/// Holds the structural identity of the view and nothing else. A parameter
/// token is the serializable identity of its callable plus a position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SerializationProxy {
    Type(TypeKey),
    Field(MemberKey),
    Method(MemberKey),
    Constructor(MemberKey),
    Parameter(ParameterKey),
}

impl SerializationProxy {
    /// Returns the kind of view this token stands for.
    pub const fn view_name(&self) -> &'static str {
        match self {
            Self::Type(_) => AnnotatedType::VIEW_NAME,
            Self::Field(_) => AnnotatedField::VIEW_NAME,
            Self::Method(_) => AnnotatedMethod::VIEW_NAME,
            Self::Constructor(_) => AnnotatedConstructor::VIEW_NAME,
            Self::Parameter(_) => AnnotatedParameter::VIEW_NAME,
        }
    }

    /// Resolves the token to the canonical view held by `transformer`.
    ///
    /// Classes the transformer has not seen yet are loaded through its
    /// [`ClassSource`](crate::raw::ClassSource).
    pub fn resolve(&self, transformer: &ClassTransformer) -> Result<ResolvedView, ProxyError> {
        let resolved = match self {
            Self::Type(key) => ResolvedView::Type(transformer.load(key)?),
            Self::Field(key) => ResolvedView::Field(transformer.field(key)?),
            Self::Method(key) => ResolvedView::Method(transformer.method(key)?),
            Self::Constructor(key) => ResolvedView::Constructor(transformer.constructor(key)?),
            Self::Parameter(key) => ResolvedView::Parameter(transformer.parameter(key)?),
        };
        log::trace!("resolved {} proxy", self.view_name());
        Ok(resolved)
    }
}

impl From<&MemberKey> for SerializationProxy {
    fn from(key: &MemberKey) -> Self {
        match key.kind() {
            MemberKind::Field => Self::Field(key.clone()),
            MemberKind::Method => Self::Method(key.clone()),
            MemberKind::Constructor => Self::Constructor(key.clone()),
        }
    }
}

// -----------------------------------------------------------------------------
// ResolvedView

/// A canonical view obtained from a [`SerializationProxy`].
#[derive(Debug, Clone)]
pub enum ResolvedView {
    Type(Arc<AnnotatedType>),
    Field(Arc<AnnotatedField>),
    Method(Arc<AnnotatedMethod>),
    Constructor(Arc<AnnotatedConstructor>),
    Parameter(Arc<AnnotatedParameter>),
}

impl ResolvedView {
    pub const fn view_name(&self) -> &'static str {
        match self {
            Self::Type(_) => AnnotatedType::VIEW_NAME,
            Self::Field(_) => AnnotatedField::VIEW_NAME,
            Self::Method(_) => AnnotatedMethod::VIEW_NAME,
            Self::Constructor(_) => AnnotatedConstructor::VIEW_NAME,
            Self::Parameter(_) => AnnotatedParameter::VIEW_NAME,
        }
    }
}

// -----------------------------------------------------------------------------
// ProxyTarget

/// A view written as a [`SerializationProxy`].
pub trait ProxyTarget: Sized {
    /// Type name used in error messages.
    const VIEW_NAME: &'static str;

    /// The token standing for `self`.
    fn to_proxy(&self) -> SerializationProxy;

    /// Extracts the view from a resolved token of the matching kind.
    fn from_resolved(view: ResolvedView) -> Result<Arc<Self>, ProxyError>;
}

macro_rules! impl_proxy_target {
    ($ty:ident, $variant:ident, |$this:ident| $token:expr) => {
        impl ProxyTarget for $ty {
            const VIEW_NAME: &'static str = stringify!($ty);

            #[inline]
            fn to_proxy(&self) -> SerializationProxy {
                let $this = self;
                SerializationProxy::$variant($token)
            }

            fn from_resolved(view: ResolvedView) -> Result<Arc<Self>, ProxyError> {
                match view {
                    ResolvedView::$variant(view) => Ok(view),
                    other => Err(ProxyError::KindMismatch {
                        expected: Self::VIEW_NAME,
                        found: other.view_name(),
                    }),
                }
            }
        }
    };
}

impl_proxy_target!(AnnotatedType, Type, |this| this.key().clone());
impl_proxy_target!(AnnotatedField, Field, |this| this.key().clone());
impl_proxy_target!(AnnotatedMethod, Method, |this| this.key().clone());
impl_proxy_target!(AnnotatedConstructor, Constructor, |this| this.key().clone());
impl_proxy_target!(AnnotatedParameter, Parameter, |this| this.key().clone());

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::{ProxyTarget, ResolvedView, SerializationProxy};
    use crate::ProxyError;
    use crate::cache::SharedObjectCache;
    use crate::key::{MemberKey, TypeKey};
    use crate::raw::{RawClass, RawField, RawMethod, RawParameter};
    use crate::transformer::ClassTransformer;
    use crate::view::{AnnotatedField, AnnotatedMethod};

    #[test]
    fn resolve_method_and_parameter() {
        let item = RawClass::builder("shop.Item").build();
        let cart = RawClass::builder("shop.Cart")
            .field(RawField::new("last", item.clone()))
            .method(RawMethod::new("add", item.clone()).with_parameter(RawParameter::new(item)))
            .build();
        let transformer = ClassTransformer::new(Arc::new(SharedObjectCache::new()));
        let view = transformer.annotated_type(&cart);
        let add = view.methods()[0].clone();

        let token = add.to_proxy();
        let resolved = token.resolve(&transformer).unwrap();
        let method = AnnotatedMethod::from_resolved(resolved).unwrap();
        assert!(Arc::ptr_eq(&method, &add));

        let param = add.parameters()[0].to_proxy();
        match param.resolve(&transformer).unwrap() {
            ResolvedView::Parameter(p) => assert!(Arc::ptr_eq(&p, &add.parameters()[0])),
            other => panic!("unexpected {other:?}"),
        }

        let field_token = SerializationProxy::from(&MemberKey::field(view.key().clone(), "last"));
        let resolved = field_token.resolve(&transformer).unwrap();
        assert_eq!(
            AnnotatedMethod::from_resolved(resolved).unwrap_err(),
            ProxyError::KindMismatch {
                expected: "AnnotatedMethod",
                found: AnnotatedField::VIEW_NAME,
            }
        );
    }

    #[test]
    fn unknown_type() {
        let transformer = ClassTransformer::new(Arc::new(SharedObjectCache::new()));
        let token = SerializationProxy::Type(TypeKey::new("shop.Gone"));
        assert_eq!(
            token.resolve(&transformer).unwrap_err(),
            ProxyError::UnknownType(TypeKey::new("shop.Gone"))
        );
    }
}
