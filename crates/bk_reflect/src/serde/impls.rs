use ::serde::de::Error;
use ::serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ProxyTarget;
use crate::error::ProxyError;
use crate::view::{AnnotatedConstructor, AnnotatedField, AnnotatedMethod};
use crate::view::{AnnotatedParameter, AnnotatedType};

// -----------------------------------------------------------------------------
// Serialize / Deserialize

macro_rules! impl_view_serde {
    ($($ty:ident),+ $(,)?) => {$(
        impl Serialize for $ty {
            #[inline]
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.to_proxy().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            /// Always fails, restore views through
            /// [`ViewDeserializer`](crate::serde::ViewDeserializer).
            fn deserialize<D: Deserializer<'de>>(_: D) -> Result<Self, D::Error> {
                log::warn!("direct deserialization of {} refused", stringify!($ty));
                Err(D::Error::custom(ProxyError::ProxyRequired {
                    view: <$ty as ProxyTarget>::VIEW_NAME,
                }))
            }
        }
    )+};
}

impl_view_serde!(
    AnnotatedType,
    AnnotatedField,
    AnnotatedMethod,
    AnnotatedConstructor,
    AnnotatedParameter,
);

// -----------------------------------------------------------------------------
// Tests
