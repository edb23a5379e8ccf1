//! Structural identities of program elements.
//!
//! Views compare and hash by these keys only. A key never holds a
//! reflective handle, so every key is serializable and is what the
//! [proxy tokens](crate::serde::SerializationProxy) are made of.

use alloc::sync::Arc;
use core::fmt;

use ::serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// TypeKey

/// Identity of a class: its fully-qualified, `.`-separated name.
///
/// # Example
///
/// ```
/// use bk_reflect::TypeKey;
///
/// let key = TypeKey::new("shop.billing.Invoice");
/// assert_eq!(key.simple_name(), "Invoice");
/// assert_eq!(key.package(), Some("shop.billing"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeKey(Arc<str>);

impl TypeKey {
    #[inline]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last segment of the name.
    pub fn simple_name(&self) -> &str {
        match self.0.rfind(['.', '$']) {
            Some(index) => &self.0[index + 1..],
            None => &self.0,
        }
    }

    /// Returns everything before the last `.`, if any.
    pub fn package(&self) -> Option<&str> {
        self.0.rfind('.').map(|index| &self.0[..index])
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeKey {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// -----------------------------------------------------------------------------
// MemberKey

/// The kind of member a [`MemberKey`] designates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemberKind {
    Field,
    Method,
    Constructor,
}

/// Identity of a field, method or constructor: declaring type plus signature.
///
/// Fields have an empty signature, constructors are named `<init>`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberKey {
    declaring: TypeKey,
    kind: MemberKind,
    name: Arc<str>,
    signature: Arc<[TypeKey]>,
}

impl MemberKey {
    pub const CONSTRUCTOR_NAME: &'static str = "<init>";

    pub fn field(declaring: TypeKey, name: impl Into<Arc<str>>) -> Self {
        Self {
            declaring,
            kind: MemberKind::Field,
            name: name.into(),
            signature: Arc::from([]),
        }
    }

    pub fn method(declaring: TypeKey, name: impl Into<Arc<str>>, signature: Arc<[TypeKey]>) -> Self {
        Self {
            declaring,
            kind: MemberKind::Method,
            name: name.into(),
            signature,
        }
    }

    pub fn constructor(declaring: TypeKey, signature: Arc<[TypeKey]>) -> Self {
        Self {
            declaring,
            kind: MemberKind::Constructor,
            name: Arc::from(Self::CONSTRUCTOR_NAME),
            signature,
        }
    }

    #[inline]
    pub fn declaring(&self) -> &TypeKey {
        &self.declaring
    }

    #[inline]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn signature(&self) -> &[TypeKey] {
        &self.signature
    }

    /// Returns `true` if `other` has the same kind, name and signature,
    /// whatever the declaring type. This is what overriding means.
    pub fn same_signature(&self, other: &MemberKey) -> bool {
        self.kind == other.kind && self.name == other.name && self.signature == other.signature
    }
}

impl fmt::Debug for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring, self.name)?;
        if self.kind == MemberKind::Field {
            return Ok(());
        }
        f.write_str("(")?;
        for (index, ty) in self.signature.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ty}")?;
        }
        f.write_str(")")
    }
}

// -----------------------------------------------------------------------------
// ParameterKey

/// Identity of a parameter: the owning callable plus the position.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParameterKey {
    callable: MemberKey,
    position: u16,
}

impl ParameterKey {
    #[inline]
    pub fn new(callable: MemberKey, position: u16) -> Self {
        Self { callable, position }
    }

    #[inline]
    pub fn callable(&self) -> &MemberKey {
        &self.callable
    }

    #[inline]
    pub fn position(&self) -> u16 {
        self.position
    }
}

impl fmt::Debug for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.callable, self.position)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::sync::Arc;

    use super::{MemberKey, ParameterKey, TypeKey};

    #[test]
    fn simple_names() {
        assert_eq!(TypeKey::new("Cart").simple_name(), "Cart");
        assert_eq!(TypeKey::new("shop.Outer$Inner").simple_name(), "Inner");
        assert_eq!(TypeKey::new("Cart").package(), None);
    }

    #[test]
    fn member_display() {
        let sig: Arc<[TypeKey]> = Arc::from([TypeKey::new("int"), TypeKey::new("shop.Item")]);
        let method = MemberKey::method(TypeKey::new("shop.Cart"), "add", sig);
        assert_eq!(method.to_string(), "shop.Cart.add(int, shop.Item)");

        let param = ParameterKey::new(method, 1);
        assert_eq!(param.to_string(), "shop.Cart.add(int, shop.Item)#1");

        let field = MemberKey::field(TypeKey::new("shop.Cart"), "items");
        assert_eq!(field.to_string(), "shop.Cart.items");
    }

    #[test]
    fn overriding_ignores_declaring_type() {
        let a = MemberKey::method(TypeKey::new("A"), "create", Arc::from([]));
        let b = MemberKey::method(TypeKey::new("B"), "create", Arc::from([]));
        assert_ne!(a, b);
        assert!(a.same_signature(&b));
    }
}
