use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

// -----------------------------------------------------------------------------
// Annotation

/// A declarative tag attached to a class, member or parameter.
///
/// An annotation is identified by the name of its tag type and carries
/// an optional `value` plus any number of named members. Members are
/// kept sorted so that two annotations written in different orders
/// compare, hash and intern identically.
///
/// # Example
///
/// ```
/// use bk_reflect::raw::Annotation;
///
/// let a = Annotation::new("Named").with_value("cart");
/// let b = Annotation::new("Named").with_value("cart");
/// assert_eq!(a, b);
/// assert_eq!(a.value(), Some("cart"));
/// assert_eq!(a.to_string(), "@Named(\"cart\")");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Annotation {
    ty: Arc<str>,
    value: Option<Arc<str>>,
    members: Vec<(Arc<str>, Arc<str>)>,
}

impl Annotation {
    /// Creates a marker annotation of the given tag type.
    #[inline]
    pub fn new(ty: impl Into<Arc<str>>) -> Self {
        Self {
            ty: ty.into(),
            value: None,
            members: Vec::new(),
        }
    }

    /// Sets the `value` member.
    #[inline]
    pub fn with_value(mut self, value: impl Into<Arc<str>>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets a named member, replacing a previous value for the same name.
    pub fn with_member(mut self, name: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.members.binary_search_by(|(n, _)| n.cmp(&name)) {
            Ok(index) => self.members[index].1 = value,
            Err(index) => self.members.insert(index, (name, value)),
        }
        self
    }

    /// Returns the name of the tag type.
    #[inline]
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// Returns the `value` member, if set.
    #[inline]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns the named member, if set.
    pub fn member(&self, name: &str) -> Option<&str> {
        self.members
            .binary_search_by(|(n, _)| (**n).cmp(name))
            .ok()
            .map(|index| &*self.members[index].1)
    }

    /// Returns the named members in name order.
    #[inline]
    pub fn members(&self) -> impl ExactSizeIterator<Item = (&str, &str)> {
        self.members.iter().map(|(n, v)| (&**n, &**v))
    }

    /// Returns `true` if `self` and `other` have the same type and agree on
    /// every member except the ones listed in `ignored`.
    ///
    /// `value` is compared unless `"value"` is ignored.
    pub fn matches_ignoring(&self, other: &Annotation, ignored: &[&str]) -> bool {
        if self.ty != other.ty {
            return false;
        }
        if !ignored.contains(&"value") && self.value != other.value {
            return false;
        }
        let relevant = |a: &Annotation| {
            a.members
                .iter()
                .filter(|(n, _)| !ignored.contains(&&**n))
                .cloned()
                .collect::<Vec<_>>()
        };
        relevant(self) == relevant(other)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.ty)?;
        if self.value.is_none() && self.members.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        let mut first = true;
        if let Some(value) = &self.value {
            write!(f, "{value:?}")?;
            first = false;
        }
        for (name, value) in &self.members {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{name} = {value:?}")?;
            first = false;
        }
        f.write_str(")")
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Annotation;
    use alloc::string::ToString;

    #[test]
    fn member_order_is_irrelevant() {
        let a = Annotation::new("Pay").with_member("kind", "card").with_member("async", "true");
        let b = Annotation::new("Pay").with_member("async", "true").with_member("kind", "card");
        assert_eq!(a, b);
        assert_eq!(a.member("kind"), Some("card"));
        assert_eq!(a.to_string(), "@Pay(async = \"true\", kind = \"card\")");
    }

    #[test]
    fn ignored_members() {
        let a = Annotation::new("Pay").with_member("kind", "card").with_member("note", "x");
        let b = Annotation::new("Pay").with_member("kind", "card").with_member("note", "y");
        assert!(!a.matches_ignoring(&b, &[]));
        assert!(a.matches_ignoring(&b, &["note"]));
        assert!(!a.matches_ignoring(&Annotation::new("Other"), &["note", "kind"]));
    }
}
