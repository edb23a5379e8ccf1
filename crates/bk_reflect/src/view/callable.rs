use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;

use crate::cache::{SharedObjectCache, TypeClosure};
use crate::error::InvariantViolation;
use crate::key::{MemberKey, TypeKey};
use crate::raw::{Annotation, Modifiers, RawClass, RawConstructor, RawMethod, RawParameter};
use crate::view::{Annotated, AnnotatedElement, AnnotatedParameter, LazyClosure};
use crate::view::impl_structural_identity;

fn parameters_of(
    callable: &MemberKey,
    raw: &[RawParameter],
    cache: &Arc<SharedObjectCache>,
) -> Box<[Arc<AnnotatedParameter>]> {
    raw.iter()
        .enumerate()
        .map(|(position, p)| {
            let position = u16::try_from(position).unwrap_or_else(|_| {
                InvariantViolation::ParameterOverflow {
                    callable: alloc::format!("{callable}"),
                    count: raw.len(),
                }
                .handle_error()
            });
            Arc::new(AnnotatedParameter::new(callable.clone(), position, p, cache))
        })
        .collect()
}

/// Implement the parameter accessors shared by methods and constructors.
macro_rules! impl_parameters_fn {
    () => {
        /// Returns the parameters in declaration order.
        #[inline]
        pub fn parameters(&self) -> &[Arc<AnnotatedParameter>] {
            &self.parameters
        }

        /// Returns the parameter at `position`.
        #[inline]
        pub fn parameter(&self, position: u16) -> Option<&Arc<AnnotatedParameter>> {
            self.parameters.get(position as usize)
        }

        /// Returns the parameters declaring a tag of the given type.
        pub fn parameters_with<'a>(
            &'a self,
            tag: &'a str,
        ) -> impl Iterator<Item = &'a Arc<AnnotatedParameter>> + 'a {
            self.parameters
                .iter()
                .filter(move |p| p.is_annotation_present(tag))
        }
    };
}

// -----------------------------------------------------------------------------
// AnnotatedMethod

/// A view over a method, identified by declaring type, name and signature.
pub struct AnnotatedMethod {
    key: MemberKey,
    raw: RawMethod,
    tags: Arc<[Annotation]>,
    parameters: Box<[Arc<AnnotatedParameter>]>,
    closure: LazyClosure,
}

impl AnnotatedMethod {
    pub fn new(declaring: &TypeKey, raw: &RawMethod, cache: &Arc<SharedObjectCache>) -> Self {
        let key = MemberKey::method(declaring.clone(), raw.name(), raw.signature());
        let parameters = parameters_of(&key, raw.parameters(), cache);
        Self {
            key,
            raw: raw.clone(),
            tags: cache.shared_tags(raw.annotations()),
            parameters,
            closure: LazyClosure::new(cache),
        }
    }

    #[inline]
    pub fn key(&self) -> &MemberKey {
        &self.key
    }

    #[inline]
    pub fn declaring(&self) -> &TypeKey {
        self.key.declaring()
    }

    #[inline]
    pub fn modifiers(&self) -> Modifiers {
        self.raw.modifiers()
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.modifiers().contains(Modifiers::STATIC)
    }

    /// Returns the name with a JavaBeans `get` prefix removed and the next
    /// character lower-cased, or `None` if the method is not a getter.
    pub fn property_name(&self) -> Option<alloc::string::String> {
        let rest = self.name().strip_prefix("get")?;
        let mut chars = rest.chars();
        let first = chars.next()?;
        if !first.is_uppercase() || !self.parameters.is_empty() {
            return None;
        }
        let mut name: alloc::string::String = first.to_lowercase().collect();
        name.push_str(chars.as_str());
        Some(name)
    }

    impl_parameters_fn!();
}

impl Annotated for AnnotatedMethod {
    /// The return type.
    #[inline]
    fn raw_type(&self) -> &Arc<RawClass> {
        self.raw.return_type()
    }

    #[inline]
    fn declared_tags(&self) -> &[Annotation] {
        &self.tags
    }

    #[inline]
    fn type_closure(&self) -> &TypeClosure {
        self.closure.get(self.raw.return_type())
    }

    #[inline]
    fn annotated_element(&self) -> Option<AnnotatedElement<'_>> {
        Some(AnnotatedElement::Method(&self.raw))
    }

    #[inline]
    fn name(&self) -> &str {
        self.raw.name()
    }
}

impl_structural_identity!(AnnotatedMethod);

impl fmt::Debug for AnnotatedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotatedMethod")
            .field("key", &self.key)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// AnnotatedConstructor

/// A view over a constructor, identified by declaring type and signature.
pub struct AnnotatedConstructor {
    key: MemberKey,
    declaring: Arc<RawClass>,
    raw: RawConstructor,
    tags: Arc<[Annotation]>,
    parameters: Box<[Arc<AnnotatedParameter>]>,
    closure: LazyClosure,
}

impl AnnotatedConstructor {
    pub fn new(
        declaring: &Arc<RawClass>,
        raw: &RawConstructor,
        cache: &Arc<SharedObjectCache>,
    ) -> Self {
        let key = MemberKey::constructor(declaring.key().clone(), raw.signature());
        let parameters = parameters_of(&key, raw.parameters(), cache);
        Self {
            key,
            declaring: declaring.clone(),
            raw: raw.clone(),
            tags: cache.shared_tags(raw.annotations()),
            parameters,
            closure: LazyClosure::new(cache),
        }
    }

    #[inline]
    pub fn key(&self) -> &MemberKey {
        &self.key
    }

    #[inline]
    pub fn modifiers(&self) -> Modifiers {
        self.raw.modifiers()
    }

    impl_parameters_fn!();
}

impl Annotated for AnnotatedConstructor {
    /// The class being constructed.
    #[inline]
    fn raw_type(&self) -> &Arc<RawClass> {
        &self.declaring
    }

    #[inline]
    fn declared_tags(&self) -> &[Annotation] {
        &self.tags
    }

    #[inline]
    fn type_closure(&self) -> &TypeClosure {
        self.closure.get(&self.declaring)
    }

    #[inline]
    fn annotated_element(&self) -> Option<AnnotatedElement<'_>> {
        Some(AnnotatedElement::Constructor(&self.raw))
    }

    #[inline]
    fn name(&self) -> &str {
        MemberKey::CONSTRUCTOR_NAME
    }
}

impl_structural_identity!(AnnotatedConstructor);

impl fmt::Debug for AnnotatedConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotatedConstructor")
            .field("key", &self.key)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests
