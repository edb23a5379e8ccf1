//! The process-wide cache of shared metadata fragments.
//!
//! ## Lifecycle
//!
//! A [`SharedObjectCache`] is created before bootstrap and injected into
//! the [`ClassTransformer`](crate::transformer::ClassTransformer). It is
//! populated while definitions are built, only read afterwards, and
//! [cleared](SharedObjectCache::clear) when the container shuts down.
//!
//! Population is idempotent. Two threads racing on the same key compute
//! equal values and whichever insertion lands first is kept.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use bk_utils::hash::{HashMap, HashSet, Hashed, PreHashMap};

use crate::error::InvariantViolation;
use crate::key::TypeKey;
use crate::raw::{Annotation, Modifiers, RawClass};

// -----------------------------------------------------------------------------
// TypeClosure

/// The flattened hierarchy of a class: itself, every superclass and every
/// interface, each listed once.
///
/// Order is depth-first with the superclass visited before interfaces,
/// which puts the class first and the superclass chain right after it.
#[derive(Debug, PartialEq, Eq)]
pub struct TypeClosure {
    base: TypeKey,
    types: Box<[TypeKey]>,
    serializable: bool,
}

impl TypeClosure {
    fn compute(class: &RawClass) -> Self {
        let mut types = Vec::new();
        let mut seen: HashSet<&TypeKey> = HashSet::default();
        let mut serializable = class.modifiers().contains(Modifiers::PRIMITIVE);

        let mut stack: Vec<&RawClass> = Vec::new();
        stack.push(class);
        while let Some(current) = stack.pop() {
            if !seen.insert(current.key()) {
                continue;
            }
            types.push(current.key().clone());
            serializable |= current.modifiers().contains(Modifiers::SERIALIZABLE);

            for interface in current.interfaces().iter().rev() {
                stack.push(interface);
            }
            if let Some(superclass) = current.superclass() {
                stack.push(superclass);
            }
        }

        Self {
            base: class.key().clone(),
            types: types.into_boxed_slice(),
            serializable,
        }
    }

    /// Returns the class this closure was computed for.
    #[inline]
    pub fn base(&self) -> &TypeKey {
        &self.base
    }

    #[inline]
    pub fn types(&self) -> &[TypeKey] {
        &self.types
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if `ty` is the base type or one of its supertypes.
    #[inline]
    pub fn contains(&self, ty: &TypeKey) -> bool {
        self.types.contains(ty)
    }

    /// Returns `true` if the base type is primitive or some type of the
    /// closure declares itself serializable.
    #[inline]
    pub fn is_serializable(&self) -> bool {
        self.serializable
    }
}

// -----------------------------------------------------------------------------
// SharedObjectCache

/// Interns type closures and annotation sets across all views.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use bk_reflect::cache::SharedObjectCache;
/// use bk_reflect::raw::RawClass;
///
/// let cache = SharedObjectCache::new();
/// let class = RawClass::builder("shop.Cart").build();
///
/// let a = cache.type_closure(&class);
/// let b = cache.type_closure(&class);
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(cache.closures_computed(), 1);
/// ```
#[derive(Default)]
pub struct SharedObjectCache {
    closures: RwLock<HashMap<TypeKey, Arc<TypeClosure>>>,
    tag_sets: RwLock<PreHashMap<Box<[Annotation]>, Arc<[Annotation]>>>,
    computed: AtomicUsize,
}

impl SharedObjectCache {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the closure of `class`, computing it on first request.
    pub fn type_closure(&self, class: &RawClass) -> Arc<TypeClosure> {
        let cached = self
            .closures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(class.key())
            .cloned();

        match cached {
            Some(closure) => {
                Self::check_identity(class.key(), &closure);
                closure
            }
            None => self.insert_closure(class),
        }
    }

    #[inline(never)]
    fn insert_closure(&self, class: &RawClass) -> Arc<TypeClosure> {
        let closure = Arc::new(TypeClosure::compute(class));
        self.computed.fetch_add(1, Ordering::Relaxed);
        log::trace!("computed type closure of {} ({} types)", class.key(), closure.len());

        self.closures
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(class.key().clone())
            .or_insert(closure)
            .clone()
    }

    fn check_identity(requested: &TypeKey, closure: &TypeClosure) {
        if closure.base() != requested {
            InvariantViolation::IdentityMismatch {
                requested: requested.as_str().into(),
                found: closure.base().as_str().into(),
            }
            .handle_error();
        }
    }

    /// Returns the canonical instance of the given annotation set.
    ///
    /// Annotations are sorted and deduplicated first, so declaration order
    /// does not matter.
    pub fn shared_tags(&self, tags: &[Annotation]) -> Arc<[Annotation]> {
        let mut sorted = tags.to_vec();
        sorted.sort();
        sorted.dedup();
        let key = Hashed::new(sorted.into_boxed_slice());

        if let Some(shared) = self
            .tag_sets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return shared.clone();
        }

        self.tag_sets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert_with(&key, || Arc::from(&**key))
            .clone()
    }

    /// Number of type closures computed so far, cache hits excluded.
    #[inline]
    pub fn closures_computed(&self) -> usize {
        self.computed.load(Ordering::Relaxed)
    }

    /// Number of distinct annotation sets interned.
    pub fn tag_set_count(&self) -> usize {
        self.tag_sets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drops every cached fragment. Called on container shutdown.
    pub fn clear(&self) {
        self.closures
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.tag_sets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.computed.store(0, Ordering::Relaxed);
    }
}

impl core::fmt::Debug for SharedObjectCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedObjectCache")
            .field("closures_computed", &self.closures_computed())
            .field("tag_sets", &self.tag_set_count())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
