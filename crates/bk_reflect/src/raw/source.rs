use alloc::sync::Arc;

use bk_utils::hash::HashMap;

use crate::key::TypeKey;
use crate::raw::RawClass;

// -----------------------------------------------------------------------------
// ClassSource

/// The class-loading collaborator.
///
/// Used to bring a class back when a [proxy token](crate::serde::SerializationProxy)
/// names a type that has not been transformed in this process yet.
pub trait ClassSource: Send + Sync {
    /// Loads the class with the given key.
    fn load(&self, key: &TypeKey) -> Option<Arc<RawClass>>;
}

// -----------------------------------------------------------------------------
// ClassSet

/// A [`ClassSource`] over a fixed set of classes.
///
/// Inserting a class also inserts its superclass and interfaces.
#[derive(Debug, Default, Clone)]
pub struct ClassSet {
    classes: HashMap<TypeKey, Arc<RawClass>>,
}

impl ClassSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class and, recursively, its supertypes.
    pub fn insert(&mut self, class: Arc<RawClass>) {
        if self.classes.contains_key(class.key()) {
            return;
        }
        if let Some(superclass) = class.superclass() {
            self.insert(superclass.clone());
        }
        for interface in class.interfaces() {
            self.insert(interface.clone());
        }
        self.classes.insert(class.key().clone(), class);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RawClass>> {
        self.classes.values()
    }
}

impl FromIterator<Arc<RawClass>> for ClassSet {
    fn from_iter<I: IntoIterator<Item = Arc<RawClass>>>(iter: I) -> Self {
        let mut set = Self::new();
        for class in iter {
            set.insert(class);
        }
        set
    }
}

impl ClassSource for ClassSet {
    fn load(&self, key: &TypeKey) -> Option<Arc<RawClass>> {
        self.classes.get(key).cloned()
    }
}
