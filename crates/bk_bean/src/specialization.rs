//! The predecessor to successor relation between definitions.

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use bk_utils::hash::HashMap;

use crate::DefinitionError;
use crate::definition::DefinitionId;

// -----------------------------------------------------------------------------
// SpecializationMap

/// Maps a specialized definition to the definition replacing it.
///
/// Written during bootstrap, possibly from several threads, then frozen;
/// the runtime resolver reads it to suppress predecessors. [`clear`] on
/// shutdown makes it writable again.
///
/// # Example
///
/// ```
/// use bk_bean::definition::DefinitionId;
/// use bk_bean::specialization::SpecializationMap;
/// use bk_reflect::TypeKey;
///
/// let map = SpecializationMap::new();
/// let base = DefinitionId::Class(TypeKey::new("shop.Payment"));
/// let mock = DefinitionId::Class(TypeKey::new("shop.MockPayment"));
///
/// map.register(&base, &mock).unwrap();
/// map.freeze();
///
/// assert_eq!(map.successor_of(&base), Some(mock.clone()));
/// assert!(map.register(&mock, &base).is_err());
/// ```
///
/// [`clear`]: SpecializationMap::clear
#[derive(Debug, Default)]
pub struct SpecializationMap {
    successors: RwLock<HashMap<DefinitionId, DefinitionId>>,
    frozen: AtomicBool,
}

impl SpecializationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `successor` replaces `predecessor`.
    ///
    /// Registering the same pair again is a no-op. Replacing an existing
    /// successor is allowed and logged.
    pub fn register(
        &self,
        predecessor: &DefinitionId,
        successor: &DefinitionId,
    ) -> Result<(), DefinitionError> {
        if self.is_frozen() {
            return Err(DefinitionError::SpecializationFrozen {
                predecessor: predecessor.clone(),
                successor: successor.clone(),
            });
        }

        let mut successors = self
            .successors
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match successors.insert(predecessor.clone(), successor.clone()) {
            Some(previous) if previous != *successor => {
                log::warn!("{predecessor} is specialized by both {previous} and {successor}");
            }
            _ => log::trace!("{predecessor} specialized by {successor}"),
        }
        Ok(())
    }

    pub fn successor_of(&self, predecessor: &DefinitionId) -> Option<DefinitionId> {
        self.successors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(predecessor)
            .cloned()
    }

    #[inline]
    pub fn is_specialized(&self, predecessor: &DefinitionId) -> bool {
        self.successor_of(predecessor).is_some()
    }

    pub fn len(&self) -> usize {
        self.successors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Rejects every later registration. Called at the end of bootstrap.
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Forgets every pair and unfreezes. Called on shutdown.
    pub fn clear(&self) {
        self.successors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.frozen.store(false, Ordering::Release);
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::thread;

    use bk_reflect::TypeKey;

    use super::SpecializationMap;
    use crate::DefinitionError;
    use crate::definition::DefinitionId;

    fn id(name: &str) -> DefinitionId {
        DefinitionId::Class(TypeKey::new(name))
    }

    #[test]
    fn lifecycle() {
        let map = SpecializationMap::new();
        map.register(&id("A"), &id("B")).unwrap();
        map.register(&id("A"), &id("B")).unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.is_specialized(&id("A")));
        assert!(!map.is_specialized(&id("B")));

        map.freeze();
        assert_eq!(
            map.register(&id("B"), &id("C")),
            Err(DefinitionError::SpecializationFrozen {
                predecessor: id("B"),
                successor: id("C"),
            })
        );

        map.clear();
        assert!(!map.is_frozen());
        assert_eq!(map.successor_of(&id("A")), None);
        map.register(&id("B"), &id("C")).unwrap();
    }

    #[test]
    fn concurrent_registration() {
        let map = SpecializationMap::new();
        thread::scope(|s| {
            for i in 0..8 {
                let map = &map;
                s.spawn(move || {
                    let name = alloc::format!("P{}", i % 4);
                    map.register(&id(&name), &id("S")).unwrap();
                });
            }
        });
        assert_eq!(map.len(), 4);
    }
}
