use core::fmt::Debug;
use core::hash::{BuildHasher, Hash, Hasher};
use core::ops::Deref;

use hashbrown::hash_map::RawEntryMut;

use crate::hash::{FixedHashState, NoOpHashState};

// -----------------------------------------------------------------------------
// Hashed

/// A pre-hashed value of a specific type.
///
/// Pre-hashing enables memoization of hashes that are expensive to compute,
/// such as whole annotation lists, and short circuits [`PartialEq`] on hash
/// inequality.
pub struct Hashed<V> {
    hash: u64,
    value: V,
}

impl<V: Hash> Hashed<V> {
    /// Pre-hashes the given value using the [`FixedHashState`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bk_utils::hash::Hashed;
    ///
    /// let hashed = Hashed::new("Named");
    /// assert_eq!(hashed.hash(), Hashed::hash_one(&"Named"));
    /// ```
    #[inline]
    pub fn new(value: V) -> Self {
        Self {
            hash: Self::hash_one(&value),
            value,
        }
    }

    /// Use the built-in fixed hash function to calculate the hash value.
    #[inline]
    pub fn hash_one(value: &V) -> u64 {
        FixedHashState.hash_one(value)
    }
}

impl<V> Hashed<V> {
    /// Return the pre-computed hash.
    #[inline(always)]
    pub const fn hash(&self) -> u64 {
        self.hash
    }
}

impl<V> Hash for Hashed<V> {
    #[inline]
    fn hash<R: Hasher>(&self, state: &mut R) {
        state.write_u64(self.hash);
    }
}

impl<V> Deref for Hashed<V> {
    type Target = V;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<V: PartialEq> PartialEq for Hashed<V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.value.eq(&other.value)
    }
}

impl<V: Eq> Eq for Hashed<V> {}

impl<V: Debug> Debug for Hashed<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hashed")
            .field("hash", &self.hash)
            .field("value", &self.value)
            .finish()
    }
}

impl<V: Clone> Clone for Hashed<V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            hash: self.hash,
            value: self.value.clone(),
        }
    }
}

// -----------------------------------------------------------------------------
// PreHashMap

/// A hash map keyed by [`Hashed`] values, never rehashing its keys.
pub struct PreHashMap<K, V>(hashbrown::HashMap<Hashed<K>, V, NoOpHashState>);

impl<K, V> Default for PreHashMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> PreHashMap<K, V> {
    /// Creates an empty map.
    #[inline]
    pub const fn new() -> Self {
        Self(hashbrown::HashMap::with_hasher(NoOpHashState))
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Removes every entry.
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<K: Eq, V> PreHashMap<K, V> {
    /// Returns the value stored for `key`.
    #[inline]
    pub fn get(&self, key: &Hashed<K>) -> Option<&V> {
        self.0
            .raw_entry()
            .from_key_hashed_nocheck(key.hash(), key)
            .map(|(_, v)| v)
    }
}

impl<K: Eq + Clone, V> PreHashMap<K, V> {
    /// Try to get or insert the value for the given hashed `key`.
    ///
    /// If the map does not already contain the `key`,
    /// it will clone it and insert the value returned by `func`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bk_utils::hash::{Hashed, PreHashMap};
    ///
    /// let mut map = PreHashMap::new();
    /// let key = Hashed::new("Any");
    /// *map.get_or_insert_with(&key, || 0) += 1;
    /// *map.get_or_insert_with(&key, || 0) += 1;
    /// assert_eq!(map.get(&key), Some(&2));
    /// ```
    #[inline]
    pub fn get_or_insert_with(&mut self, key: &Hashed<K>, func: impl FnOnce() -> V) -> &mut V {
        let entry = self
            .0
            .raw_entry_mut()
            .from_key_hashed_nocheck(key.hash(), key);

        match entry {
            RawEntryMut::Occupied(entry) => entry.into_mut(),
            RawEntryMut::Vacant(entry) => {
                let (_, value) = entry.insert_hashed_nocheck(key.hash(), key.clone(), func());
                value
            }
        }
    }
}

impl<K: Debug, V: Debug> Debug for PreHashMap<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Hashed, PreHashMap};

    #[test]
    fn map_tracks_distinct_keys() {
        let mut map = PreHashMap::new();
        let any = Hashed::new("Any");
        let named = Hashed::new("Named");

        *map.get_or_insert_with(&any, || 1) += 1;
        map.get_or_insert_with(&named, || 10);
        map.get_or_insert_with(&any, || 100);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&any), Some(&2));
        assert_eq!(map.get(&named), Some(&10));
        assert_eq!(map.get(&Hashed::new("Current")), None);

        map.clear();
        assert_eq!(map.len(), 0);
        assert_eq!(map.get(&any), None);
    }
}
