//! Provide hash containers, re-exports *hashbrown* and *foldhash*.
//!
//! Every container here hashes with [`FixedHashState`], so iteration order
//! only depends on the inserted values. Bootstrap diagnostics rely on that
//! to report conflicts in the same order on every run.

// -----------------------------------------------------------------------------
// Modules

mod hasher;
mod pre_hashed;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::FixedHashState;
pub use hasher::{NoOpHashState, NoOpHasher};

pub use pre_hashed::{Hashed, PreHashMap};

/// A [`hashbrown::HashMap`] using [`FixedHashState`] by default.
///
/// # Examples
///
/// ```
/// use bk_utils::hash::HashMap;
///
/// let mut map: HashMap<&str, u32> = HashMap::default();
/// map.insert("Dependent", 0);
/// assert_eq!(map.get("Dependent"), Some(&0));
/// ```
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`] by default.
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;
