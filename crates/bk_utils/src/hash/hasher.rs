//! Provide `FixedHashState` and `NoOpHasher`.
//!
//! `FixedHashState` builds `foldhash` hashers from a fixed seed, so hash
//! results only depend on the input.
//!
//! `NoOpHasher` directly use u64 or bit data as hash values,
//! it is meant for keys that already carry a good hash (see [`Hashed`]).
//!
//! [`Hashed`]: crate::hash::Hashed

use core::fmt::Debug;
use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

/// A fixed hash seed.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x5EA7_B1D5_C0DE_2A11);

/// Fixed Hash State based upon a random but fixed seed.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use bk_utils::hash::FixedHashState;
///
/// let a = FixedHashState.hash_one("Production");
/// let b = FixedHashState.hash_one("Production");
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FoldHasher<'static>;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHasher

/// A no-op hash that directly pass value through `u64`.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher {
    hash: u64,
}

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes.iter().rev() {
            // rotate left ensure that `write_u32(10)` is eq to `write_u64(10)`.
            self.hash = self.hash.rotate_left(8).wrapping_add(*byte as u64);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// Build state of [`NoOpHasher`].
///
/// # Examples
///
/// ```
/// use core::hash::{Hash, Hasher, BuildHasher};
/// use bk_utils::hash::NoOpHashState;
///
/// let mut hasher = NoOpHashState.build_hasher();
/// 3_u64.hash(&mut hasher);
/// assert_eq!(hasher.finish(), 3_u64);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher { hash: 0 }
    }
}

// -----------------------------------------------------------------------------
// Tests
