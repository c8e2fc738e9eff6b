#[cfg(not(feature = "std"))]
use alloc::collections::BTreeSet;
#[cfg(feature = "std")]
use std::collections::HashSet;

#[cfg(feature = "std")]
pub(crate) type IdSet<K> = HashSet<K>;
#[cfg(not(feature = "std"))]
pub(crate) type IdSet<K> = BTreeSet<K>;

/// Bound for item identifiers used by the dedup index.
///
/// With `std` this is `Hash + Eq + Clone` (backed by a `HashSet`); without it, `Ord + Clone`
/// (backed by a `BTreeSet`).
#[cfg(feature = "std")]
pub trait ItemId: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> ItemId for K {}

#[cfg(not(feature = "std"))]
pub trait ItemId: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> ItemId for K {}
