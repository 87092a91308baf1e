#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

mod arena;
pub mod linked_hash_map;
pub mod ordered_dict;

use std::num::NonZeroU32;

type RandomState = std::hash::RandomState;

/// A thread-safe hash map that keeps its entries in insertion order and can
/// reorder them in O(1).
///
/// This is the main type alias using the default hasher. For custom hashers,
/// use [`ordered_dict::OrderedDict`] directly.
///
/// # Examples
///
/// ```
/// use tether_dict::OrderedDict;
///
/// let dict = OrderedDict::new();
/// dict.set("a", 1);
/// dict.set("b", 2);
/// dict.move_to_start(&"b");
///
/// assert_eq!(dict.keys(), ["b", "a"]);
/// ```
pub type OrderedDict<K, V> = crate::ordered_dict::OrderedDict<K, V, RandomState>;

/// The unsynchronized map guarded by [`OrderedDict`], using the default
/// hasher.
///
/// # Examples
///
/// ```
/// use tether_dict::LinkedHashMap;
///
/// let mut map = LinkedHashMap::new();
/// map.insert("a", 1);
/// map.insert("b", 2);
///
/// let entries: Vec<_> = map.iter().collect();
/// assert_eq!(entries, [(&"a", &1), (&"b", &2)]);
/// ```
pub type LinkedHashMap<K, V> = crate::linked_hash_map::LinkedHashMap<K, V, RandomState>;

pub use linked_hash_map::IntoIter;
pub use linked_hash_map::Iter;
pub use linked_hash_map::Keys;
pub use linked_hash_map::Values;
pub use ordered_dict::GuardedIter;

/// Index of a slot in the order list arena.
///
/// Slots 0 and 1 always hold the head and tail sentinels.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub(crate) struct Ptr(NonZeroU32);

impl std::fmt::Debug for Ptr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ptr({})", self.unchecked_get())
    }
}

impl Ptr {
    pub(crate) const HEAD: Ptr = Ptr(NonZeroU32::MIN);
    pub(crate) const TAIL: Ptr = Ptr(NonZeroU32::MIN.saturating_add(1));

    pub(crate) fn unchecked_from(index: usize) -> Self {
        debug_assert!(
            index < u32::MAX as usize,
            "Index too large to fit in Ptr: {index}"
        );
        Ptr(NonZeroU32::MIN.saturating_add(index as u32))
    }

    pub(crate) fn unchecked_get(self) -> usize {
        self.0.get() as usize - 1
    }

    pub(crate) fn is_sentinel(self) -> bool {
        self == Ptr::HEAD || self == Ptr::TAIL
    }
}
