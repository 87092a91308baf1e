//! Unsynchronized linked hash map.
//!
//! This module provides [`LinkedHashMap`], the index and order list that
//! [`OrderedDict`](crate::ordered_dict::OrderedDict) guards with a single lock.
//! It can be used on its own wherever the caller already has exclusive access.
//!
//! # Examples
//!
//! ```
//! use tether_dict::linked_hash_map::LinkedHashMap;
//!
//! let mut map = LinkedHashMap::new();
//! map.insert("first", 1);
//! map.insert("second", 2);
//!
//! // Iteration preserves insertion order
//! let entries: Vec<_> = map.iter().collect();
//! assert_eq!(entries, [(&"first", &1), (&"second", &2)]);
//! ```

mod iter;

use std::hash::BuildHasher;
use std::hash::Hash;
use std::ops::Index;

use hashbrown::HashTable;
use hashbrown::hash_table;
pub use iter::IntoIter;
pub use iter::Iter;
pub use iter::Keys;
pub use iter::Values;

use crate::Ptr;
use crate::RandomState;
use crate::arena::Arena;

/// A hash map that maintains relative order using a doubly-linked list.
///
/// Keys are indexed by a hash table whose entries point at slots of an arena;
/// the arena slots are threaded into a list bounded by two sentinel slots.
/// Lookup, insertion, removal and every reordering operation are O(1).
///
/// The generic parameters are:
/// - `K`: Key type, must implement `Hash + Eq`
/// - `V`: Value type
/// - `S`: Hash builder type, defaults to the standard hasher
///
/// # Examples
///
/// ```
/// use tether_dict::linked_hash_map::LinkedHashMap;
///
/// let mut map = LinkedHashMap::new();
/// map.insert("apple", 5);
/// map.insert("banana", 3);
/// map.insert("cherry", 8);
/// map.move_to_start(&"cherry");
///
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, ["cherry", "apple", "banana"]);
/// ```
#[derive(Clone)]
pub struct LinkedHashMap<K, V, S = RandomState> {
    pub(crate) nodes: Arena<K, V>,
    table: HashTable<Ptr>,
    hasher: S,
}

impl<K: std::fmt::Debug, V: std::fmt::Debug, S> std::fmt::Debug for LinkedHashMap<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S: Default> Default for LinkedHashMap<K, V, S> {
    fn default() -> Self {
        LinkedHashMap::with_capacity_and_hasher(0, S::default())
    }
}

impl<K, V> LinkedHashMap<K, V> {
    /// Creates a new, empty linked hash map.
    ///
    /// Only the two sentinel slots are allocated up front.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::LinkedHashMap;
    ///
    /// let mut map: LinkedHashMap<&str, i32> = LinkedHashMap::new();
    /// assert!(map.is_empty());
    /// map.insert("key", 42);
    /// assert!(!map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new linked hash map able to hold at least `capacity` entries
    /// without reallocating.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::LinkedHashMap;
    ///
    /// let map: LinkedHashMap<&str, i32> = LinkedHashMap::with_capacity(10);
    /// assert_eq!(map.len(), 0);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::default())
    }
}

impl<K, V, S> LinkedHashMap<K, V, S> {
    /// Creates a new, empty linked hash map which will use the given hasher.
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    /// Creates a new linked hash map with the specified capacity and hasher.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::hash::RandomState;
    /// use tether_dict::linked_hash_map::LinkedHashMap;
    ///
    /// let mut map: LinkedHashMap<&str, i32, _> =
    ///     LinkedHashMap::with_capacity_and_hasher(10, RandomState::new());
    /// map.insert("key", 42);
    /// ```
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        if capacity > 0 {
            tracing::trace!(capacity, "preallocating linked hash map");
        }
        LinkedHashMap {
            nodes: Arena::with_capacity(capacity),
            table: HashTable::with_capacity(capacity),
            hasher,
        }
    }

    /// Returns a reference to the map's hasher.
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::LinkedHashMap;
    ///
    /// let mut map = LinkedHashMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert("a", 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Removes every entry, leaving the map as if freshly constructed.
    ///
    /// Allocated capacity is retained.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::LinkedHashMap;
    ///
    /// let mut map = LinkedHashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.iter().next(), None);
    /// ```
    pub fn clear(&mut self) {
        tracing::trace!(len = self.len(), "clearing linked hash map");
        self.table.clear();
        self.nodes.reset();
    }

    /// Returns an iterator over the entries in list order.
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
    /// let mut iter = map.iter();
    /// assert_eq!(iter.next(), Some((&"a", &1)));
    /// assert_eq!(iter.next_back(), Some((&"b", &2)));
    /// assert_eq!(iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.nodes)
    }

    /// Returns an iterator over the keys in list order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values in list order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns the first entry in list order.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::LinkedHashMap;
    ///
    /// let mut map = LinkedHashMap::new();
    /// assert_eq!(map.first(), None);
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    /// assert_eq!(map.first(), Some((&"a", &1)));
    /// ```
    pub fn first(&self) -> Option<(&K, &V)> {
        self.entry_at(self.nodes.first())
    }

    /// Returns the last entry in list order.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.entry_at(self.nodes.last())
    }

    fn entry_at(&self, ptr: Ptr) -> Option<(&K, &V)> {
        if ptr.is_sentinel() {
            return None;
        }
        let data = &self.nodes[ptr];
        Some((&data.key, &data.value))
    }

    /// Releases spare capacity held by the index and the arena.
    pub fn shrink_to_fit(&mut self) {
        let nodes = &self.nodes;
        self.table.shrink_to_fit(|&ptr| nodes[ptr].hash);
        self.nodes.shrink_to_fit();
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LinkedHashMap<K, V, S> {
    fn find(&self, key: &K) -> Option<Ptr> {
        let hash = self.hasher.hash_one(key);
        self.table
            .find(hash, |&ptr| self.nodes[ptr].key == *key)
            .copied()
    }

    /// Inserts a key-value pair.
    ///
    /// A new key is appended at the end of the order list. An existing key
    /// has its value replaced in place and keeps its position; the previous
    /// value is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::LinkedHashMap;
    ///
    /// let mut map = LinkedHashMap::new();
    /// assert_eq!(map.insert("a", 1), None);
    /// map.insert("b", 2);
    /// assert_eq!(map.insert("a", 10), Some(1));
    ///
    /// let entries: Vec<_> = map.iter().collect();
    /// assert_eq!(entries, [(&"a", &10), (&"b", &2)]);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hasher.hash_one(&key);
        let nodes = &self.nodes;
        match self.table.entry(
            hash,
            |&ptr| nodes[ptr].key == key,
            |&ptr| nodes[ptr].hash,
        ) {
            hash_table::Entry::Occupied(occupied) => {
                let ptr = *occupied.get();
                Some(std::mem::replace(&mut self.nodes[ptr].value, value))
            }
            hash_table::Entry::Vacant(vacant) => {
                let ptr = self.nodes.alloc(key, value, hash);
                self.nodes.link_before(ptr, Ptr::TAIL);
                vacant.insert(ptr);
                None
            }
        }
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::LinkedHashMap;
    ///
    /// let mut map = LinkedHashMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|ptr| &self.nodes[ptr].value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// The entry keeps its position.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let ptr = self.find(key)?;
        Some(&mut self.nodes[ptr].value)
    }

    /// Returns `true` if the map contains the key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Removes a key from the map, returning its value if it was present.
    ///
    /// The remaining entries keep their relative order.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::LinkedHashMap;
    ///
    /// let mut map = LinkedHashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    /// map.insert("c", 3);
    ///
    /// assert_eq!(map.remove(&"b"), Some(2));
    /// assert_eq!(map.remove(&"b"), None);
    /// let keys: Vec<_> = map.keys().copied().collect();
    /// assert_eq!(keys, ["a", "c"]);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if it
    /// was present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hasher.hash_one(key);
        let nodes = &self.nodes;
        let ptr = self
            .table
            .find_entry(hash, |&ptr| nodes[ptr].key == *key)
            .ok()?
            .remove()
            .0;

        let data = self.nodes.remove(ptr);
        Some((data.key, data.value))
    }

    fn remove_at(&mut self, ptr: Ptr) -> Option<(K, V)> {
        if ptr.is_sentinel() {
            return None;
        }

        let hash = self.nodes[ptr].hash;
        if let Ok(entry) = self.table.find_entry(hash, |&p| p == ptr) {
            entry.remove();
        }
        let data = self.nodes.remove(ptr);
        Some((data.key, data.value))
    }

    /// Removes and returns the first entry in list order.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::LinkedHashMap;
    ///
    /// let mut map = LinkedHashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    /// assert_eq!(map.pop_first(), Some(("a", 1)));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.remove_at(self.nodes.first())
    }

    /// Removes and returns the last entry in list order.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.remove_at(self.nodes.last())
    }

    /// Moves the entry for `key` to the end of the order list.
    ///
    /// Returns `false` without changing anything if the key is absent. Moving
    /// the entry that is already last succeeds and changes nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::LinkedHashMap;
    ///
    /// let mut map = LinkedHashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    /// map.insert("c", 3);
    ///
    /// assert!(map.move_to_end(&"a"));
    /// assert!(!map.move_to_end(&"z"));
    /// let keys: Vec<_> = map.keys().copied().collect();
    /// assert_eq!(keys, ["b", "c", "a"]);
    /// ```
    pub fn move_to_end(&mut self, key: &K) -> bool {
        let Some(ptr) = self.find(key) else {
            return false;
        };
        self.nodes.unlink(ptr);
        self.nodes.link_before(ptr, Ptr::TAIL);
        true
    }

    /// Moves the entry for `key` to the start of the order list.
    ///
    /// Returns `false` without changing anything if the key is absent.
    pub fn move_to_start(&mut self, key: &K) -> bool {
        let Some(ptr) = self.find(key) else {
            return false;
        };
        self.nodes.unlink(ptr);
        self.nodes.link_after(ptr, Ptr::HEAD);
        true
    }

    /// Moves the entry for `key` to sit immediately after the entry for
    /// `after`.
    ///
    /// Both keys must be present; otherwise `false` is returned and nothing
    /// changes. The target position is evaluated once `key` has been
    /// unlinked, so `move_after(k, k)` places `k` after what was its
    /// successor (or leaves it last if it had none).
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::LinkedHashMap;
    ///
    /// let mut map = LinkedHashMap::new();
    /// for key in ["a", "b", "c", "d"] {
    ///     map.insert(key, ());
    /// }
    ///
    /// assert!(map.move_after(&"a", &"c"));
    /// let keys: Vec<_> = map.keys().copied().collect();
    /// assert_eq!(keys, ["b", "c", "a", "d"]);
    ///
    /// assert!(map.move_after(&"b", &"b"));
    /// let keys: Vec<_> = map.keys().copied().collect();
    /// assert_eq!(keys, ["c", "b", "a", "d"]);
    /// ```
    pub fn move_after(&mut self, key: &K, after: &K) -> bool {
        let (Some(moved), Some(after)) = (self.find(key), self.find(after)) else {
            return false;
        };

        let anchor = if moved == after {
            self.nodes.next(moved)
        } else {
            after
        };

        self.nodes.unlink(moved);
        if anchor == Ptr::TAIL {
            self.nodes.link_before(moved, Ptr::TAIL);
        } else {
            self.nodes.link_after(moved, anchor);
        }
        true
    }

    /// Moves the entry for `key` to sit immediately before the entry for
    /// `before`.
    ///
    /// The mirror image of [`move_after`](Self::move_after): `move_before(k,
    /// k)` places `k` before what was its predecessor.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::LinkedHashMap;
    ///
    /// let mut map = LinkedHashMap::new();
    /// for key in ["a", "b", "c"] {
    ///     map.insert(key, ());
    /// }
    ///
    /// assert!(map.move_before(&"c", &"a"));
    /// let keys: Vec<_> = map.keys().copied().collect();
    /// assert_eq!(keys, ["c", "a", "b"]);
    /// ```
    pub fn move_before(&mut self, key: &K, before: &K) -> bool {
        let (Some(moved), Some(before)) = (self.find(key), self.find(before)) else {
            return false;
        };

        let anchor = if moved == before {
            self.nodes.prev(moved)
        } else {
            before
        };

        self.nodes.unlink(moved);
        if anchor == Ptr::HEAD {
            self.nodes.link_after(moved, Ptr::HEAD);
        } else {
            self.nodes.link_before(moved, anchor);
        }
        true
    }

    /// Keeps only the entries for which `f` returns `true`, preserving order.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::LinkedHashMap;
    ///
    /// let mut map: LinkedHashMap<i32, i32> = (0..6).map(|i| (i, i * 10)).collect();
    /// map.retain(|k, _| k % 2 == 0);
    /// let keys: Vec<_> = map.keys().copied().collect();
    /// assert_eq!(keys, [0, 2, 4]);
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut ptr = self.nodes.first();
        while ptr != Ptr::TAIL {
            let next = self.nodes.next(ptr);
            let data = &mut self.nodes[ptr];
            if !f(&data.key, &mut data.value) {
                self.remove_at(ptr);
            }
            ptr = next;
        }
    }

    /// Asserts that the index and the order list agree.
    ///
    /// Walks the list from head to tail and checks that every node is indexed
    /// under its own key, that back links mirror forward links, and that the
    /// walk, the index and the arena all count the same number of entries.
    #[doc(hidden)]
    pub fn debug_validate(&self) {
        let mut walked = 0;
        let mut prev = Ptr::HEAD;
        let mut ptr = self.nodes.first();

        while ptr != Ptr::TAIL {
            assert!(
                walked < self.nodes.slots(),
                "Order list is longer than the arena; it must contain a cycle"
            );
            assert!(
                self.nodes.is_occupied(ptr),
                "Order list links a free slot: {ptr:?}"
            );
            assert_eq!(
                self.nodes.links(ptr).prev(),
                prev,
                "Back link of {ptr:?} does not match its predecessor"
            );
            assert_eq!(
                self.find(&self.nodes[ptr].key),
                Some(ptr),
                "Node {ptr:?} is not indexed under its own key"
            );

            walked += 1;
            prev = ptr;
            ptr = self.nodes.next(ptr);
        }

        assert_eq!(
            self.nodes.links(Ptr::TAIL).prev(),
            prev,
            "Tail sentinel does not link back to the last node"
        );
        assert_eq!(
            walked,
            self.table.len(),
            "Order list and index should have the same length"
        );
        assert_eq!(
            walked,
            self.nodes.len(),
            "Order list and arena should have the same length"
        );
    }
}

impl<K, V, S> PartialEq for LinkedHashMap<K, V, S>
where
    K: PartialEq,
    V: PartialEq,
{
    /// Two maps are equal when they hold equal entries in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K, V, S> Eq for LinkedHashMap<K, V, S>
where
    K: Eq,
    V: Eq,
{
}

impl<K, V, S> FromIterator<(K, V)> for LinkedHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for LinkedHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a LinkedHashMap<K, V, S> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for LinkedHashMap<K, V, S> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.nodes)
    }
}

impl<K, V, S> Index<&K> for LinkedHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    fn index(&self, key: &K) -> &Self::Output {
        self.get(key).expect("key not found")
    }
}
