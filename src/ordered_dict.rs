//! Thread-safe insertion-ordered map.
//!
//! [`OrderedDict`] places a [`LinkedHashMap`] behind a single reader/writer
//! lock. The index and the order list are only ever touched together, under
//! one acquisition, so no caller can observe them disagreeing. Every method is
//! a single critical section: reads take the lock shared, anything that
//! changes a value or the order takes it exclusive.
//!
//! The lock is not re-entrant. Calling back into the same dictionary from
//! inside [`OrderedDict::try_for_each`], or while a [`GuardedIter`] is alive on
//! the same thread, can deadlock once a writer is queued.

use std::fmt;
use std::hash::BuildHasher;
use std::hash::Hash;
use std::iter::FusedIterator;
use std::ops::ControlFlow;

use parking_lot::RwLock;
use parking_lot::RwLockReadGuard;

use crate::Ptr;
use crate::RandomState;
use crate::linked_hash_map::LinkedHashMap;

/// A concurrent hash map that remembers insertion order.
///
/// New keys are appended to the end of the order; re-inserting a key replaces
/// its value without moving it. Entries can be repositioned in O(1) with
/// [`move_to_start`](Self::move_to_start), [`move_to_end`](Self::move_to_end),
/// [`move_after`](Self::move_after) and [`move_before`](Self::move_before).
///
/// All methods take `&self`; share the dictionary between threads with an
/// `Arc`. Values are handed out by clone, so callers never hold references
/// into the locked state.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use tether_dict::OrderedDict;
///
/// let dict = Arc::new(OrderedDict::new());
/// let handles: Vec<_> = (0..4)
///     .map(|t| {
///         let dict = Arc::clone(&dict);
///         thread::spawn(move || {
///             for i in 0..100 {
///                 dict.set(t * 100 + i, i);
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(dict.len(), 400);
/// ```
pub struct OrderedDict<K, V, S = RandomState> {
    inner: RwLock<LinkedHashMap<K, V, S>>,
}

impl<K, V> OrderedDict<K, V> {
    /// Creates an empty dictionary.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::OrderedDict;
    ///
    /// let dict: OrderedDict<String, u32> = OrderedDict::new();
    /// assert!(dict.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty dictionary with room for at least `capacity` entries.
    ///
    /// The capacity is only a hint; the dictionary grows past it as needed.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from(LinkedHashMap::with_capacity(capacity))
    }
}

impl<K, V, S> OrderedDict<K, V, S> {
    /// Creates an empty dictionary which will use the given hasher.
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    /// Creates an empty dictionary with the given capacity hint and hasher.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::from(LinkedHashMap::with_capacity_and_hasher(capacity, hasher))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if the dictionary holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Removes every entry.
    ///
    /// Afterwards the dictionary behaves exactly like a freshly constructed
    /// one.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Returns a snapshot of the keys in their current order.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::OrderedDict;
    ///
    /// let dict = OrderedDict::new();
    /// dict.set("first", 1);
    /// dict.set("second", 2);
    /// dict.set("third", 3);
    ///
    /// assert_eq!(dict.keys(), ["first", "second", "third"]);
    /// assert_eq!(dict.values(), [1, 2, 3]);
    /// ```
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.inner.read().keys().cloned().collect()
    }

    /// Returns a snapshot of the values in key order.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.inner.read().values().cloned().collect()
    }

    /// Returns a snapshot of every entry in order.
    pub fn entries(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.inner
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Returns a clone of the first entry.
    pub fn first(&self) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.inner
            .read()
            .first()
            .map(|(k, v)| (k.clone(), v.clone()))
    }

    /// Returns a clone of the last entry.
    pub fn last(&self) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.inner
            .read()
            .last()
            .map(|(k, v)| (k.clone(), v.clone()))
    }

    /// Returns a lazy iterator over cloned entries in order.
    ///
    /// The iterator holds the read lock until it is dropped: writers wait for
    /// the walk to finish or be abandoned, so the walk always sees one
    /// consistent order. Drop the iterator (or break out of the loop) to
    /// release the lock early.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::OrderedDict;
    ///
    /// let dict = OrderedDict::new();
    /// for (i, key) in ["a", "b", "c"].into_iter().enumerate() {
    ///     dict.set(key, i);
    /// }
    ///
    /// let mut seen = Vec::new();
    /// for (key, value) in dict.iter() {
    ///     if value == 2 {
    ///         break;
    ///     }
    ///     seen.push(key);
    /// }
    /// assert_eq!(seen, ["a", "b"]);
    ///
    /// // The lock was released when the loop ended.
    /// dict.set("d", 3);
    /// ```
    pub fn iter(&self) -> GuardedIter<'_, K, V, S> {
        GuardedIter::new(self.inner.read())
    }

    /// Visits entries in order by reference, stopping as soon as `f` returns
    /// [`ControlFlow::Break`].
    ///
    /// The read lock is held for the whole walk.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::ControlFlow;
    ///
    /// use tether_dict::OrderedDict;
    ///
    /// let dict: OrderedDict<_, _> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
    ///
    /// let found = dict.try_for_each(|key, value| {
    ///     if *value >= 2 {
    ///         ControlFlow::Break(*key)
    ///     } else {
    ///         ControlFlow::Continue(())
    ///     }
    /// });
    /// assert_eq!(found, ControlFlow::Break("b"));
    /// ```
    pub fn try_for_each<B, F>(&self, mut f: F) -> ControlFlow<B>
    where
        F: FnMut(&K, &V) -> ControlFlow<B>,
    {
        let guard = self.inner.read();
        for (k, v) in guard.iter() {
            if let ControlFlow::Break(b) = f(k, v) {
                return ControlFlow::Break(b);
            }
        }
        ControlFlow::Continue(())
    }

    /// Consumes the dictionary, returning the unsynchronized map.
    pub fn into_inner(self) -> LinkedHashMap<K, V, S> {
        self.inner.into_inner()
    }

    /// Returns a mutable reference to the unsynchronized map.
    ///
    /// No locking takes place; the exclusive borrow already rules out other
    /// accessors.
    pub fn get_mut(&mut self) -> &mut LinkedHashMap<K, V, S> {
        self.inner.get_mut()
    }

    /// Asserts that the index and the order list agree, under the read lock.
    #[doc(hidden)]
    pub fn debug_validate(&self)
    where
        K: Hash + Eq,
        S: BuildHasher,
    {
        self.inner.read().debug_validate();
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> OrderedDict<K, V, S> {
    /// Inserts or updates a key.
    ///
    /// A new key is appended to the end of the order; an existing key keeps
    /// its position and only has its value replaced.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::OrderedDict;
    ///
    /// let dict = OrderedDict::new();
    /// dict.set("a", 1);
    /// dict.set("b", 2);
    /// dict.set("a", 10);
    ///
    /// assert_eq!(dict.keys(), ["a", "b"]);
    /// assert_eq!(dict.get(&"a"), Some(10));
    /// ```
    pub fn set(&self, key: K, value: V) {
        self.insert(key, value);
    }

    /// Inserts or updates a key like [`set`](Self::set), returning the value
    /// that was replaced.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    /// Returns a clone of the value stored for `key`.
    ///
    /// Lookups never change the order.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    /// Runs `f` on the value stored for `key` while holding the read lock.
    ///
    /// Useful when `V` is expensive or impossible to clone.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::OrderedDict;
    ///
    /// let dict = OrderedDict::new();
    /// dict.set("greeting", String::from("hello"));
    ///
    /// assert_eq!(dict.get_with(&"greeting", |s| s.len()), Some(5));
    /// assert_eq!(dict.get_with(&"missing", |s| s.len()), None);
    /// ```
    pub fn get_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        self.inner.read().get(key).map(f)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.read().contains_key(key)
    }

    /// Alias for [`contains_key`](Self::contains_key).
    pub fn has(&self, key: &K) -> bool {
        self.contains_key(key)
    }

    /// Removes `key`, returning its value if it was present.
    ///
    /// The remaining entries keep their relative order.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::OrderedDict;
    ///
    /// let dict = OrderedDict::new();
    /// dict.set("first", 1);
    /// dict.set("second", 2);
    /// dict.set("third", 3);
    ///
    /// assert_eq!(dict.delete(&"second"), Some(2));
    /// assert_eq!(dict.delete(&"second"), None);
    /// assert_eq!(dict.keys(), ["first", "third"]);
    /// assert_eq!(dict.len(), 2);
    /// ```
    pub fn delete(&self, key: &K) -> Option<V> {
        self.inner.write().remove(key)
    }

    /// Removes `key`, returning whether it was present.
    pub fn remove(&self, key: &K) -> bool {
        self.delete(key).is_some()
    }

    /// Removes and returns the first entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::OrderedDict;
    ///
    /// let dict = OrderedDict::new();
    /// dict.set("old", 1);
    /// dict.set("new", 2);
    ///
    /// assert_eq!(dict.pop_first(), Some(("old", 1)));
    /// assert_eq!(dict.keys(), ["new"]);
    /// ```
    pub fn pop_first(&self) -> Option<(K, V)> {
        self.inner.write().pop_first()
    }

    /// Removes and returns the last entry.
    pub fn pop_last(&self) -> Option<(K, V)> {
        self.inner.write().pop_last()
    }

    /// Moves `key` to the start of the order.
    ///
    /// Returns `false` and changes nothing if `key` is absent.
    pub fn move_to_start(&self, key: &K) -> bool {
        self.inner.write().move_to_start(key)
    }

    /// Moves `key` to the end of the order.
    ///
    /// Returns `false` and changes nothing if `key` is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether_dict::OrderedDict;
    ///
    /// let dict = OrderedDict::new();
    /// for key in ["a", "b", "c"] {
    ///     dict.set(key, ());
    /// }
    ///
    /// assert!(dict.move_to_end(&"a"));
    /// assert_eq!(dict.keys(), ["b", "c", "a"]);
    /// assert!(dict.move_to_start(&"c"));
    /// assert_eq!(dict.keys(), ["c", "b", "a"]);
    /// assert!(dict.move_after(&"c", &"a"));
    /// assert_eq!(dict.keys(), ["b", "a", "c"]);
    /// ```
    pub fn move_to_end(&self, key: &K) -> bool {
        self.inner.write().move_to_end(key)
    }

    /// Moves `key` to directly after `after`.
    ///
    /// Both keys must be present, otherwise `false` is returned and nothing
    /// changes. The target is evaluated after `key` is unlinked, so
    /// `move_after(k, k)` places `k` after its former successor.
    ///
    /// See [`LinkedHashMap::move_after`].
    pub fn move_after(&self, key: &K, after: &K) -> bool {
        self.inner.write().move_after(key, after)
    }

    /// Moves `key` to directly before `before`.
    ///
    /// See [`LinkedHashMap::move_before`].
    pub fn move_before(&self, key: &K, before: &K) -> bool {
        self.inner.write().move_before(key, before)
    }

    /// Keeps only the entries for which `f` returns `true`.
    pub fn retain<F>(&self, f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.inner.write().retain(f);
    }
}

impl<K, V, S> From<LinkedHashMap<K, V, S>> for OrderedDict<K, V, S> {
    fn from(map: LinkedHashMap<K, V, S>) -> Self {
        OrderedDict {
            inner: RwLock::new(map),
        }
    }
}

impl<K, V, S: Default> Default for OrderedDict<K, V, S> {
    fn default() -> Self {
        Self::from(LinkedHashMap::default())
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for OrderedDict<K, V, S> {
    fn clone(&self) -> Self {
        Self::from(self.inner.read().clone())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for OrderedDict<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.read().iter()).finish()
    }
}

/// Renders `OrderedDict[k1:v1 k2:v2 ...]` in the current order.
impl<K: fmt::Display, V: fmt::Display, S> fmt::Display for OrderedDict<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OrderedDict[")?;
        let guard = self.inner.read();
        for (i, (k, v)) in guard.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{k}:{v}")?;
        }
        f.write_str("]")
    }
}

impl<K, V, S> FromIterator<(K, V)> for OrderedDict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from(LinkedHashMap::from_iter(iter))
    }
}

impl<K, V, S> Extend<(K, V)> for OrderedDict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Inserts every pair under a single write lock acquisition.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.inner.get_mut().extend(iter);
    }
}

impl<'a, K: Clone, V: Clone, S> IntoIterator for &'a OrderedDict<K, V, S> {
    type IntoIter = GuardedIter<'a, K, V, S>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for OrderedDict<K, V, S> {
    type IntoIter = crate::linked_hash_map::IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        self.into_inner().into_iter()
    }
}

/// A lazy iterator over an [`OrderedDict`] that holds its read lock.
///
/// Created by [`OrderedDict::iter`]. Entries are yielded as clones in list
/// order. The read lock is released when the iterator is dropped, whether or
/// not it ran to completion.
#[must_use = "iterators are lazy and hold the read lock until dropped"]
pub struct GuardedIter<'a, K, V, S> {
    guard: RwLockReadGuard<'a, LinkedHashMap<K, V, S>>,
    cursor: Ptr,
    remaining: usize,
}

impl<'a, K, V, S> GuardedIter<'a, K, V, S> {
    fn new(guard: RwLockReadGuard<'a, LinkedHashMap<K, V, S>>) -> Self {
        let remaining = guard.len();
        GuardedIter {
            guard,
            cursor: Ptr::HEAD,
            remaining,
        }
    }
}

impl<K: Clone, V: Clone, S> Iterator for GuardedIter<'_, K, V, S> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.cursor = self.guard.nodes.next(self.cursor);

        let data = &self.guard.nodes[self.cursor];
        Some((data.key.clone(), data.value.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Clone, V: Clone, S> ExactSizeIterator for GuardedIter<'_, K, V, S> {}

impl<K: Clone, V: Clone, S> FusedIterator for GuardedIter<'_, K, V, S> {}

impl<K, V, S> fmt::Debug for GuardedIter<'_, K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardedIter")
            .field("cursor", &self.cursor)
            .field("remaining", &self.remaining)
            .finish()
    }
}
