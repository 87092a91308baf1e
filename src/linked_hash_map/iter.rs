use std::iter::FusedIterator;

use crate::Ptr;
use crate::arena::Arena;

/// An iterator over the entries of a `LinkedHashMap`, in list order.
///
/// This struct is created by the [`iter`] method on [`LinkedHashMap`]. See its
/// documentation for more.
///
/// [`iter`]: super::LinkedHashMap::iter
/// [`LinkedHashMap`]: super::LinkedHashMap
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
/// for (key, value) in map.iter() {
///     println!("{}: {}", key, value);
/// }
/// ```
#[derive(Debug)]
pub struct Iter<'a, K, T> {
    nodes: &'a Arena<K, T>,
    front: Ptr,
    back: Ptr,
    remaining: usize,
}

impl<'a, K, T> Iter<'a, K, T> {
    pub(crate) fn new(nodes: &'a Arena<K, T>) -> Self {
        Iter {
            nodes,
            front: Ptr::HEAD,
            back: Ptr::TAIL,
            remaining: nodes.len(),
        }
    }
}

impl<K, T> Clone for Iter<'_, K, T> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

impl<'a, K, T> Iterator for Iter<'a, K, T> {
    type Item = (&'a K, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.front = self.nodes.next(self.front);

        let data = &self.nodes[self.front];
        Some((&data.key, &data.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, T> DoubleEndedIterator for Iter<'_, K, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.back = self.nodes.prev(self.back);

        let data = &self.nodes[self.back];
        Some((&data.key, &data.value))
    }
}

impl<K, T> ExactSizeIterator for Iter<'_, K, T> {}

impl<K, T> FusedIterator for Iter<'_, K, T> {}

/// An iterator over the keys of a `LinkedHashMap`, in list order.
///
/// This struct is created by [`LinkedHashMap::keys`](super::LinkedHashMap::keys).
#[derive(Debug, Clone)]
pub struct Keys<'a, K, T> {
    pub(crate) inner: Iter<'a, K, T>,
}

impl<'a, K, T> Iterator for Keys<'a, K, T> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, T> DoubleEndedIterator for Keys<'_, K, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, T> ExactSizeIterator for Keys<'_, K, T> {}

/// An iterator over the values of a `LinkedHashMap`, in list order.
///
/// This struct is created by
/// [`LinkedHashMap::values`](super::LinkedHashMap::values).
#[derive(Debug, Clone)]
pub struct Values<'a, K, T> {
    pub(crate) inner: Iter<'a, K, T>,
}

impl<'a, K, T> Iterator for Values<'a, K, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, T> DoubleEndedIterator for Values<'_, K, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, T> ExactSizeIterator for Values<'_, K, T> {}

/// An owning iterator over the entries of a `LinkedHashMap`, in list order.
///
/// This struct is created by the [`into_iter`] method on `LinkedHashMap`
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
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
/// let entries: Vec<_> = map.into_iter().collect();
/// assert_eq!(entries, [("a", 1), ("b", 2)]);
/// ```
#[derive(Debug)]
pub struct IntoIter<K, T> {
    nodes: Arena<K, T>,
}

impl<K, T> IntoIter<K, T> {
    pub(crate) fn new(nodes: Arena<K, T>) -> Self {
        IntoIter { nodes }
    }
}

impl<K, T> Iterator for IntoIter<K, T> {
    type Item = (K, T);

    fn next(&mut self) -> Option<Self::Item> {
        let ptr = self.nodes.first();
        if ptr == Ptr::TAIL {
            return None;
        }
        let data = self.nodes.remove(ptr);
        Some((data.key, data.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.nodes.len(), Some(self.nodes.len()))
    }
}

impl<K, T> DoubleEndedIterator for IntoIter<K, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let ptr = self.nodes.last();
        if ptr == Ptr::HEAD {
            return None;
        }
        let data = self.nodes.remove(ptr);
        Some((data.key, data.value))
    }
}

impl<K, T> ExactSizeIterator for IntoIter<K, T> {}

impl<K, T> FusedIterator for IntoIter<K, T> {}
