use std::ops::{
    Index,
    IndexMut,
};

use crate::Ptr;

#[cold]
#[inline(never)]
fn assert_occupied() -> ! {
    panic!("Attempted to access data of a free or sentinel slot");
}

#[cold]
#[inline(never)]
fn assert_not_sentinel() -> ! {
    panic!("Attempted to splice a sentinel slot");
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct LLData<K, T> {
    pub(crate) hash: u64,
    pub(crate) key: K,
    pub(crate) value: T,
}

#[derive(Debug, Clone, Copy)]
enum SlotState<K, T> {
    Sentinel,
    Free { next_free: Option<Ptr> },
    Data(LLData<K, T>),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct LLSlot<K, T> {
    prev: Ptr,
    next: Ptr,
    state: SlotState<K, T>,
}

impl<K, T> LLSlot<K, T> {
    fn sentinel(prev: Ptr, next: Ptr) -> Self {
        LLSlot {
            prev,
            next,
            state: SlotState::Sentinel,
        }
    }

    pub(crate) fn prev(&self) -> Ptr {
        self.prev
    }

    pub(crate) fn next(&self) -> Ptr {
        self.next
    }

    pub(crate) fn is_data(&self) -> bool {
        matches!(self.state, SlotState::Data(_))
    }

    pub(crate) fn into_data(self) -> LLData<K, T> {
        match self.state {
            SlotState::Data(data) => data,
            _ => assert_occupied(),
        }
    }

    pub(crate) fn data(&self) -> &LLData<K, T> {
        match &self.state {
            SlotState::Data(data) => data,
            _ => assert_occupied(),
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut LLData<K, T> {
        match &mut self.state {
            SlotState::Data(data) => data,
            _ => assert_occupied(),
        }
    }
}

/// Slot storage for the order list.
///
/// Slots 0 and 1 are the head and tail sentinels. They are allocated on
/// construction, never freed, and linked directly to each other while the list
/// is empty. Every other slot is either holding an entry or on the free list.
#[derive(Debug, Clone)]
pub(crate) struct Arena<K, T> {
    nodes: Vec<LLSlot<K, T>>,
    free_head: Option<Ptr>,
    len: usize,
}

impl<K, T> Arena<K, T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.saturating_add(2));
        nodes.push(LLSlot::sentinel(Ptr::HEAD, Ptr::TAIL));
        nodes.push(LLSlot::sentinel(Ptr::HEAD, Ptr::TAIL));
        Arena {
            nodes,
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Number of slots ever handed out, sentinels included.
    pub(crate) fn slots(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn links(&self, ptr: Ptr) -> &LLSlot<K, T> {
        &self.nodes[ptr.unchecked_get()]
    }

    pub(crate) fn next(&self, ptr: Ptr) -> Ptr {
        self.links(ptr).next()
    }

    pub(crate) fn prev(&self, ptr: Ptr) -> Ptr {
        self.links(ptr).prev()
    }

    pub(crate) fn first(&self) -> Ptr {
        self.next(Ptr::HEAD)
    }

    pub(crate) fn last(&self) -> Ptr {
        self.prev(Ptr::TAIL)
    }

    /// Drops every entry and relinks the sentinels to each other.
    ///
    /// Reserved capacity is kept.
    pub(crate) fn reset(&mut self) {
        self.nodes.truncate(2);
        self.nodes[Ptr::HEAD.unchecked_get()] = LLSlot::sentinel(Ptr::HEAD, Ptr::TAIL);
        self.nodes[Ptr::TAIL.unchecked_get()] = LLSlot::sentinel(Ptr::HEAD, Ptr::TAIL);
        self.free_head = None;
        self.len = 0;
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        // Occupied slots can't be compacted without rewriting the index, so
        // this only releases spare capacity past the highest slot in use.
        self.nodes.shrink_to_fit();
    }

    /// Stores an entry in a fresh or recycled slot. The slot is not linked
    /// into the order list; its links point at itself until spliced in.
    pub(crate) fn alloc(&mut self, key: K, value: T, hash: u64) -> Ptr {
        let data = SlotState::Data(LLData { hash, key, value });
        self.len += 1;

        if let Some(ptr) = self.free_head {
            let slot = &mut self.nodes[ptr.unchecked_get()];
            self.free_head = match slot.state {
                SlotState::Free { next_free } => next_free,
                _ => unreachable!("free list points at a live slot"),
            };
            *slot = LLSlot {
                prev: ptr,
                next: ptr,
                state: data,
            };
            return ptr;
        }

        if self.nodes.len() == self.nodes.capacity() {
            tracing::trace!(
                capacity = self.nodes.capacity(),
                "growing order list arena"
            );
        }

        let ptr = Ptr::unchecked_from(self.nodes.len());
        self.nodes.push(LLSlot {
            prev: ptr,
            next: ptr,
            state: data,
        });
        ptr
    }

    pub(crate) fn is_occupied(&self, ptr: Ptr) -> bool {
        self.nodes
            .get(ptr.unchecked_get())
            .is_some_and(LLSlot::is_data)
    }

    /// Splices `ptr` in directly after `anchor`. `ptr` must be detached.
    pub(crate) fn link_after(&mut self, ptr: Ptr, anchor: Ptr) {
        if ptr.is_sentinel() || anchor == Ptr::TAIL {
            assert_not_sentinel();
        }
        debug_assert!(self.is_occupied(ptr));

        let next = self.next(anchor);
        let slot = &mut self.nodes[ptr.unchecked_get()];
        slot.prev = anchor;
        slot.next = next;
        self.nodes[anchor.unchecked_get()].next = ptr;
        self.nodes[next.unchecked_get()].prev = ptr;
    }

    /// Splices `ptr` in directly before `anchor`. `ptr` must be detached.
    pub(crate) fn link_before(&mut self, ptr: Ptr, anchor: Ptr) {
        if anchor == Ptr::HEAD {
            assert_not_sentinel();
        }
        let prev = self.prev(anchor);
        self.link_after(ptr, prev);
    }

    /// Joins the neighbours of `ptr` and leaves `ptr` detached.
    pub(crate) fn unlink(&mut self, ptr: Ptr) {
        if ptr.is_sentinel() {
            assert_not_sentinel();
        }

        let slot = &mut self.nodes[ptr.unchecked_get()];
        let (prev, next) = (slot.prev, slot.next);
        slot.prev = ptr;
        slot.next = ptr;
        self.nodes[prev.unchecked_get()].next = next;
        self.nodes[next.unchecked_get()].prev = prev;
    }

    /// Unlinks `ptr` and returns its slot to the free list.
    pub(crate) fn remove(&mut self, ptr: Ptr) -> LLData<K, T> {
        assert!(self.is_occupied(ptr), "Pointer to free must be occupied");
        self.unlink(ptr);

        let freed = std::mem::replace(
            &mut self.nodes[ptr.unchecked_get()],
            LLSlot {
                prev: ptr,
                next: ptr,
                state: SlotState::Free {
                    next_free: self.free_head,
                },
            },
        );
        self.free_head = Some(ptr);
        self.len -= 1;

        freed.into_data()
    }
}

impl<K, T> Index<Ptr> for Arena<K, T> {
    type Output = LLData<K, T>;

    fn index(&self, index: Ptr) -> &Self::Output {
        self.nodes[index.unchecked_get()].data()
    }
}

impl<K, T> IndexMut<Ptr> for Arena<K, T> {
    fn index_mut(&mut self, index: Ptr) -> &mut Self::Output {
        self.nodes[index.unchecked_get()].data_mut()
    }
}
