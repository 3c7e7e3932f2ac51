//! Recency List Module
//!
//! Arena-backed doubly-linked list ordering entries by last touch.

use crate::cache::CacheEntry;

// == Handle ==
/// Stable position of an entry inside a [`RecencyList`].
///
/// A handle stays valid until its entry is removed; the slot may then be
/// reused by a later insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Handle(usize);

#[derive(Debug)]
struct Node<K, V> {
    entry: CacheEntry<K, V>,
    /// Neighbour toward the front (newer)
    prev: Option<usize>,
    /// Neighbour toward the back (older)
    next: Option<usize>,
}

// == Recency List ==
/// Orders entries by touch time.
///
/// - Front = most recently touched
/// - Back = least recently touched
///
/// Nodes live in a slot arena and link to each other by index, so a handle
/// held elsewhere never aliases a node reference.
#[derive(Debug)]
pub(crate) struct RecencyList<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    /// Vacant slot indices available for reuse
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Accessors ==
    /// Returns the newest entry.
    pub fn front(&self) -> Option<&CacheEntry<K, V>> {
        self.head.and_then(|idx| self.node(idx)).map(|n| &n.entry)
    }

    /// Returns the oldest entry.
    pub fn back(&self) -> Option<&CacheEntry<K, V>> {
        self.tail.and_then(|idx| self.node(idx)).map(|n| &n.entry)
    }

    pub fn get(&self, handle: Handle) -> Option<&CacheEntry<K, V>> {
        self.node(handle.0).map(|n| &n.entry)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut CacheEntry<K, V>> {
        self.node_mut(handle.0).map(|n| &mut n.entry)
    }

    // == Push Front ==
    /// Inserts an entry as the newest and returns its handle.
    pub fn push_front(&mut self, entry: CacheEntry<K, V>) -> Handle {
        let node = Node {
            entry,
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.attach_front(idx);
        self.len += 1;
        Handle(idx)
    }

    // == Move To Front ==
    /// Makes the entry behind `handle` the newest one.
    pub fn move_to_front(&mut self, handle: Handle) {
        if self.head == Some(handle.0) || self.node(handle.0).is_none() {
            return;
        }
        self.detach(handle.0);
        self.attach_front(handle.0);
    }

    // == Remove ==
    /// Unlinks the entry behind `handle` and frees its slot.
    pub fn remove(&mut self, handle: Handle) -> Option<CacheEntry<K, V>> {
        self.node(handle.0)?;
        self.detach(handle.0);
        let node = self.slots[handle.0].take()?;
        self.free.push(handle.0);
        self.len -= 1;
        Some(node.entry)
    }

    // == Pop Back ==
    /// Removes and returns the oldest entry.
    pub fn pop_back(&mut self) -> Option<CacheEntry<K, V>> {
        let tail = self.tail?;
        self.remove(Handle(tail))
    }

    // == Clear ==
    /// Drops every entry and releases the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iterate ==
    /// Iterates entries from oldest (back) to newest (front).
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.tail,
            remaining: self.len,
        }
    }

    fn node(&self, idx: usize) -> Option<&Node<K, V>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node<K, V>> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    fn detach(&mut self, idx: usize) {
        let Some((prev, next)) = self.node(idx).map(|n| (n.prev, n.next)) else {
            return;
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = None;
        }
    }

    fn attach_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head.and_then(|h| self.node_mut(h)) {
            Some(node) => node.prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }
}

// == Iterator ==
/// Oldest-first iterator over a [`RecencyList`].
pub(crate) struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a CacheEntry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.prev;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
