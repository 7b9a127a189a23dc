//! Recency Order Module
//!
//! Index-addressed doubly linked list used to keep cache entries in
//! access order.

// == Slot ==
/// A cell in the backing arena. Vacant slots have `value == None` and sit on
/// the free list until reused.
#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Doubly linked list over a slot arena.
///
/// Nodes are addressed by their slot index, which stays stable for as long
/// as the node is linked, so a `HashMap<K, usize>` can point straight at
/// them. Every operation is O(1):
/// - Front = Most recently used
/// - Back = Least recently used
#[derive(Debug)]
pub struct RecencyList<T> {
    slots: Vec<Slot<T>>,
    /// Vacated slot indices available for reuse
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Links `value` at the front and returns its handle.
    pub fn push_front(&mut self, value: T) -> usize {
        let slot = Slot {
            value: Some(value),
            prev: None,
            next: None,
        };

        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = slot;
                idx
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        };

        self.link_front(idx);
        self.len += 1;
        idx
    }

    // == Move To Front ==
    /// Marks the node at `idx` as most recently used.
    ///
    /// Returns false if `idx` does not address a live node.
    pub fn move_to_front(&mut self, idx: usize) -> bool {
        if !self.is_occupied(idx) {
            return false;
        }
        if self.head != Some(idx) {
            self.unlink(idx);
            self.link_front(idx);
        }
        true
    }

    // == Remove ==
    /// Unlinks the node at `idx` and returns its value.
    pub fn remove(&mut self, idx: usize) -> Option<T> {
        if !self.is_occupied(idx) {
            return None;
        }

        self.unlink(idx);
        self.free.push(idx);
        self.len -= 1;
        self.slots[idx].value.take()
    }

    // == Pop Back ==
    /// Removes and returns the least recently used value.
    pub fn pop_back(&mut self) -> Option<T> {
        let idx = self.tail?;
        self.remove(idx)
    }

    // == Accessors ==
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.slots.get(idx).and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.slots.get_mut(idx).and_then(|slot| slot.value.as_mut())
    }

    /// Returns the least recently used value without removing it.
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|idx| self.get(idx))
    }

    /// Returns the most recently used value.
    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|idx| self.get(idx))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iteration ==
    /// Iterates `(handle, value)` pairs from front (newest) to back (oldest).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    // == Linking ==
    fn is_occupied(&self, idx: usize) -> bool {
        self.slots
            .get(idx)
            .is_some_and(|slot| slot.value.is_some())
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let slot = &self.slots[idx];
            (slot.prev, slot.next)
        };

        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }

        let slot = &mut self.slots[idx];
        slot.prev = None;
        slot.next = None;
    }

    fn link_front(&mut self, idx: usize) {
        self.slots[idx].prev = None;
        self.slots[idx].next = self.head;

        match self.head {
            Some(old_head) => self.slots[old_head].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }
}

// == Iterator ==
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let slot = &self.list.slots[idx];
        self.cursor = slot.next;
        slot.value.as_ref().map(|value| (idx, value))
    }
}
