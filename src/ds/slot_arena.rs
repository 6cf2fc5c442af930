//! Slot storage with stable handles.
//!
//! Values live in a `Vec` of slots. Freed slots are threaded into an intrusive
//! free list so the next insert reuses them, keeping handles small and the
//! backing vector dense under insert/evict churn.
//!
//! ```text
//!   slots: [ Occupied(a) | Vacant(next: 3) | Occupied(c) | Vacant(next: -) ]
//!                               ▲
//!   free_head ──────────────────┘
//! ```

/// Stable handle to a value stored in a [`SlotArena`].
///
/// A handle stays valid until its slot is removed; after that the index may be
/// handed out again for an unrelated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<usize> },
}

#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    /// Stores `value` and returns its handle, reusing a freed slot if any.
    pub fn insert(&mut self, value: T) -> SlotId {
        self.len += 1;
        match self.free_head {
            Some(idx) => {
                let slot = std::mem::replace(&mut self.slots[idx], Slot::Occupied(value));
                self.free_head = match slot {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Occupied(_) => panic!("slot arena free list points at an occupied slot"),
                };
                SlotId(idx)
            },
            None => {
                self.slots.push(Slot::Occupied(value));
                SlotId(self.slots.len() - 1)
            },
        }
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.0)?;
        if matches!(slot, Slot::Vacant { .. }) {
            return None;
        }
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match std::mem::replace(slot, vacant) {
            Slot::Occupied(value) => {
                self.free_head = Some(id.0);
                self.len -= 1;
                Some(value)
            },
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        match self.slots.get(id.0)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        match self.slots.get_mut(id.0)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Number of slots the backing storage holds without reallocating.
    pub fn slot_capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }

    /// Removes every value, yielding them in slot order.
    ///
    /// The arena is empty once the iterator is dropped, even if it was not
    /// fully consumed. Allocated capacity is kept.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.free_head = None;
        self.len = 0;
        self.slots.drain(..).filter_map(|slot| match slot {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| match slot {
                Slot::Occupied(value) => Some((SlotId(idx), value)),
                Slot::Vacant { .. } => None,
            })
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_remove_reuses_freed_slot() {
        let mut arena = SlotArena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.get(b), Some(&"b"));

        assert_eq!(arena.remove(a), Some("a"));
        assert_eq!(arena.len(), 1);
        assert!(!arena.contains(a));

        let c = arena.insert("c");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(c), Some(&"c"));
        assert_eq!(a.index(), c.index());
    }

    #[test]
    fn free_list_is_last_in_first_out() {
        let mut arena = SlotArena::new();
        let ids: Vec<_> = (0..4).map(|i| arena.insert(i)).collect();
        arena.remove(ids[1]);
        arena.remove(ids[3]);

        assert_eq!(arena.insert(10), ids[3]);
        assert_eq!(arena.insert(11), ids[1]);
        // free list exhausted: grows the vector
        assert_eq!(arena.insert(12).index(), 4);
        assert_eq!(arena.len(), 5);
    }

    #[test]
    fn double_remove_is_a_no_op() {
        let mut arena = SlotArena::new();
        let id = arena.insert(7);
        assert_eq!(arena.remove(id), Some(7));
        assert_eq!(arena.remove(id), None);
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.remove(SlotId(42)), None);
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut arena = SlotArena::new();
        let id = arena.insert(1);
        if let Some(value) = arena.get_mut(id) {
            *value = 2;
        }
        assert_eq!(arena.get(id), Some(&2));
    }

    #[test]
    fn drain_yields_only_live_values_and_empties() {
        let mut arena = SlotArena::new();
        let a = arena.insert("a");
        arena.insert("b");
        arena.insert("c");
        arena.remove(a);

        let mut drained: Vec<_> = arena.drain().collect();
        drained.sort_unstable();
        assert_eq!(drained, vec!["b", "c"]);
        assert!(arena.is_empty());
        assert_eq!(arena.iter().count(), 0);

        let id = arena.insert("d");
        assert_eq!(id.index(), 0);
    }

    #[test]
    fn iter_skips_vacant_slots() {
        let mut arena = SlotArena::new();
        let a = arena.insert(1);
        let b = arena.insert(2);
        arena.remove(a);
        let live: Vec<_> = arena.iter().collect();
        assert_eq!(live, vec![(b, &2)]);
    }

    #[test]
    fn slot_reuse_keeps_reserved_capacity() {
        let mut arena = SlotArena::with_capacity(4);
        let reserved = arena.slot_capacity();
        let ids: Vec<_> = (0..4).map(|i| arena.insert(i)).collect();
        for round in 0..10 {
            arena.remove(ids[round % 4]);
            arena.insert(round);
        }
        assert_eq!(arena.slot_capacity(), reserved);
        assert_eq!(arena.len(), 4);
    }
}
