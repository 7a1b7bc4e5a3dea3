//! A grow-only arena indexed by dense integer keys.
//!
//! [`GrowOnlyArena`] backs the node-recompilation-info side table: each slot
//! is written exactly once (immediately after a node is constructed) and
//! read many times concurrently with writes to *other* slots. Growth
//! (extending the backing vector) and the rare "clear" on node deletion are
//! the only operations that need exclusive access; a plain read lock is
//! enough for the hot path of reading an already-populated slot.
//!
//! This is a simpler cousin of the teacher's TBB-concurrent-container
//! idiom: instead of a per-slot atomic "constructed" flag, we hold the whole
//! table behind a `parking_lot::RwLock`, which keeps the implementation free
//! of `unsafe`, at the cost of readers briefly contending with writers
//! during growth. See `DESIGN.md` for the tradeoff.

use parking_lot::RwLock;

/// A dense, grow-only table from `usize` index to `Option<T>`.
pub struct GrowOnlyArena<T> {
    slots: RwLock<Vec<Option<T>>>,
}

impl<T> Default for GrowOnlyArena<T> {
    fn default() -> Self {
        Self {
            slots: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Clone> GrowOnlyArena<T> {
    /// Creates a new, empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a clone of the value at `index`, or `None` if the slot is
    /// unpopulated or out of bounds.
    pub fn get(&self, index: usize) -> Option<T> {
        self.slots.read().get(index).and_then(|s| s.clone())
    }

    /// Grows the arena if necessary, then stores `value` at `index`.
    ///
    /// Safe to call concurrently with other calls to `set` at distinct
    /// indices; calls at the same index race on which value wins, which
    /// never happens in practice since each node index is set exactly once.
    pub fn set(&self, index: usize, value: T) {
        let mut slots = self.slots.write();
        if slots.len() <= index {
            slots.resize(index + 1, None);
        }
        slots[index] = Some(value);
    }

    /// Clears the slot at `index`, if present.
    pub fn clear(&self, index: usize) {
        let mut slots = self.slots.write();
        if let Some(slot) = slots.get_mut(index) {
            *slot = None;
        }
    }

    /// Returns the number of slots currently allocated (including empty
    /// ones), mostly useful for tests.
    pub fn capacity_len(&self) -> usize {
        self.slots.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let arena: GrowOnlyArena<&'static str> = GrowOnlyArena::new();
        arena.set(3, "three");
        assert_eq!(arena.get(3), Some("three"));
        assert_eq!(arena.get(0), None);
        assert_eq!(arena.get(100), None);
        assert_eq!(arena.capacity_len(), 4);
    }

    #[test]
    fn clear_removes_value() {
        let arena: GrowOnlyArena<u32> = GrowOnlyArena::new();
        arena.set(0, 42);
        arena.clear(0);
        assert_eq!(arena.get(0), None);
    }

    #[test]
    fn concurrent_sets_at_distinct_indices() {
        use std::sync::Arc;
        use std::thread;

        let arena = Arc::new(GrowOnlyArena::<usize>::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let arena = Arc::clone(&arena);
                thread::spawn(move || arena.set(i, i * 10))
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        for i in 0..16 {
            assert_eq!(arena.get(i), Some(i * 10));
        }
    }
}
