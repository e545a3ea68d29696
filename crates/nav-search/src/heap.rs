//! Open set for the A* core: an array-backed binary min-heap over arena
//! records.
//!
//! # Why not `std::collections::BinaryHeap`
//!
//! A* improves the score of nodes already in the open set.  `BinaryHeap`
//! cannot re-prioritise an element in place, so the usual workaround is to
//! push duplicates and skip stale entries on pop.  Here each arena record
//! carries its own slot in the heap array (`heap_index`), which gives O(1)
//! membership tests and an O(log n) `decrease_key` without duplicates.
//!
//! # Priority
//!
//! | Rank | Key                  | Preferred |
//! |------|----------------------|-----------|
//! | 1    | f-score              | smaller   |
//! | 2    | h-score (`f - g`)    | smaller   |
//!
//! The h tie-break favours nodes nearer the goal among equally costed
//! candidates.

/// An arena record the open set can order and track.
pub trait HeapEntry {
    /// Total estimated cost through this record.
    fn f_score(&self) -> f32;

    /// Accumulated cost from the start.
    fn g_score(&self) -> f32;

    /// Current slot in the heap array, `None` when not in the heap.
    fn heap_index(&self) -> Option<usize>;

    fn set_heap_index(&mut self, index: Option<usize>);

    /// Remaining heuristic estimate.
    #[inline]
    fn h_score(&self) -> f32 {
        self.f_score() - self.g_score()
    }
}

/// `true` if `a` belongs closer to the root than `b`.
#[inline]
fn higher_priority<T: HeapEntry>(a: &T, b: &T) -> bool {
    let (fa, fb) = (a.f_score(), b.f_score());
    fa < fb || (fa == fb && a.h_score() < b.h_score())
}

/// Binary min-heap of arena indices.
///
/// The arena itself is owned by the caller and passed to every operation;
/// the heap only stores `u32` indices into it.
#[derive(Clone, Debug, Default)]
pub struct OpenSet {
    slots: Vec<u32>,
}

impl OpenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { slots: Vec::with_capacity(capacity) }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Arena index at the root, without removing it.
    pub fn peek(&self) -> Option<u32> {
        self.slots.first().copied()
    }

    /// Arena indices in heap-array order.
    pub fn as_slice(&self) -> &[u32] {
        &self.slots
    }

    /// `true` if `item` is currently queued.  O(1) via the back-reference.
    #[inline]
    pub fn contains<T: HeapEntry>(&self, arena: &[T], item: u32) -> bool {
        arena[item as usize]
            .heap_index()
            .is_some_and(|i| self.slots.get(i) == Some(&item))
    }

    /// Queue `item` (append, then sift toward the root).
    ///
    /// # Panics
    /// Panics if `item` is already queued.
    pub fn insert<T: HeapEntry>(&mut self, arena: &mut [T], item: u32) {
        assert!(!self.contains(arena, item), "arena record {item} is already in the open set");
        let pos = self.slots.len();
        self.slots.push(item);
        arena[item as usize].set_heap_index(Some(pos));
        self.sift_up(arena, pos);
    }

    /// Remove and return the highest-priority item.
    pub fn extract_min<T: HeapEntry>(&mut self, arena: &mut [T]) -> Option<u32> {
        let last = self.slots.len().checked_sub(1)?;
        self.swap(arena, 0, last);
        let min = self.slots.pop()?;
        arena[min as usize].set_heap_index(None);
        if !self.slots.is_empty() {
            self.sift_down(arena, 0);
        }
        Some(min)
    }

    /// Restore heap order after `item`'s scores improved externally.
    ///
    /// # Panics
    /// Panics if `item` is not queued.
    pub fn decrease_key<T: HeapEntry>(&mut self, arena: &mut [T], item: u32) {
        let pos = match arena[item as usize].heap_index() {
            Some(pos) if self.slots.get(pos) == Some(&item) => pos,
            _ => panic!("decrease_key on arena record {item} that is not in the open set"),
        };
        self.sift_up(arena, pos);
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Swap two heap slots and both back-references.
    #[inline]
    fn swap<T: HeapEntry>(&mut self, arena: &mut [T], a: usize, b: usize) {
        self.slots.swap(a, b);
        arena[self.slots[a] as usize].set_heap_index(Some(a));
        arena[self.slots[b] as usize].set_heap_index(Some(b));
    }

    fn sift_up<T: HeapEntry>(&mut self, arena: &mut [T], mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            let child_rec = &arena[self.slots[pos] as usize];
            let parent_rec = &arena[self.slots[parent] as usize];
            if !higher_priority(child_rec, parent_rec) {
                break;
            }
            self.swap(arena, pos, parent);
            pos = parent;
        }
    }

    fn sift_down<T: HeapEntry>(&mut self, arena: &mut [T], mut pos: usize) {
        let len = self.slots.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut best = left;
            if right < len
                && higher_priority(&arena[self.slots[right] as usize], &arena[self.slots[left] as usize])
            {
                best = right;
            }
            if !higher_priority(&arena[self.slots[best] as usize], &arena[self.slots[pos] as usize]) {
                break;
            }
            self.swap(arena, pos, best);
            pos = best;
        }
    }
}
