//! Keyed min-priority queue backed by an implicit D-ary heap.
//!
//! Entries are addressed through stable [`Handle`]s so a caller can lower the
//! key of an element that is already queued (`decrease_key`), which is what an
//! eager Prim-style frontier relaxation needs. Keys only have to be
//! `PartialOrd`; incomparable keys (e.g. NaN) are treated as not-smaller.

/// Stable reference to an entry of a [`DHeap`], handed out by `insert`.
///
/// A handle stays valid for `decrease_key` until its entry is removed by
/// `delete_min`; using it afterwards is a contract violation and panics.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Handle(u32);

/// Position marker for entries that have been removed from the heap.
const REMOVED: usize = usize::MAX;

struct Entry<K, P> {
    key: K,
    // taken out on delete_min, the slot itself is kept for handle stability
    payload: Option<P>,
    pos: usize,
}

pub struct DHeap<K, P> {
    arity: usize,
    // heap-ordered entry indices
    heap: Vec<u32>,
    // entry arena, indexed by Handle; slots are never reused
    entries: Vec<Entry<K, P>>,
}

impl<K, P> DHeap<K, P>
where
    K: PartialOrd,
{
    /// Creates an empty heap with the default arity of 4.
    pub fn new() -> Self {
        Self::with_arity(4)
    }

    /// Creates an empty heap where every node has up to `arity` children.
    pub fn with_arity(arity: usize) -> Self {
        assert!(arity >= 2, "heap arity must be at least 2");
        Self {
            arity,
            heap: Vec::new(),
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Inserts `payload` with priority `key`; O(log n).
    pub fn insert(&mut self, key: K, payload: P) -> Handle {
        let idx = self.entries.len() as u32;
        let pos = self.heap.len();
        self.entries.push(Entry {
            key,
            payload: Some(payload),
            pos,
        });
        self.heap.push(idx);
        self.sift_up(pos);
        Handle(idx)
    }

    /// Returns the payload with the minimal key without removing it; O(1).
    ///
    /// As long as the heap is not mutated in between, `delete_min` removes
    /// exactly the element returned here.
    pub fn find_min(&self) -> Option<&P> {
        self.heap
            .first()
            .map(|&idx| self.entries[idx as usize].payload.as_ref().unwrap())
    }

    /// Removes the entry with the minimal key and returns its payload; O(d log n).
    pub fn delete_min(&mut self) -> Option<P> {
        if self.heap.is_empty() {
            return None;
        }
        let min = self.heap[0] as usize;
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        self.entries[self.heap[0] as usize].pos = 0;
        self.heap.pop();
        self.entries[min].pos = REMOVED;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        self.entries[min].payload.take()
    }

    /// Lowers the key of a queued entry; O(log n).
    ///
    /// Panics if the entry was already removed or if `new_key` is not
    /// strictly smaller than the entry's current key.
    pub fn decrease_key(&mut self, new_key: K, handle: Handle) {
        let entry = &mut self.entries[handle.0 as usize];
        assert!(
            entry.pos != REMOVED,
            "decrease_key on an entry that was already removed"
        );
        assert!(
            new_key < entry.key,
            "decrease_key requires a strictly smaller key"
        );
        entry.key = new_key;
        let pos = entry.pos;
        self.sift_up(pos);
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / self.arity;
            if self.key_at(pos) < self.key_at(parent) {
                self.swap_slots(pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        loop {
            let first_child = pos * self.arity + 1;
            if first_child >= self.heap.len() {
                break;
            }
            let last_child = (first_child + self.arity).min(self.heap.len());
            let mut smallest = first_child;
            for child in first_child + 1..last_child {
                if self.key_at(child) < self.key_at(smallest) {
                    smallest = child;
                }
            }
            if self.key_at(smallest) < self.key_at(pos) {
                self.swap_slots(pos, smallest);
                pos = smallest;
            } else {
                break;
            }
        }
    }

    #[inline(always)]
    fn key_at(&self, pos: usize) -> &K {
        &self.entries[self.heap[pos] as usize].key
    }

    #[inline(always)]
    fn swap_slots(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.entries[self.heap[a] as usize].pos = a;
        self.entries[self.heap[b] as usize].pos = b;
    }
}
