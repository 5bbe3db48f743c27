use crate::board::zobrist::splitmix64;
use crate::board::{Board, Move};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

/// A position inside one root player's search. The same board reached under
/// another root player's search is a different key: evaluation is
/// perspective-dependent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub board_hash: u64,
    pub marker: Move,
    pub is_max: bool,
    pub player_search: u8,
}

impl StateKey {
    pub fn new(board: &Board, is_max: bool, player_search: u8) -> Self {
        Self { board_hash: board.hash(), marker: board.marker(), is_max, player_search }
    }

    fn fingerprint(&self) -> u64 {
        let packed = ((self.marker.0 as u64) << 40)
            ^ ((self.marker.1 as u64) << 16)
            ^ ((self.player_search as u64) << 1)
            ^ self.is_max as u64;
        splitmix64(self.board_hash ^ splitmix64(packed))
    }
}

/// Key of the raw heuristic cache, separate from the TT.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HeuristicKey {
    pub board_hash: u64,
    pub is_max: bool,
    pub depth_limit: u32,
    pub player_search: u8,
    pub marker: Move,
}

impl HeuristicKey {
    pub fn new(board: &Board, is_max: bool, depth_limit: u32, player_search: u8) -> Self {
        Self { board_hash: board.hash(), is_max, depth_limit, player_search, marker: board.marker() }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Entry {
    pub key: StateKey,
    /// Plies of search guaranteed below this entry.
    pub depth: u32,
    pub value: i32,
    pub bound: Bound,
    pub gen: u32,
}

const DEFAULT_WAYS: usize = 4;
pub const DEFAULT_CAPACITY: usize = 1 << 16;

#[derive(Default, Clone, Copy)]
struct Slot(Option<Entry>);

#[derive(Default)]
struct Bucket {
    slots: [Slot; DEFAULT_WAYS],
}

/// Bucketed table with depth-preferred replacement. Single-threaded.
#[derive(Default)]
pub struct Tt {
    buckets: Vec<Bucket>,
    gen: u32,
}

impl Tt {
    pub fn new() -> Self {
        let mut t = Self { buckets: Vec::new(), gen: 0 };
        t.set_capacity_entries(DEFAULT_CAPACITY);
        t
    }

    pub fn clear(&mut self) {
        for b in &mut self.buckets { *b = Bucket::default(); }
        self.gen = 0;
    }

    fn bucket_index(&self, key: &StateKey) -> usize {
        let mixed = key.fingerprint();
        (mixed as usize) % self.buckets.len().max(1)
    }

    pub fn get(&self, key: &StateKey) -> Option<Entry> {
        if self.buckets.is_empty() { return None; }
        let b = &self.buckets[self.bucket_index(key)];
        b.slots.iter().filter_map(|s| s.0).find(|e| e.key == *key)
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.slots.iter().filter(|s| s.0.is_some()).count()).sum()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn set_capacity_entries(&mut self, cap: usize) {
        let entries = cap.max(DEFAULT_WAYS);
        let buckets = entries.div_ceil(DEFAULT_WAYS);
        self.buckets.clear();
        self.buckets.resize_with(buckets, Bucket::default);
    }

    pub fn put(&mut self, e: Entry) {
        if self.buckets.is_empty() { return; }
        let idx = self.bucket_index(&e.key);
        let gen = self.gen;
        let bucket = &mut self.buckets[idx];
        let mut e = e;
        e.gen = gen;
        // Same key: keep whichever saw more remaining depth
        for slot in &mut bucket.slots {
            if let Some(cur) = slot.0 {
                if cur.key == e.key {
                    if e.depth >= cur.depth { slot.0 = Some(e); }
                    return;
                }
            }
        }
        if let Some(slot) = bucket.slots.iter_mut().find(|s| s.0.is_none()) {
            slot.0 = Some(e);
            return;
        }
        // Evict the shallowest, then the oldest
        let mut victim = 0usize;
        let mut best_key = (u32::MAX, u32::MAX);
        for (i, slot) in bucket.slots.iter().enumerate() {
            if let Some(cur) = slot.0 {
                let key = (cur.depth, cur.gen);
                if key < best_key { best_key = key; victim = i; }
            }
        }
        bucket.slots[victim].0 = Some(e);
    }

    pub fn bump_generation(&mut self) { self.gen = self.gen.wrapping_add(1); }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(h: u64) -> StateKey {
        StateKey { board_hash: h, marker: (1, 2), is_max: true, player_search: 1 }
    }

    fn entry(h: u64, depth: u32) -> Entry {
        Entry { key: key(h), depth, value: h as i32, bound: Bound::Exact, gen: 0 }
    }

    #[test]
    fn capacity_enforced() {
        let mut tt = Tt::new();
        tt.set_capacity_entries(8);
        for i in 0..64u64 { tt.put(entry(i, (i % 4) as u32)); }
        assert!(tt.len() <= 8, "tt size {} exceeds capacity", tt.len());
    }

    #[test]
    fn shallower_store_does_not_replace_deeper() {
        let mut tt = Tt::new();
        tt.put(entry(5, 4));
        tt.put(Entry { value: -1, ..entry(5, 2) });
        let e = tt.get(&key(5)).unwrap();
        assert_eq!(e.depth, 4);
        assert_eq!(e.value, 5);
    }

    #[test]
    fn search_context_separates_keys() {
        let mut tt = Tt::new();
        tt.put(entry(9, 1));
        let other = StateKey { player_search: 2, ..key(9) };
        assert!(tt.get(&other).is_none());
        let flipped = StateKey { is_max: false, ..key(9) };
        assert!(tt.get(&flipped).is_none());
    }

    #[test]
    fn clear_empties() {
        let mut tt = Tt::new();
        tt.put(entry(1, 1));
        tt.clear();
        assert!(tt.is_empty());
    }
}
