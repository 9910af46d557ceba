// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Canonicalizes [`BitSet`] values by content using an arena-and-stable-index
//! design (see `DESIGN.md`) rather than a pointer graph: bitsets live in a
//! slab-style [`BitSetArena`] and are referenced everywhere else by
//! [`BitSetId`]; one [`InternTable`] holds, per first-variable, the chained
//! buckets of a textbook resizable hash table.

use crate::bitset::BitSet;

/// A stable reference into a [`BitSetArena`]. Cheap to copy, cheap to hash.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct BitSetId(u32);

/// Slab allocator for [`BitSet`] storage, with a free list that recycles the
/// slots of bitsets released by [`InternTable::flush_vars`].
#[derive(Default)]
pub struct BitSetArena {
    slots: Vec<BitSet>,
    free: Vec<u32>,
}

impl BitSetArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh, empty bitset and returns its id.
    pub fn alloc(&mut self) -> BitSetId {
        if let Some(idx) = self.free.pop() {
            self.slots[idx as usize] = BitSet::new();
            BitSetId(idx)
        } else {
            self.slots.push(BitSet::new());
            BitSetId((self.slots.len() - 1) as u32)
        }
    }

    pub fn get(&self, id: BitSetId) -> &BitSet {
        &self.slots[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: BitSetId) -> &mut BitSet {
        &mut self.slots[id.0 as usize]
    }

    /// Returns a slot to the free list for reuse. Callers must ensure no
    /// remaining reference to `id` survives this call.
    pub fn free(&mut self, id: BitSetId) {
        self.free.push(id.0);
    }
}

const INITIAL_SLOTS: usize = 2 << 10;
const LOAD_FACTOR: f64 = 0.75;

/// The chained-bucket hash table for a single variable, keyed by bitset
/// content hash. Buckets are plain `Vec`s rather than an intrusive linked
/// list - equivalent chaining semantics, idiomatic storage.
struct VarTable {
    buckets: Vec<Vec<BitSetId>>,
    num_keys: usize,
}

impl VarTable {
    fn new() -> Self {
        VarTable {
            buckets: vec![Vec::new(); INITIAL_SLOTS],
            num_keys: 0,
        }
    }

    fn expand(&mut self, arena: &BitSetArena) {
        let old_capacity = self.buckets.len();
        let new_capacity = old_capacity * 2;
        let split_bit = old_capacity.trailing_zeros();
        let mut new_buckets: Vec<Vec<BitSetId>> = vec![Vec::new(); new_capacity];
        for (slot, chain) in self.buckets.drain(..).enumerate() {
            for id in chain {
                let h = arena.get(id).hash_code as usize;
                let moves = (h >> split_bit) & 1 == 1;
                let dest = if moves { slot + old_capacity } else { slot };
                new_buckets[dest].push(id);
            }
        }
        self.buckets = new_buckets;
    }
}

/// One hash table per variable, indexed by the smallest variable appearing in
/// a bitset's content (`firstSetBit(bs) / 2`). Bitsets with no set bit at all
/// canonicalize to the shared empty bitset rather than entering any table.
pub struct InternTable {
    tables: Vec<VarTable>,
    empty_id: BitSetId,
}

impl InternTable {
    /// `num_vars` is the number of variables after preprocessing; tables are
    /// indexed `1..=num_vars`.
    pub fn new(num_vars: u32, arena: &mut BitSetArena) -> Self {
        let empty_id = arena.alloc();
        let mut tables = Vec::with_capacity(num_vars as usize + 1);
        for _ in 0..=num_vars {
            tables.push(VarTable::new());
        }
        InternTable { tables, empty_id }
    }

    /// The canonical representative of the empty bitset.
    pub fn empty_id(&self) -> BitSetId {
        self.empty_id
    }

    /// Canonicalizes `candidate` (already allocated in `arena`, with its bits
    /// already set): if an equal bitset is already interned, `candidate` is
    /// freed and the existing id is returned; otherwise `candidate` is
    /// inserted and its own id is returned. `candidate`'s hash code must
    /// already be up to date (see [`BitSet::recompute_hash`]).
    ///
    /// `unused_words` must be the engine's *current* window (`Engine::run`'s
    /// `unused_words` at the time of this call): the smallest variable in
    /// `candidate` is keyed by its *global* bit position, not a window-
    /// relative one, so that it lands in the same table `flush_vars` (keyed
    /// by global variable numbers) will later retire it from.
    pub fn intern(&mut self, candidate: BitSetId, arena: &mut BitSetArena, unused_words: u32) -> BitSetId {
        let first_bit = arena.get(candidate).next_set_bit(0, unused_words);
        if first_bit < 0 {
            arena.free(candidate);
            return self.empty_id;
        }
        let v = (first_bit as usize) / 2;
        let table = &mut self.tables[v];
        let hash = arena.get(candidate).hash_code;
        let slot = hash as usize % table.buckets.len();

        for &existing in &table.buckets[slot] {
            if arena.get(existing).hash_code == hash
                && arena.get(existing).stored_len() == arena.get(candidate).stored_len()
                && arena.get(existing).words() == arena.get(candidate).words()
            {
                arena.free(candidate);
                return existing;
            }
        }

        table.buckets[slot].push(candidate);
        table.num_keys += 1;
        arena.get_mut(candidate).saved_size = arena.get(candidate).cardinality();
        if table.num_keys as f64 >= LOAD_FACTOR * table.buckets.len() as f64 {
            table.expand(arena);
        }
        candidate
    }

    /// Releases every bitset interned under any of `vars` back to the arena's
    /// free list, and resets those variables' tables to fresh, empty ones.
    pub fn flush_vars(&mut self, vars: &[u32], arena: &mut BitSetArena) {
        for &v in vars {
            let table = &mut self.tables[v as usize];
            for chain in table.buckets.drain(..) {
                for id in chain {
                    arena.free(id);
                }
            }
            *table = VarTable::new();
        }
    }

    /// Applies the window-advance `reduce` to every bitset still interned
    /// anywhere in the table (used at a window-advance boundary).
    pub fn reduce_all(&mut self, words_to_lose: u32, arena: &mut BitSetArena) {
        for table in &mut self.tables {
            for chain in &table.buckets {
                for &id in chain {
                    arena.get_mut(id).reduce(words_to_lose);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_bits(arena: &mut BitSetArena, id: BitSetId, bits: &[usize]) {
        for &b in bits {
            arena.get_mut(id).set(b, 0);
        }
        arena.get_mut(id).recompute_hash();
    }

    #[test]
    fn interning_same_content_returns_same_id() {
        let mut arena = BitSetArena::new();
        let mut table = InternTable::new(8, &mut arena);

        let a = arena.alloc();
        set_bits(&mut arena, a, &[2, 5]);
        let a = table.intern(a, &mut arena, 0);

        let b = arena.alloc();
        set_bits(&mut arena, b, &[5, 2]);
        let b = table.intern(b, &mut arena, 0);

        assert_eq!(a, b);
    }

    #[test]
    fn interning_idempotent_on_already_canonical_id() {
        let mut arena = BitSetArena::new();
        let mut table = InternTable::new(8, &mut arena);

        let a = arena.alloc();
        set_bits(&mut arena, a, &[3]);
        let a = table.intern(a, &mut arena, 0);

        let a2 = arena.alloc();
        set_bits(&mut arena, a2, &[3]);
        let a2 = table.intern(a2, &mut arena, 0);
        assert_eq!(a, a2);
    }

    #[test]
    fn empty_bitset_canonicalizes_without_a_table_entry() {
        let mut arena = BitSetArena::new();
        let mut table = InternTable::new(8, &mut arena);

        let e1 = arena.alloc();
        set_bits(&mut arena, e1, &[]);
        let e1 = table.intern(e1, &mut arena, 0);
        assert_eq!(e1, table.empty_id());
    }

    #[test]
    fn flush_vars_frees_all_entries_for_that_variable() {
        let mut arena = BitSetArena::new();
        let mut table = InternTable::new(8, &mut arena);

        let a = arena.alloc();
        set_bits(&mut arena, a, &[2, 3]); // variable 1
        let _a = table.intern(a, &mut arena, 0);

        table.flush_vars(&[1], &mut arena);

        let b = arena.alloc();
        set_bits(&mut arena, b, &[2, 3]);
        let b = table.intern(b, &mut arena, 0);
        // after the flush, interning identical content allocates a fresh id
        assert_eq!(arena.get(b).cardinality(), 2);
    }

    #[test]
    fn intern_keys_by_global_variable_after_the_window_advances() {
        // Global variable 40 sits at bit position 80; once the window has
        // advanced by one word (`unused_words = 1`), its content lives in
        // stored word 0. Interning must still key the per-variable table by
        // the *global* variable (40), not by the window-relative one a
        // `next_set_bit(0, 0)` call would derive (80 / 64 = word 1, so a
        // window-relative read would see bit 16 of stored word 0 and compute
        // variable 8 instead).
        let mut arena = BitSetArena::new();
        let mut table = InternTable::new(50, &mut arena);
        let unused_words: u32 = 1;

        let a = arena.alloc();
        arena.get_mut(a).set(80, unused_words);
        arena.get_mut(a).recompute_hash();
        let a = table.intern(a, &mut arena, unused_words);

        // Flushing an unrelated (and, under the bug, wrongly-derived) table
        // must not evict this entry.
        table.flush_vars(&[8], &mut arena);

        let b = arena.alloc();
        arena.get_mut(b).set(80, unused_words);
        arena.get_mut(b).recompute_hash();
        let b = table.intern(b, &mut arena, unused_words);
        assert_eq!(a, b, "identical content must still canonicalize to one id");

        // Flushing the correct (global) variable does evict it.
        table.flush_vars(&[40], &mut arena);
        let c = arena.alloc();
        arena.get_mut(c).set(80, unused_words);
        arena.get_mut(c).recompute_hash();
        let c = table.intern(c, &mut arena, unused_words);
        assert_ne!(a, c, "flushing variable 40 must have freed the old entry");
    }

    #[test]
    fn expand_preserves_all_entries() {
        let mut arena = BitSetArena::new();
        let mut table = InternTable::new(4, &mut arena);
        let mut ids = Vec::new();
        for i in 0..4000u32 {
            let id = arena.alloc();
            set_bits(&mut arena, id, &[6, (8 + i) as usize]);
            ids.push(table.intern(id, &mut arena, 0));
        }
        // every inserted bitset is distinct content, so all survive distinctly
        let mut seen = std::collections::HashSet::new();
        for id in &ids {
            let w = arena.get(*id).words().to_vec();
            assert!(seen.insert(w));
        }
    }
}
