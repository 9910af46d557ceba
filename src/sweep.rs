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

//! The main loop: an inclusion-exclusion walk over the clause sequence that
//! maintains a double-buffered collection of partial assignments (bitsets
//! carrying a signed [`Count`]) and combines them one clause at a time.
//!
//! [`Engine`] is the single owner of every piece of state the reference
//! counter kept at process scope (`unusedWords`, the free list, the scratch
//! bitsets): see `DESIGN.md` for the "global mutable state" note this
//! replaces.

use crate::bigint::Count;
use crate::bitset::BitSet;
use crate::clause::ClauseStore;
use crate::common::{lit2bitpos, var2bitpos};
use crate::intern::{BitSetArena, BitSetId, InternTable};
use crate::limits::{Cutoff, StopReason};
use crate::regions;
use crate::trie::LiteralTrie;
use crate::varmap::VarMap;

/// Half a 64-bit word's worth of variables: every 32 variables fully
/// retired free one more storage word from every live bitset.
const VARIABLES_PER_FREED_WORD: u32 = 32;

/// How often the combine phase polls `cutoff` between step boundaries.
const POLL_EVERY_N_OPERATIONS: u64 = 100_000;

/// Why [`Engine::run`] stopped.
pub enum Halt {
    /// Every clause was processed; `clauseSet` holds exactly the empty bitset.
    Completed,
    /// `cutoff` asked for an early stop.
    Stopped(StopReason),
}

/// The result of one sweep: the empty bitset's final contribution (the
/// caller still owes it a multiplication by `2^unusedVariables`, §4.7) plus
/// bookkeeping for the `c o OPERATIONS=` report line.
pub struct SweepOutcome {
    pub contribution: Count,
    pub halt: Halt,
    pub operations: u64,
}

/// Owns every piece of state the sweep touches: the bitset arena, the intern
/// tables, the per-clause literal bitsets, and the shifting storage window.
pub struct Engine {
    arena: BitSetArena,
    intern: InternTable,
    clause_bitsets: Vec<BitSet>,
    /// Per-clause generation tag, mirroring `posAdded` on a bitset but keyed
    /// by clause position - used by the trie-build phase to avoid inserting
    /// the same forward clause twice in one step.
    clause_scanned_at: Vec<i64>,
    var_to_clauses: Vec<Vec<u32>>,
    empty_id: BitSetId,
    unused_words: u32,
    variables_retired: u32,
    operations: u64,
}

impl Engine {
    /// Builds the engine's initial state for `clauses`: every clause gets its
    /// own literal bitset, and `clauseSet` starts as the single empty bitset
    /// with `contribution = 1`.
    pub fn new(clauses: &ClauseStore) -> Self {
        let num_vars = clauses.num_vars();
        let mut arena = BitSetArena::new();
        let intern = InternTable::new(num_vars, &mut arena);
        let empty_id = intern.empty_id();
        {
            let bs = arena.get_mut(empty_id);
            bs.contribution = Count::one();
            bs.pos_added = -1;
        }

        let clause_bitsets = clauses
            .clauses()
            .iter()
            .map(|c| {
                let mut bs = BitSet::new();
                for &l in c.literals() {
                    bs.set(lit2bitpos(l), 0);
                }
                bs.recompute_hash();
                bs
            })
            .collect();

        let var_to_clauses = regions::var_to_clauses(clauses.clauses(), num_vars);

        Engine {
            arena,
            intern,
            clause_bitsets,
            clause_scanned_at: vec![-1; clauses.len()],
            var_to_clauses,
            empty_id,
            unused_words: 0,
            variables_retired: 0,
            operations: 0,
        }
    }

    pub fn operations(&self) -> u64 {
        self.operations
    }

    /// Builds the trie of "dominating" forward clauses for the clause at
    /// `pos`: every not-yet-processed clause sharing a variable with it whose
    /// literal bitset is compatible with `this_clause`'s negation, inserted
    /// at most once per step (§4.7 phase 3).
    fn build_tree(&mut self, clauses: &ClauseStore, pos: usize, neg_bitset: &BitSet) -> LiteralTrie {
        let mut trie = LiteralTrie::new();
        let this_clause = &clauses.clauses()[pos];
        for &l in this_clause.literals() {
            let v = l.unsigned_abs() as usize;
            for &other_pos in &self.var_to_clauses[v] {
                let other_pos = other_pos as usize;
                if other_pos <= pos || self.clause_scanned_at[other_pos] >= pos as i64 {
                    continue;
                }
                if neg_bitset.intersects(&self.clause_bitsets[other_pos]) {
                    continue;
                }
                trie.insert(clauses.clauses()[other_pos].literals());
                self.clause_scanned_at[other_pos] = pos as i64;
            }
        }
        trie
    }

    /// Runs the sweep to completion, or until `cutoff` signals a halt.
    pub fn run(&mut self, clauses: &ClauseStore, var_map: &VarMap, cutoff: &dyn Cutoff) -> SweepOutcome {
        let mut clause_set: Vec<BitSetId> = vec![self.empty_id];

        for pos in 0..clauses.len() {
            if let Some(reason) = cutoff.should_stop() {
                return self.stopped(reason);
            }

            let this_bitset = self.clause_bitsets[pos].clone();
            let mut neg_bitset = BitSet::new();
            neg_bitset.make_neg(&this_bitset, self.unused_words);

            let num_first_vars = var_map.num_first_vars(pos);
            let last_vars = var_map.last_vars(pos).to_vec();

            // Phase 1: shift. Every live bitset doubles its contribution for
            // each variable newly entering scope at this clause.
            for &id in &clause_set {
                let bs = self.arena.get_mut(id);
                bs.previous_contribution = bs.contribution.clone();
                bs.contribution = bs.contribution.shl(num_first_vars);
            }

            // Phase 2: retire the variables leaving scope after this clause.
            let mut to_remove = BitSet::new();
            if !last_vars.is_empty() {
                for &v in &last_vars {
                    to_remove.set(var2bitpos(v), self.unused_words);
                    to_remove.set(var2bitpos(v) + 1, self.unused_words);
                }
            }

            let mut next_set: Vec<BitSetId> = if last_vars.is_empty() {
                // Nothing retires at this clause, so bs' == bs for every live
                // bitset and no interning is needed. A bitset with zero
                // previousContribution carries nothing forward and is left
                // out here too, for the same reason phase 4 skips it below:
                // if a later combine hit lands on it, it is a fresh touch
                // this step (pos_added < pos) and gets pushed there instead,
                // never both.
                let mut next = Vec::with_capacity(clause_set.len());
                for &id in &clause_set {
                    if self.arena.get(id).previous_contribution.is_zero() {
                        continue;
                    }
                    self.arena.get_mut(id).pos_added = pos as i64;
                    next.push(id);
                }
                next
            } else {
                let mut next = Vec::with_capacity(clause_set.len());
                for &id in &clause_set {
                    if self.arena.get(id).previous_contribution.is_zero() {
                        continue;
                    }
                    if !self.arena.get(id).intersects(&to_remove) {
                        // bs' == bs: no need to intern, but the same
                        // enqueue-once-per-step discipline applies, so a
                        // later combine-phase touch on this same id
                        // accumulates instead of re-enqueuing it.
                        if self.arena.get(id).pos_added < pos as i64 {
                            next.push(id);
                        }
                        self.arena.get_mut(id).pos_added = pos as i64;
                        continue;
                    }
                    let candidate = self.arena.alloc();
                    let mut reduced = self.arena.get(id).clone();
                    reduced.and_not(&to_remove);
                    reduced.recompute_hash();
                    let contribution = self.arena.get(id).contribution.clone();
                    *self.arena.get_mut(candidate) = reduced;
                    let next_id = self.intern.intern(candidate, &mut self.arena, self.unused_words);
                    self.arena.get_mut(next_id).contribution += &contribution;
                    if self.arena.get(next_id).pos_added < pos as i64 {
                        next.push(next_id);
                    }
                    self.arena.get_mut(next_id).pos_added = pos as i64;
                }
                next
            };

            // Phase 3: build the dominance trie from not-yet-visited forward
            // clauses compatible with this clause's negation.
            let this_tree = self.build_tree(clauses, pos, &neg_bitset);

            // Phase 4: combine, unless a forward clause already dominates
            // this one entirely.
            if !this_tree.contains_subset_of(&this_bitset, self.unused_words) {
                for &other_id in &clause_set {
                    self.operations += 1;
                    if self.operations % POLL_EVERY_N_OPERATIONS == 0 {
                        if let Some(reason) = cutoff.should_stop() {
                            return self.stopped(reason);
                        }
                    }

                    if self.arena.get(other_id).previous_contribution.is_zero() {
                        continue;
                    }
                    if self.arena.get(other_id).intersects(&neg_bitset) {
                        continue;
                    }

                    let mut full = BitSet::new();
                    full.copy_or(&this_bitset, self.arena.get(other_id));
                    if !last_vars.is_empty() {
                        full.and_not(&to_remove);
                    }
                    if this_tree.contains_subset_of(&full, self.unused_words) {
                        continue; // a later clause already forces this combination
                    }

                    let other_saved_size = self.arena.get(other_id).saved_size;
                    let other_previous = self.arena.get(other_id).previous_contribution.clone();
                    let extra_signed = full.cardinality() as i64 - other_saved_size as i64;
                    debug_assert!(extra_signed >= 0, "combine produced a negative extra-literal count");
                    let extra = extra_signed.max(0) as u32;

                    full.recompute_hash();
                    let candidate = self.arena.alloc();
                    *self.arena.get_mut(candidate) = full;
                    let next_id = self.intern.intern(candidate, &mut self.arena, self.unused_words);
                    let delta = other_previous.shr(extra).negated();

                    if self.arena.get(next_id).pos_added == pos as i64 {
                        self.arena.get_mut(next_id).contribution += &delta;
                    } else {
                        self.arena.get_mut(next_id).contribution = delta;
                        next_set.push(next_id);
                        self.arena.get_mut(next_id).pos_added = pos as i64;
                    }
                }
            }

            // Phase 5: window advance, once enough variables have retired to
            // free a whole word.
            self.variables_retired += last_vars.len() as u32;
            let target_unused = self.variables_retired / VARIABLES_PER_FREED_WORD;
            if target_unused > self.unused_words {
                let delta = target_unused - self.unused_words;
                self.unused_words = target_unused;
                self.intern.reduce_all(delta, &mut self.arena);
                for bs in self.clause_bitsets[pos + 1..].iter_mut() {
                    bs.reduce(delta);
                }
            }

            // Phase 6: drop every bitset interned under a retiring variable.
            if !last_vars.is_empty() {
                self.intern.flush_vars(&last_vars, &mut self.arena);
            }

            // Phase 7: the trie is dropped here, at scope end.
            // Phase 8: swap buffers.
            clause_set = next_set;
        }

        SweepOutcome {
            contribution: self.arena.get(self.empty_id).contribution.clone(),
            halt: Halt::Completed,
            operations: self.operations,
        }
    }

    fn stopped(&self, reason: StopReason) -> SweepOutcome {
        SweepOutcome {
            contribution: self.arena.get(self.empty_id).contribution.clone(),
            halt: Halt::Stopped(reason),
            operations: self.operations,
        }
    }
}
