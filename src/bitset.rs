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

//! Fixed-semantics, bit-indexed sets over literal positions, with a shifting
//! storage window that lets the sweep engine (`crate::sweep`) drop the storage
//! for variables that can no longer appear in any live partial assignment.
//!
//! Bit indices passed to every method here are *global*: they are never
//! adjusted by the caller for the current window. Only the storage layout
//! (which word a global bit lands in) depends on `unused_words`, which every
//! window-sensitive operation takes as an explicit parameter rather than
//! reading from a global - the engine (`crate::sweep::Engine`) is the sole
//! owner of that counter.

use crate::bigint::Count;

/// Bits per storage word.
pub const WORD_BITS: u32 = 64;

/// The 21 large odd primes mixed into the content hash (§4.2): a fixed table
/// rather than a seeded PRNG, so hashes are reproducible across runs.
const PRIMES: [u64; 21] = [
    961748941, 941083987, 920419823, 899809363, 879190841, 858599509, 838041647, 817504253,
    797003437, 776531419, 756065179, 735632797, 694847539, 654188429, 633910111, 982451653,
    961748927, 941083981, 920419813, 899809343, 879190747,
];

/// A bit-indexed subset of `{0, .., 2*(V+1)-1}`, stored as a vector of 64-bit
/// words with the low-order `unused_words` words elided (see module docs).
/// The stored word vector never carries trailing zero words: `words.len()`
/// always equals the index of the last nonzero word plus one.
#[derive(Clone, Debug, Default)]
pub struct BitSet {
    words: Vec<u64>,
    /// The running signed coefficient of this partial assignment.
    pub contribution: Count,
    /// Snapshot of `contribution` taken at the start of the current sweep step.
    pub previous_contribution: Count,
    /// Popcount at the time this bitset was last interned.
    pub saved_size: u32,
    /// Content hash, valid only immediately after a call to `recompute_hash`.
    pub hash_code: u32,
    /// The clause index at which this bitset was last reached by the sweep.
    pub pos_added: i64,
}

impl BitSet {
    pub fn new() -> Self {
        BitSet {
            words: Vec::new(),
            contribution: Count::zero(),
            previous_contribution: Count::zero(),
            saved_size: 0,
            hash_code: 0,
            pos_added: -1,
        }
    }

    /// Number of (non-elided) stored words. Exposed for the intern table's
    /// equality fast-path.
    pub fn stored_len(&self) -> usize {
        self.words.len()
    }

    pub fn words(&self) -> &[u64] {
        &self.words
    }

    fn word_of(bit: usize, unused_words: u32) -> usize {
        bit / WORD_BITS as usize - unused_words as usize
    }

    fn ensure_word(&mut self, idx: usize) {
        if self.words.len() <= idx {
            self.words.resize(idx + 1, 0);
        }
    }

    fn trim(&mut self) {
        while matches!(self.words.last(), Some(0)) {
            self.words.pop();
        }
    }

    pub fn set(&mut self, bitpos: usize, unused_words: u32) {
        let w = Self::word_of(bitpos, unused_words);
        self.ensure_word(w);
        self.words[w] |= 1u64 << (bitpos as u32 % WORD_BITS);
    }

    pub fn is_set(&self, bitpos: usize, unused_words: u32) -> bool {
        if bitpos >= (unused_words as usize + self.words.len()) * WORD_BITS as usize {
            return false;
        }
        let w = Self::word_of(bitpos, unused_words);
        (self.words[w] >> (bitpos as u32 % WORD_BITS)) & 1 != 0
    }

    pub fn clear(&mut self, bitpos: usize, unused_words: u32) {
        if bitpos >= (unused_words as usize + self.words.len()) * WORD_BITS as usize {
            return;
        }
        let w = Self::word_of(bitpos, unused_words);
        self.words[w] &= !(1u64 << (bitpos as u32 % WORD_BITS));
        self.trim();
    }

    pub fn clear_all(&mut self) {
        self.words.clear();
    }

    pub fn cardinality(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    pub fn copy_from(&mut self, other: &BitSet) {
        self.words.clear();
        self.words.extend_from_slice(&other.words);
    }

    /// `self = a | b`.
    pub fn copy_or(&mut self, a: &BitSet, b: &BitSet) {
        let n = a.words.len().max(b.words.len());
        self.words.clear();
        self.words.reserve(n);
        for i in 0..n {
            let aw = a.words.get(i).copied().unwrap_or(0);
            let bw = b.words.get(i).copied().unwrap_or(0);
            self.words.push(aw | bw);
        }
        self.trim();
    }

    /// `self = self \ src` (bitwise AND with the complement of `src`).
    pub fn and_not(&mut self, src: &BitSet) {
        let n = self.words.len().min(src.words.len());
        for i in 0..n {
            self.words[i] &= !src.words[i];
        }
        self.trim();
    }

    pub fn equal(&self, other: &BitSet) -> bool {
        self.words == other.words
    }

    pub fn intersects(&self, other: &BitSet) -> bool {
        let n = self.words.len().min(other.words.len());
        self.words[..n]
            .iter()
            .zip(&other.words[..n])
            .any(|(a, b)| a & b != 0)
    }

    /// Returns the smallest set bit `>= index`, or `-1` if none.
    pub fn next_set_bit(&self, index: usize, unused_words: u32) -> i64 {
        let window_floor = unused_words as usize * WORD_BITS as usize;
        let index = index.max(window_floor);
        let mut lpos = index / WORD_BITS as usize - unused_words as usize;
        if lpos >= self.words.len() {
            return -1;
        }
        let bpos = (index as u32) % WORD_BITS;
        let shifted = self.words[lpos] >> bpos;
        if shifted != 0 {
            let found = bpos + shifted.trailing_zeros();
            return (found as usize + (lpos + unused_words as usize) * WORD_BITS as usize) as i64;
        }
        lpos += 1;
        while lpos < self.words.len() && self.words[lpos] == 0 {
            lpos += 1;
        }
        if lpos >= self.words.len() {
            return -1;
        }
        let found = self.words[lpos].trailing_zeros();
        (found as usize + (lpos + unused_words as usize) * WORD_BITS as usize) as i64
    }

    /// Returns the largest set bit, or `-1` if the bitset is empty.
    pub fn last_set_bit(&self, unused_words: u32) -> i64 {
        match self.words.last() {
            None => -1,
            Some(&top) => {
                let lpos = self.words.len() - 1;
                (WORD_BITS as usize * (lpos + unused_words as usize + 1)) as i64
                    - top.leading_zeros() as i64
                    - 1
            }
        }
    }

    /// Drops the first `k` (guaranteed-zero) words after the window advances.
    pub fn reduce(&mut self, k: u32) {
        let k = k as usize;
        if k >= self.words.len() {
            self.words.clear();
        } else {
            self.words.drain(0..k);
        }
    }

    /// Fills `self` with the literal-negation of `bs`: every set bit at an
    /// even position contributes bit `+1`, every set bit at an odd position
    /// contributes bit `-1`.
    pub fn make_neg(&mut self, bs: &BitSet, unused_words: u32) {
        self.clear_all();
        let mut bp = bs.next_set_bit(0, unused_words);
        while bp >= 0 {
            let bp_u = bp as usize;
            if bp_u % 2 == 0 {
                self.set(bp_u + 1, unused_words);
            } else {
                self.set(bp_u - 1, unused_words);
            }
            bp = bs.next_set_bit(bp_u + 1, unused_words);
        }
    }

    /// Recomputes and stores the content hash (§4.2). Must be called after any
    /// mutation and before the bitset is looked up in or inserted into an
    /// [`crate::intern::InternTable`].
    pub fn recompute_hash(&mut self) {
        self.hash_code = self.hash_code_of();
    }

    fn hash_code_of(&self) -> u32 {
        let start = self.words.iter().position(|&w| w != 0);
        let Some(start) = start else { return 0 };
        let end = self.words.len() - 1;
        if start > end {
            return 0;
        }
        let shuffle = |w: u64| w ^ (w >> 16) ^ (w >> 32) ^ (w >> 48);
        let mut h: u64 = shuffle(self.words[start]).wrapping_mul(PRIMES[0]);
        let last = end.min(start + PRIMES.len() - 1);
        for p in (start + 1)..=last {
            h ^= shuffle(self.words[p]).wrapping_mul(PRIMES[p - start]);
        }
        ((h ^ (h >> 32)) & 0xFFFF_FFFF) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_is_set_roundtrip() {
        let mut bs = BitSet::new();
        bs.set(3, 0);
        bs.set(130, 0);
        assert!(bs.is_set(3, 0));
        assert!(bs.is_set(130, 0));
        assert!(!bs.is_set(4, 0));
    }

    #[test]
    fn clear_trims_trailing_zero_words() {
        let mut bs = BitSet::new();
        bs.set(65, 0);
        assert_eq!(bs.stored_len(), 2);
        bs.clear(65, 0);
        assert_eq!(bs.stored_len(), 0);
    }

    #[test]
    fn cardinality_counts_all_set_bits() {
        let mut bs = BitSet::new();
        for b in [2usize, 5, 70, 200] {
            bs.set(b, 0);
        }
        assert_eq!(bs.cardinality(), 4);
    }

    #[test]
    fn next_set_bit_after_last_is_negative_one() {
        let mut bs = BitSet::new();
        bs.set(4, 0);
        bs.set(9, 0);
        let last = bs.last_set_bit(0);
        assert_eq!(last, 9);
        assert_eq!(bs.next_set_bit(last as usize + 1, 0), -1);
    }

    #[test]
    fn next_set_bit_scans_across_word_boundary() {
        let mut bs = BitSet::new();
        bs.set(5, 0);
        bs.set(130, 0);
        assert_eq!(bs.next_set_bit(6, 0), 130);
    }

    #[test]
    fn make_neg_is_disjoint_and_same_size() {
        let mut bs = BitSet::new();
        bs.set(3, 0); // positive literal bit
        bs.set(4, 0); // negative literal bit
        let mut neg = BitSet::new();
        neg.make_neg(&bs, 0);
        assert!(!neg.intersects(&bs));
        assert_eq!(neg.cardinality(), bs.cardinality());
        assert!(neg.is_set(2, 0));
        assert!(neg.is_set(5, 0));
    }

    #[test]
    fn reduce_shrinks_length_by_k_and_preserves_semantics() {
        // word 0 (global bits [64,128)) is all-zero and about to be elided;
        // bit 192 lives in word 2 and survives the window advance.
        let mut bs = BitSet::new();
        bs.set(192, 1);
        let len_before = bs.stored_len();
        bs.reduce(1);
        assert_eq!(bs.stored_len(), len_before - 1);
        assert!(bs.is_set(192, 2));
    }

    #[test]
    fn copy_or_unions_bits_of_different_lengths() {
        let mut a = BitSet::new();
        a.set(1, 0);
        let mut b = BitSet::new();
        b.set(200, 0);
        let mut dest = BitSet::new();
        dest.copy_or(&a, &b);
        assert!(dest.is_set(1, 0));
        assert!(dest.is_set(200, 0));
    }

    #[test]
    fn and_not_removes_only_the_given_bits() {
        let mut a = BitSet::new();
        a.set(1, 0);
        a.set(2, 0);
        let mut b = BitSet::new();
        b.set(1, 0);
        a.and_not(&b);
        assert!(!a.is_set(1, 0));
        assert!(a.is_set(2, 0));
    }

    #[test]
    fn equal_content_hashes_equal() {
        let mut a = BitSet::new();
        a.set(3, 0);
        a.set(200, 0);
        let mut b = BitSet::new();
        b.set(200, 0);
        b.set(3, 0);
        a.recompute_hash();
        b.recompute_hash();
        assert!(a.equal(&b));
        assert_eq!(a.hash_code, b.hash_code);
    }
}
