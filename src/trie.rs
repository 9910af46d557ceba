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

//! A trie over sorted literal sequences, answering "does any inserted clause
//! hold as a subset of this bitset's set bits" in time proportional to the
//! bitset's popcount rather than the number of inserted clauses. Rebuilt
//! fresh by the sweep engine (`crate::sweep`) at every step from the clauses
//! eligible at that step.

use crate::bitset::BitSet;
use crate::common::Literal;

enum Next {
    Empty,
    Branch {
        bit_pos: usize,
        present: Box<TrieNode>,
        absent: Box<TrieNode>,
    },
}

/// One position in the trie. `ends_here` folds the "Sentinel" case described
/// for this structure into a flag on the node that also carries further
/// branches, since two distinct inserted clauses may share a prefix where one
/// finishes and the other needs to test another literal.
struct TrieNode {
    ends_here: bool,
    next: Next,
}

impl TrieNode {
    fn empty() -> Self {
        TrieNode {
            ends_here: false,
            next: Next::Empty,
        }
    }
}

/// A literal trie, freshly built for one sweep step and discarded at its end.
pub struct LiteralTrie {
    root: TrieNode,
}

impl LiteralTrie {
    pub fn new() -> Self {
        LiteralTrie {
            root: TrieNode::empty(),
        }
    }

    /// Inserts a clause, given as literals already in the clause store's
    /// canonical ascending `(|lit|, lit)` order (equivalently, strictly
    /// ascending bit position order).
    pub fn insert(&mut self, literals: &[Literal]) {
        Self::insert_at(&mut self.root, literals);
    }

    fn insert_at(node: &mut TrieNode, literals: &[Literal]) {
        if literals.is_empty() {
            node.ends_here = true;
            return;
        }
        let bit_pos = crate::common::lit2bitpos(literals[0]);
        match &mut node.next {
            Next::Empty => {
                let mut present = TrieNode::empty();
                Self::insert_at(&mut present, &literals[1..]);
                node.next = Next::Branch {
                    bit_pos,
                    present: Box::new(present),
                    absent: Box::new(TrieNode::empty()),
                };
            }
            Next::Branch {
                bit_pos: existing,
                present,
                absent,
            } => {
                use std::cmp::Ordering::*;
                match bit_pos.cmp(existing) {
                    Equal => Self::insert_at(present, &literals[1..]),
                    Less => {
                        let mut new_present = TrieNode::empty();
                        Self::insert_at(&mut new_present, &literals[1..]);
                        let displaced = std::mem::replace(&mut node.next, Next::Empty);
                        let displaced_node = TrieNode {
                            ends_here: false,
                            next: displaced,
                        };
                        node.next = Next::Branch {
                            bit_pos,
                            present: Box::new(new_present),
                            absent: Box::new(displaced_node),
                        };
                    }
                    Greater => Self::insert_at(absent, literals),
                }
            }
        }
    }

    /// Does any inserted clause's literal set hold as a subset of `bs`'s set
    /// bits?
    pub fn contains_subset_of(&self, bs: &BitSet, unused_words: u32) -> bool {
        Self::query(&self.root, bs, unused_words)
    }

    fn query(node: &TrieNode, bs: &BitSet, unused_words: u32) -> bool {
        if node.ends_here {
            return true;
        }
        match &node.next {
            Next::Empty => false,
            Next::Branch {
                bit_pos,
                present,
                absent,
            } => {
                if *bit_pos as i64 > bs.last_set_bit(unused_words) {
                    return false;
                }
                if bs.is_set(*bit_pos, unused_words) && Self::query(present, bs, unused_words) {
                    return true;
                }
                Self::query(absent, bs, unused_words)
            }
        }
    }
}

impl Default for LiteralTrie {
    fn default() -> Self {
        Self::new()
    }
}
