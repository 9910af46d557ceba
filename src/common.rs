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

//! This module defines the most basic data types that are used throughout all
//! the code of this crate: literals, variables and the mapping between the two
//! that the bitset algebra relies on.

/// A variable of the formula being counted. Variables are numbered `1..=nb_vars`
/// both in the original DIMACS input and (after renumbering by the preprocessor)
/// in the internal representation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Variable(pub u32);
impl Variable {
    #[inline]
    pub fn id(self) -> u32 {
        self.0
    }
}

/// A literal: a nonzero signed integer. `l > 0` denotes the positive occurrence of
/// variable `l`, `l < 0` denotes its negation.
pub type Literal = i64;

/// Returns the variable underlying a literal, irrespective of its polarity.
#[inline]
pub fn var_of(lit: Literal) -> u32 {
    lit.unsigned_abs() as u32
}

/// Maps a literal onto its bit position in a [`crate::bitset::BitSet`], per the
/// `LIT2BITPOS` mapping: even positions hold negative literals, odd positions hold
/// positive literals. Positions `0` and `1` are unused sentinels (there is no
/// variable `0`).
///
/// ```
/// use sumc::common::lit2bitpos;
/// assert_eq!(lit2bitpos(1), 3);
/// assert_eq!(lit2bitpos(-1), 2);
/// assert_eq!(lit2bitpos(2), 5);
/// assert_eq!(lit2bitpos(-2), 4);
/// ```
#[inline]
pub fn lit2bitpos(lit: Literal) -> usize {
    if lit > 0 {
        (2 * lit + 1) as usize
    } else {
        (-2 * lit) as usize
    }
}

/// Inverse of [`lit2bitpos`]: recovers the literal that was mapped to a bit position.
#[inline]
pub fn bitpos2lit(bp: usize) -> Literal {
    if bp % 2 == 0 {
        -((bp / 2) as Literal)
    } else {
        (bp / 2) as Literal
    }
}

/// Maps a variable onto the even ("negative") bit position used by [`lit2bitpos`]
/// for that variable's negative literal. The positive literal sits at `2*v + 1`.
#[inline]
pub fn var2bitpos(v: u32) -> usize {
    2 * v as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lit2bitpos_roundtrips() {
        for v in 1..100i64 {
            assert_eq!(bitpos2lit(lit2bitpos(v)), v);
            assert_eq!(bitpos2lit(lit2bitpos(-v)), -v);
        }
    }

    #[test]
    fn negative_literals_are_even() {
        for v in 1..100i64 {
            assert_eq!(lit2bitpos(-v) % 2, 0);
            assert_eq!(lit2bitpos(v) % 2, 1);
        }
    }
}
