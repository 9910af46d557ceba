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

//! Derives, once clauses are frozen, the clause position at which each
//! variable first and last appears. The sweep engine (`crate::sweep`) uses
//! these to know which variables enter scope (`firstVars`) and can be
//! retired (`lastVars`) at each step.

use crate::clause::Clause;

/// `firstVars[c]` / `lastVars[c]`: the variables whose first (resp. last)
/// occurrence across the whole clause sequence is clause `c`.
pub struct VarMap {
    first_vars: Vec<Vec<u32>>,
    last_vars: Vec<Vec<u32>>,
}

impl VarMap {
    /// Builds the maps for `clauses`, ranging over variables `1..=num_vars`.
    pub fn build(clauses: &[Clause], num_vars: u32) -> VarMap {
        let mut first_pos = vec![None; num_vars as usize + 1];
        let mut last_pos = vec![None; num_vars as usize + 1];

        for (pos, clause) in clauses.iter().enumerate() {
            for &l in clause.literals() {
                let v = l.unsigned_abs() as usize;
                if first_pos[v].is_none() {
                    first_pos[v] = Some(pos);
                }
                last_pos[v] = Some(pos);
            }
        }

        let mut first_vars = vec![Vec::new(); clauses.len()];
        let mut last_vars = vec![Vec::new(); clauses.len()];
        for v in 1..=num_vars as usize {
            if let Some(p) = first_pos[v] {
                first_vars[p].push(v as u32);
            }
            if let Some(p) = last_pos[v] {
                last_vars[p].push(v as u32);
            }
        }

        VarMap {
            first_vars,
            last_vars,
        }
    }

    pub fn first_vars(&self, pos: usize) -> &[u32] {
        &self.first_vars[pos]
    }

    pub fn last_vars(&self, pos: usize) -> &[u32] {
        &self.last_vars[pos]
    }

    pub fn num_first_vars(&self, pos: usize) -> u32 {
        self.first_vars[pos].len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(lits: &[i64]) -> Clause {
        Clause::normalize(lits.to_vec()).unwrap()
    }

    #[test]
    fn variable_seen_in_one_clause_is_both_first_and_last_there() {
        let clauses = vec![clause(&[1, 2]), clause(&[2, 3])];
        let map = VarMap::build(&clauses, 3);
        assert_eq!(map.first_vars(0), &[1, 2]);
        assert_eq!(map.last_vars(0), &[1]);
        assert_eq!(map.first_vars(1), &[3]);
        assert_eq!(map.last_vars(1), &[2, 3]);
    }

    #[test]
    fn num_first_vars_matches_first_vars_length() {
        let clauses = vec![clause(&[1, 2, 3])];
        let map = VarMap::build(&clauses, 3);
        assert_eq!(map.num_first_vars(0), 3);
    }
}
