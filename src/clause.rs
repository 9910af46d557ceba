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

//! The ordered collection of clauses the sweep engine walks. Owns
//! normalization (tautology elimination, literal sorting), deduplication and
//! unit propagation; the preprocessor (`crate::regions`, `crate::reorder`)
//! renumbers variables in place afterwards.

use crate::common::Literal;

/// A single CNF clause: distinct literals in ascending `(|lit|, lit)` order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    /// Builds a clause from raw literals, dropping the clause entirely if it
    /// is a tautology (`l` and `-l` both present).
    ///
    /// Returns `None` for a tautological clause - the caller should simply
    /// not add it to the store.
    pub fn normalize(mut literals: Vec<Literal>) -> Option<Clause> {
        literals.sort_by_key(|l| (l.unsigned_abs(), *l));
        literals.dedup();
        for w in literals.windows(2) {
            if w[0] == -w[1] {
                return None;
            }
        }
        Some(Clause { literals })
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    fn remove_literal(&mut self, lit: Literal) {
        self.literals.retain(|&l| l != lit);
    }

    fn contains(&self, lit: Literal) -> bool {
        self.literals.binary_search_by_key(&(lit.unsigned_abs(), lit), |l| (l.unsigned_abs(), *l)).is_ok()
    }

    /// Remaps every literal's variable through `map` (`new_var = map[old_var]`),
    /// preserving polarity, then re-sorts the literal order.
    pub fn remap(&mut self, map: &[u32]) {
        for l in &mut self.literals {
            let v = map[l.unsigned_abs() as usize];
            *l = if *l > 0 { v as Literal } else { -(v as Literal) };
        }
        self.literals.sort_by_key(|l| (l.unsigned_abs(), *l));
    }
}

/// The outcome of [`ClauseStore::unit_propagate`].
pub struct PropagationResult {
    /// Number of variables that no longer appear in any surviving clause.
    /// Each contributes an unconditional factor of 2 to the final count.
    pub unused_variables: u32,
}

/// UNSAT was derived during preprocessing (an empty clause was produced).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Unsat;

/// The clause store: an ordered sequence of normalized clauses plus the
/// variable count they range over.
pub struct ClauseStore {
    clauses: Vec<Clause>,
    num_vars: u32,
}

impl ClauseStore {
    pub fn new(num_vars: u32) -> Self {
        ClauseStore {
            clauses: Vec::new(),
            num_vars,
        }
    }

    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Adds raw literals as a clause, normalizing first; tautologies are
    /// silently dropped.
    pub fn add(&mut self, literals: Vec<Literal>) {
        if let Some(c) = Clause::normalize(literals) {
            self.clauses.push(c);
        }
    }

    /// Sorts clauses lexicographically by literal sequence and removes
    /// adjacent duplicates.
    pub fn dedup(&mut self) {
        self.clauses.sort_by(|a, b| a.literals.cmp(&b.literals));
        self.clauses.dedup();
    }

    /// Repeatedly resolves unit clauses until none remain or UNSAT is
    /// detected. Surviving clauses are left in `self`; returns the count of
    /// variables absent from every surviving clause.
    pub fn unit_propagate(&mut self) -> Result<PropagationResult, Unsat> {
        let mut forced: Vec<Literal> = Vec::new();
        loop {
            let unit = self
                .clauses
                .iter()
                .find(|c| c.is_unit())
                .map(|c| c.literals[0]);
            let Some(l) = unit else { break };
            forced.push(l);

            let mut next = Vec::with_capacity(self.clauses.len());
            for mut c in std::mem::take(&mut self.clauses) {
                if c.contains(l) {
                    continue; // clause satisfied, drop it
                }
                if c.contains(-l) {
                    c.remove_literal(-l);
                    if c.is_empty() {
                        return Err(Unsat);
                    }
                }
                next.push(c);
            }
            self.clauses = next;
        }

        let mut present = vec![false; self.num_vars as usize + 1];
        for c in &self.clauses {
            for &l in &c.literals {
                present[l.unsigned_abs() as usize] = true;
            }
        }
        let unused = (1..=self.num_vars)
            .filter(|&v| !present[v as usize])
            .count() as u32;

        // Variables forced by a unit clause are fixed, not free: they must
        // not contribute the `2^unusedVariables` factor the driver folds in
        // for variables that are genuinely absent from every clause.
        let mut forced_vars: Vec<Literal> = forced.iter().map(|&l| l.unsigned_abs()).collect();
        forced_vars.sort_unstable();
        forced_vars.dedup();

        Ok(PropagationResult {
            unused_variables: unused - forced_vars.len() as u32,
        })
    }

    /// Renumbers variables contiguously `1..=V'` in first-appearance order
    /// across the current clause sequence, dropping variables that no longer
    /// occur anywhere. Returns the new variable count.
    pub fn renumber_contiguous(&mut self) -> u32 {
        let mut map = vec![0u32; self.num_vars as usize + 1];
        let mut next = 1u32;
        for c in &self.clauses {
            for &l in &c.literals {
                let v = l.unsigned_abs() as usize;
                if map[v] == 0 {
                    map[v] = next;
                    next += 1;
                }
            }
        }
        for c in &mut self.clauses {
            c.remap(&map);
        }
        self.num_vars = next - 1;
        self.num_vars
    }

    /// Applies an externally computed variable permutation (`new_var =
    /// map[old_var]`, 1-indexed, `map.len() == num_vars + 1`) to every
    /// clause, then re-sorts the clause sequence.
    pub fn apply_permutation(&mut self, map: &[u32]) {
        for c in &mut self.clauses {
            c.remap(map);
        }
        self.clauses.sort_by(|a, b| a.literals.cmp(&b.literals));
    }
}
