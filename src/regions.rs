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

//! Connected-component partitioning of variables by clause adjacency. Two
//! variables are in the same region iff some chain of shared clauses links
//! them; regions are independent sub-problems that the reorderer
//! (`crate::reorder`) can optimize one at a time.

use crate::clause::Clause;

/// Builds, for each variable `1..=num_vars`, the list of clause indices it
/// appears in.
pub fn var_to_clauses(clauses: &[Clause], num_vars: u32) -> Vec<Vec<u32>> {
    let mut index = vec![Vec::new(); num_vars as usize + 1];
    for (c, clause) in clauses.iter().enumerate() {
        for &l in clause.literals() {
            index[l.unsigned_abs() as usize].push(c as u32);
        }
    }
    index
}

/// Partitions `1..=num_vars` into connected components under clause
/// adjacency. Regions are returned in the order their first (smallest)
/// variable was discovered, starting from variable 1 and then the smallest
/// unvisited variable thereafter, matching a breadth-first sweep seeded at
/// each new component's lowest-numbered member.
pub fn decompose(clauses: &[Clause], num_vars: u32) -> Vec<Vec<u32>> {
    let var_clauses = var_to_clauses(clauses, num_vars);
    let mut visited = vec![false; num_vars as usize + 1];
    let mut regions = Vec::new();

    for seed in 1..=num_vars {
        if visited[seed as usize] {
            continue;
        }
        let mut region = Vec::new();
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(seed);
        visited[seed as usize] = true;
        while let Some(v) = queue.pop_front() {
            region.push(v);
            for &c in &var_clauses[v as usize] {
                for &l in clauses[c as usize].literals() {
                    let w = l.unsigned_abs() as u32;
                    if !visited[w as usize] {
                        visited[w as usize] = true;
                        queue.push_back(w);
                    }
                }
            }
        }
        region.sort_unstable();
        regions.push(region);
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(lits: &[i64]) -> Clause {
        Clause::normalize(lits.to_vec()).unwrap()
    }

    #[test]
    fn disjoint_clause_sets_form_separate_regions() {
        let clauses = vec![clause(&[1, 2]), clause(&[3, 4])];
        let regions = decompose(&clauses, 4);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0], vec![1, 2]);
        assert_eq!(regions[1], vec![3, 4]);
    }

    #[test]
    fn shared_clause_merges_variables_into_one_region() {
        let clauses = vec![clause(&[1, 2]), clause(&[2, 3])];
        let regions = decompose(&clauses, 3);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0], vec![1, 2, 3]);
    }

    #[test]
    fn isolated_variable_with_no_clauses_is_its_own_region() {
        let clauses = vec![clause(&[1, 2])];
        let regions = decompose(&clauses, 3);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1], vec![3]);
    }
}
