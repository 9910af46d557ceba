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

//! Per-region variable reordering that minimizes the span a variable's
//! lifetime occupies across clauses - the objective the sweep engine
//! (`crate::sweep`) relies on to keep its live bitset window small.
//!
//! The algorithm is an iterative coordinate-sort: variables are given scalar
//! weights, every clause nudges its lowest- and highest-numbered (in the
//! *current* order) variable apart, variables are re-sorted by weight, and
//! the nudge shrinks geometrically until no variable changes rank.

use fxhash::FxHashSet;

use crate::clause::Clause;

/// Picks the iteration-to-iteration shrink ratio from problem size, per the
/// `K ∈ {1e8, 1e6, 1e5, 1e4}` schedule: larger instances get a ratio closer
/// to 1 (slower decay, more iterations of useful signal).
fn shrink_ratio(num_vars: u32, num_clauses: u32) -> f64 {
    let k = if num_clauses > 100_000 {
        1e4
    } else if num_clauses > 10_000 {
        1e5
    } else if num_clauses > 1_000 {
        1e6
    } else {
        1e8
    };
    1.0 - ((10.0 + num_vars as f64).ln() + (10.0 + num_clauses as f64).ln()) / k
}

/// Reorders the variables of a single region (a sorted list of global
/// variable ids) to (heuristically) minimize `sum over clauses touching this
/// region of (max rank - min rank)`. Returns the region's variables permuted
/// into their new relative order; ranks outside this region are untouched by
/// the caller.
pub fn reorder_region(region: &[u32], clauses: &[Clause], max_turns: u32) -> Vec<u32> {
    if region.len() <= 2 {
        return region.to_vec();
    }

    let in_region: FxHashSet<u32> = region.iter().copied().collect();
    let region_clauses: Vec<&Clause> = clauses
        .iter()
        .filter(|c| c.literals().iter().any(|l| in_region.contains(&(l.unsigned_abs() as u32))))
        .collect();

    let mut order: Vec<u32> = region.to_vec();
    let mut rank = vec![0u32; order.len()];
    let update_rank = |order: &[u32], rank: &mut [u32]| {
        for (i, &v) in order.iter().enumerate() {
            rank[position_of(region, v) as usize] = i as u32;
        }
    };
    update_rank(&order, &mut rank);

    let mut increment = 1.0f64;
    let ratio = shrink_ratio(region.len() as u32, region_clauses.len() as u32);

    for _ in 0..max_turns {
        let mut weight = vec![0f64; order.len()];
        for c in &region_clauses {
            let ranks: Vec<u32> = c
                .literals()
                .iter()
                .map(|l| l.unsigned_abs() as u32)
                .filter(|v| in_region.contains(v))
                .map(|v| rank[position_of(region, v) as usize])
                .collect();
            let (Some(&min_r), Some(&max_r)) = (ranks.iter().min(), ranks.iter().max()) else {
                continue;
            };
            if min_r == max_r {
                continue;
            }
            let span = (max_r - min_r) as f64;
            let push = increment * (10.0 + span).sqrt();
            weight[min_r as usize] += push;
            weight[max_r as usize] -= push;
        }

        let mut indexed: Vec<(u32, f64)> = order
            .iter()
            .map(|&v| (v, weight[rank[position_of(region, v) as usize] as usize]))
            .collect();
        indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
        let new_order: Vec<u32> = indexed.into_iter().map(|(v, _)| v).collect();

        if new_order == order {
            break;
        }
        order = new_order;
        update_rank(&order, &mut rank);
        increment *= ratio;
    }

    order
}

fn position_of(region: &[u32], v: u32) -> u32 {
    region.binary_search(&v).expect("variable must belong to its own region") as u32
}
