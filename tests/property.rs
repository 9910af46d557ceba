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

//! Property-based cross-validation against a brute-force `2^V` enumeration
//! oracle (§8): randomized small instances (`V in 1..=12`, `C in 0..20`) must
//! agree with the sweep engine regardless of `--noreduce`, and the two
//! structural invariants (tautology and duplicate-clause insensitivity) must
//! hold on every sampled instance.

use clap::Parser;
use proptest::prelude::*;

use sumc::cli::CliArgs;
use sumc::clause::ClauseStore;
use sumc::driver;
use sumc::limits::NoCutoff;

/// Evaluates `clauses` against every one of the `2^num_vars` assignments and
/// returns the number that satisfy every clause. This is the independent
/// oracle the sweep engine's inclusion-exclusion walk is checked against.
fn brute_force_count(num_vars: u32, clauses: &[Vec<i64>]) -> u64 {
    let mut count = 0u64;
    for assignment in 0..(1u64 << num_vars) {
        // bit (v-1) of `assignment` is true iff variable v is true.
        let satisfied = clauses.iter().all(|clause| {
            clause.iter().any(|&lit| {
                let v = lit.unsigned_abs() as u32 - 1;
                let value = (assignment >> v) & 1 == 1;
                (lit > 0) == value
            })
        });
        if satisfied {
            count += 1;
        }
    }
    count
}

fn store_of(num_vars: u32, clauses: &[Vec<i64>]) -> ClauseStore {
    let mut store = ClauseStore::new(num_vars);
    for c in clauses {
        store.add(c.clone());
    }
    store
}

fn count_with(num_vars: u32, clauses: &[Vec<i64>], extra_args: &[&str]) -> String {
    let mut argv = vec!["sumc"];
    argv.extend_from_slice(extra_args);
    let args = CliArgs::parse_from(argv);
    driver::run(store_of(num_vars, clauses), &args, &NoCutoff)
        .count
        .to_decimal_string()
}

/// Generates a random small CNF instance: `V` in `1..=12` variables, `C` in
/// `0..20` clauses, each clause 1-4 literals over distinct variables.
fn small_instance() -> impl Strategy<Value = (u32, Vec<Vec<i64>>)> {
    (1u32..=12).prop_flat_map(|num_vars| {
        let clause = (1..=4usize)
            .prop_flat_map(move |width| {
                proptest::collection::vec(1..=num_vars, width..=width).prop_flat_map(move |vars| {
                    let signs: Vec<_> = vars.iter().map(|_| proptest::bool::ANY).collect();
                    signs.prop_map(move |signs| {
                        vars.iter()
                            .zip(signs)
                            .map(|(&v, positive)| if positive { v as i64 } else { -(v as i64) })
                            .collect::<Vec<i64>>()
                    })
                })
            })
            .boxed();
        (Just(num_vars), proptest::collection::vec(clause, 0..20))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn counts_match_brute_force_enumeration((num_vars, clauses) in small_instance()) {
        let expected = brute_force_count(num_vars, &clauses).to_string();
        prop_assert_eq!(count_with(num_vars, &clauses, &[]), expected.clone());
        prop_assert_eq!(count_with(num_vars, &clauses, &["--noreduce=1"]), expected);
    }

    #[test]
    fn tautological_clause_does_not_change_the_count((num_vars, mut clauses) in small_instance()) {
        let base = count_with(num_vars, &clauses, &[]);
        clauses.push(vec![1, -1]);
        let with_tautology = count_with(num_vars, &clauses, &[]);
        prop_assert_eq!(base, with_tautology);
    }

    #[test]
    fn duplicated_clause_does_not_change_the_count((num_vars, mut clauses) in small_instance()) {
        prop_assume!(!clauses.is_empty());
        let base = count_with(num_vars, &clauses, &[]);
        let dup = clauses[0].clone();
        clauses.push(dup);
        let with_duplicate = count_with(num_vars, &clauses, &[]);
        prop_assert_eq!(base, with_duplicate);
    }
}
