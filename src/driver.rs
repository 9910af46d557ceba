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

//! Wires C1-C9 together (C10): takes a parsed [`ClauseStore`], runs the
//! preprocessor unless `--noreduce` was given, runs the sweep, and folds the
//! `2^unusedVariables` factor (§4.1) into the final [`Count`]. Kept separate
//! from `main` so it can be exercised directly by the end-to-end tests
//! (§8) without going through argument parsing or process exit codes.

use crate::bigint::Count;
use crate::cli::CliArgs;
use crate::clause::ClauseStore;
use crate::limits::Cutoff;
use crate::regions;
use crate::reorder;
use crate::sweep::{Engine, Halt};
use crate::varmap::VarMap;

/// The outcome of one complete run: either the exact count (possibly zero,
/// meaning UNSAT) together with how the sweep finished, grounds every line
/// of the §6 result block.
pub struct RunOutcome {
    pub count: Count,
    pub halt: Halt,
    pub operations: u64,
}

/// Runs the preprocessor (unless `args.skip_preprocessing()`) and the sweep
/// over `store`, returning the final count. `store` is consumed: both the
/// preprocessor and the sweep mutate/renumber it in place.
pub fn run(mut store: ClauseStore, args: &CliArgs, cutoff: &dyn Cutoff) -> RunOutcome {
    store.dedup();

    let mut unused_variables = 0u32;
    if !args.skip_preprocessing() {
        match store.unit_propagate() {
            Err(_unsat) => {
                return RunOutcome {
                    count: Count::zero(),
                    halt: Halt::Completed,
                    operations: 0,
                };
            }
            Ok(result) => {
                unused_variables = result.unused_variables;
                store.renumber_contiguous();
                apply_reordering(&mut store, args.turns);
            }
        }
    }

    let var_map = VarMap::build(store.clauses(), store.num_vars());
    let mut engine = Engine::new(&store);
    let outcome = engine.run(&store, &var_map, cutoff);

    RunOutcome {
        count: outcome.contribution.shl(unused_variables),
        halt: outcome.halt,
        operations: outcome.operations,
    }
}

/// Decomposes `store` into regions (C5), reorders each region to minimize
/// clause span (C6, bounded by `max_turns`), and renumbers variables so
/// regions occupy contiguous intervals in the new order.
fn apply_reordering(store: &mut ClauseStore, max_turns: u32) {
    let regions = regions::decompose(store.clauses(), store.num_vars());
    let mut permutation = vec![0u32; store.num_vars() as usize + 1];
    let mut next_slot = 1u32;
    for region in &regions {
        let reordered = reorder::reorder_region(region, store.clauses(), max_turns);
        for &v in &reordered {
            permutation[v as usize] = next_slot;
            next_slot += 1;
        }
    }
    store.apply_permutation(&permutation);
}
