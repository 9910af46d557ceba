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

//! Reads a CNF formula in DIMACS format into a [`ClauseStore`]. Lines
//! beginning with `c` are comments; the `p cnf V C` header must appear before
//! any clause line; each clause is a whitespace-separated list of signed
//! nonzero integers terminated by `0`.

use std::io::BufRead;

use regex::Regex;

use crate::clause::ClauseStore;
use crate::common::Literal;
use crate::error::CountError;

/// Matches the problem line, e.g. `p cnf 20 43`.
fn header_re() -> Regex {
    Regex::new(r"^p\s+cnf\s+(?P<vars>\d+)\s+(?P<clauses>\d+)\s*$").unwrap()
}

/// Reads a DIMACS CNF instance from any line source, returning the clause
/// store it describes. `C` is advisory only: clauses are read until EOF, not
/// truncated at the declared count.
pub fn read<B: BufRead>(lines: std::io::Lines<B>) -> Result<ClauseStore, CountError> {
    let header_re = header_re();
    let mut store: Option<ClauseStore> = None;
    let mut current: Vec<Literal> = Vec::new();

    for line in lines {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('c') {
            continue;
        }
        if store.is_none() {
            let caps = header_re
                .captures(line)
                .ok_or_else(|| CountError::Dimacs(format!("expected 'p cnf V C' header, got: {line}")))?;
            let num_vars: u32 = caps["vars"].parse()?;
            store = Some(ClauseStore::new(num_vars));
            continue;
        }

        for tok in line.split_ascii_whitespace() {
            let value: Literal = tok
                .parse()
                .map_err(|_| CountError::Dimacs(format!("expected an integer literal, got: {tok}")))?;
            if value == 0 {
                store.as_mut().unwrap().add(std::mem::take(&mut current));
            } else {
                current.push(value);
            }
        }
    }

    let store = store.ok_or_else(|| CountError::Dimacs("missing 'p cnf V C' header".to_string()))?;
    if !current.is_empty() {
        return Err(CountError::Dimacs("clause not terminated by 0".to_string()));
    }
    Ok(store)
}
