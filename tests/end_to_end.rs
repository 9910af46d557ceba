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

//! End-to-end scenarios S1-S6 from the model counter's testable properties:
//! load a DIMACS instance through the real parser and run it through the
//! real driver, exactly as the `sumc` binary would.

use std::io::{BufRead, BufReader, Cursor};

use clap::Parser;

use sumc::cli::CliArgs;
use sumc::dimacs;
use sumc::driver;
use sumc::limits::NoCutoff;

fn count_of(dimacs_text: &str) -> String {
    let store = dimacs::read(BufReader::new(Cursor::new(dimacs_text.to_string())).lines()).unwrap();
    let args = CliArgs::parse_from(["sumc"]);
    driver::run(store, &args, &NoCutoff).count.to_decimal_string()
}

#[test]
fn s1_three_free_variables() {
    assert_eq!(count_of("p cnf 3 0\n"), "8");
}

#[test]
fn s2_single_binary_clause() {
    assert_eq!(count_of("p cnf 2 1\n1 2 0\n"), "3");
}

#[test]
fn s3_two_clashing_binary_clauses() {
    assert_eq!(count_of("p cnf 2 2\n1 2 0\n-1 -2 0\n"), "2");
}

#[test]
fn s4_chained_binary_clauses() {
    assert_eq!(count_of("p cnf 3 2\n1 -2 0\n2 -3 0\n"), "5");
}

#[test]
fn s5_disjoint_pairs_with_a_cross_constraint() {
    assert_eq!(count_of("p cnf 4 3\n1 2 0\n3 4 0\n-1 -3 0\n"), "8");
}

#[test]
fn s6_unsat_via_unit_propagation() {
    assert_eq!(count_of("p cnf 1 2\n1 0\n-1 0\n"), "0");
}

#[test]
fn comment_lines_are_skipped() {
    assert_eq!(
        count_of("c this is a comment\np cnf 2 1\nc another one\n1 2 0\n"),
        "3"
    );
}

#[test]
fn malformed_input_is_a_syntax_error() {
    let result = dimacs::read(BufReader::new(Cursor::new("not a cnf file")).lines());
    assert!(result.is_err());
}

#[test]
fn noreduce_matches_the_preprocessed_result() {
    let text = "p cnf 4 3\n1 2 0\n3 4 0\n-1 -3 0\n";
    let store = dimacs::read(BufReader::new(Cursor::new(text.to_string())).lines()).unwrap();
    let reduced = driver::run(store, &CliArgs::parse_from(["sumc"]), &NoCutoff);

    let store = dimacs::read(BufReader::new(Cursor::new(text.to_string())).lines()).unwrap();
    let unreduced = driver::run(
        store,
        &CliArgs::parse_from(["sumc", "--noreduce=1"]),
        &NoCutoff,
    );

    assert_eq!(
        reduced.count.to_decimal_string(),
        unreduced.count.to_decimal_string()
    );
}
