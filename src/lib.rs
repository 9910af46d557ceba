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

//! # sumc
//!
//! `sumc` is an exact propositional model counter (a #SAT engine): given a
//! Boolean formula in conjunctive normal form, it computes the exact number
//! of satisfying truth assignments as an arbitrary-precision integer.
//!
//! The crate is organized bottom-up, leaves first:
//!
//! - [`bigint`] - the arbitrary-precision `Count` facade (C1).
//! - [`bitset`] - windowed, content-hashed bitsets (C2).
//! - [`intern`] - the arena and per-variable hash tables that canonicalize
//!   bitsets by content (C3).
//! - [`clause`] - the ordered clause store: normalization, dedup, unit
//!   propagation (C4).
//! - [`regions`] - connected-component decomposition of variables (C5).
//! - [`reorder`] - per-region variable reordering that minimizes clause span
//!   (C6).
//! - [`varmap`] - first/last appearance maps derived from the frozen clause
//!   order (C7).
//! - [`trie`] - the literal trie used for subset-containment queries (C8).
//! - [`sweep`] - the main inclusion-exclusion loop (C9).
//! - [`driver`] - wires C1-C9 together into one counting run (C10).
//!
//! Everything below [`driver`] is the ambient stack a complete crate needs
//! around that core: [`dimacs`] parsing, [`cli`] argument handling, and
//! [`limits`]/[`error`] for resource budgets and the single fallible
//! boundary. The `sumc` binary (`src/main.rs`) is the only place that talks
//! to stdout, stderr, signals, or the process exit code; everything in this
//! library is embeddable on its own.

pub mod bigint;
pub mod bitset;
pub mod cli;
pub mod clause;
pub mod common;
pub mod dimacs;
pub mod driver;
pub mod error;
pub mod intern;
pub mod limits;
pub mod regions;
pub mod reorder;
pub mod sweep;
pub mod trie;
pub mod varmap;
