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

//! The `clap`-derived command line surface (§6).

use clap::Parser;

use crate::limits::{Limits, LimitsBuilder};

/// An exact propositional model counter (#SAT) over DIMACS CNF input.
#[derive(Parser, Debug)]
#[command(name = "sumc", version, about)]
pub struct CliArgs {
    /// Path to a DIMACS CNF instance. `-` or omitted reads from stdin.
    pub input: Option<String>,

    /// Per-variable iteration budget for the region reorderer (an upper
    /// bound only; the reorderer may converge sooner).
    #[arg(long, default_value_t = 400)]
    pub turns: u32,

    /// Trace bitmask: bit 1 periodic progress, bit 2 normal progress, bit 3
    /// dumps the full clause list, bit 4 dumps bitsets at every step.
    #[arg(long, default_value_t = 0)]
    pub trace: u32,

    /// Wall-clock seconds limit.
    #[arg(long)]
    pub timeout: Option<f64>,

    /// CPU seconds limit.
    #[arg(long = "cpu-timeout")]
    pub cpu_timeout: Option<f64>,

    /// Memory limit, in GB of resident set size.
    #[arg(long)]
    pub maxrss: Option<f64>,

    /// Skip unit propagation and variable reordering. Any nonzero value
    /// enables the flag, so `--noreduce=1` and `--noreduce=true` both work.
    #[arg(long, default_value_t = 0)]
    pub noreduce: u32,
}

impl CliArgs {
    pub fn skip_preprocessing(&self) -> bool {
        self.noreduce != 0
    }

    pub fn limits(&self) -> Limits {
        let mut builder = LimitsBuilder::default();
        if let Some(t) = self.timeout {
            builder.wall_clock_seconds(t);
        }
        if let Some(t) = self.cpu_timeout {
            builder.cpu_seconds(t);
        }
        if let Some(m) = self.maxrss {
            builder.max_rss_gb(m);
        }
        builder.build().expect("Limits has no required fields")
    }

    /// The effective `log` level implied by `--trace` (§10.3).
    pub fn log_level(&self) -> log::LevelFilter {
        if self.trace & 0b1000 != 0 {
            log::LevelFilter::Trace
        } else if self.trace & 0b0100 != 0 {
            log::LevelFilter::Debug
        } else if self.trace & 0b0011 != 0 {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_counter() {
        let args = CliArgs::parse_from(["sumc"]);
        assert_eq!(args.turns, 400);
        assert_eq!(args.trace, 0);
        assert!(!args.skip_preprocessing());
        assert_eq!(args.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn noreduce_is_a_truthy_flag_not_a_strict_boolean() {
        let args = CliArgs::parse_from(["sumc", "--noreduce=1"]);
        assert!(args.skip_preprocessing());
    }

    #[test]
    fn limits_only_carries_options_that_were_given() {
        let args = CliArgs::parse_from(["sumc", "--timeout=30"]);
        let limits = args.limits();
        assert_eq!(limits.wall_clock_seconds, Some(30.0));
        assert_eq!(limits.cpu_seconds, None);
    }

    #[test]
    fn trace_bitmask_selects_the_log_level() {
        assert_eq!(
            CliArgs::parse_from(["sumc", "--trace=8"]).log_level(),
            log::LevelFilter::Trace
        );
        assert_eq!(
            CliArgs::parse_from(["sumc", "--trace=4"]).log_level(),
            log::LevelFilter::Debug
        );
        assert_eq!(
            CliArgs::parse_from(["sumc", "--trace=2"]).log_level(),
            log::LevelFilter::Info
        );
    }
}
