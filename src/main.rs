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

//! The `sumc` binary: reads a DIMACS CNF instance, runs the counter, and
//! prints the §6 result block. Owns every side effect the library crate
//! avoids - stdout, process exit codes, signal registration - so the library
//! stays embeddable.

use std::io::{BufRead, IsTerminal};
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::time::Instant;

use clap::Parser;

use sumc::cli::CliArgs;
use sumc::dimacs;
use sumc::driver;
use sumc::error::Status;
use sumc::limits::{RunBudget, SignalFlags};
use sumc::sweep::Halt;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .init();

    let signals = SignalFlags::new();
    install_signal_handlers(&signals);

    let store = match read_input(&args) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("c o error: {e}");
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "loaded instance: {} variables, {} clauses",
        store.num_vars(),
        store.len()
    );

    let started_at = Instant::now();
    let budget = RunBudget::new(args.limits(), signals, started_at);

    let outcome = driver::run(store, &args, &budget);

    let elapsed_seconds = started_at.elapsed().as_secs_f64();
    let cpu_seconds = RunBudget::cpu_seconds_elapsed();

    print_result(&outcome, elapsed_seconds, cpu_seconds);

    if matches!(outcome.halt, Halt::Completed) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Installs `ctrlc` (SIGINT/SIGTERM) and, on Unix, a `libc::signal` handler
/// for SIGTSTP (§5): both set the atomics `RunBudget` polls rather than
/// acting from within the handler itself.
fn install_signal_handlers(signals: &SignalFlags) {
    let sigint = signals.sigint_handle();
    let sigterm = signals.sigterm_handle();
    let mut seen_once = false;
    if let Err(e) = ctrlc::set_handler(move || {
        // ctrlc only distinguishes "some terminating signal arrived"; a
        // second delivery after the first is treated as the harsher SIGTERM
        // so a stuck run can still be killed outright.
        if seen_once {
            sigterm.store(true, Ordering::Relaxed);
        } else {
            sigint.store(true, Ordering::Relaxed);
            seen_once = true;
        }
    }) {
        log::warn!("failed to install SIGINT/SIGTERM handler: {e}");
    }

    #[cfg(unix)]
    install_sigtstp_handler(signals);
}

#[cfg(unix)]
fn install_sigtstp_handler(signals: &SignalFlags) {
    use std::sync::atomic::AtomicBool;
    use std::sync::OnceLock;

    static SIGTSTP_FLAG: OnceLock<std::sync::Arc<AtomicBool>> = OnceLock::new();
    let _ = SIGTSTP_FLAG.set(signals.sigtstp_handle());

    extern "C" fn handler(_sig: libc::c_int) {
        if let Some(flag) = SIGTSTP_FLAG.get() {
            flag.store(true, Ordering::Relaxed);
        }
    }

    unsafe {
        libc::signal(libc::SIGTSTP, handler as libc::sighandler_t);
    }
}

/// Reads the CNF instance from `args.input`, or stdin if it is `None` or
/// `"-"`. A nonexistent path falls back to stdin, matching the reference
/// reader's leniency (§7).
fn read_input(args: &CliArgs) -> Result<sumc::clause::ClauseStore, sumc::error::CountError> {
    match args.input.as_deref() {
        None | Some("-") => {
            let stdin = std::io::stdin();
            if stdin.is_terminal() {
                log::warn!("reading DIMACS input from an interactive terminal");
            }
            dimacs::read(stdin.lock().lines())
        }
        Some(path) => match std::fs::File::open(path) {
            Ok(file) => dimacs::read(std::io::BufReader::new(file).lines()),
            Err(_) => {
                log::warn!("input file {path} not found, falling back to stdin");
                dimacs::read(std::io::stdin().lock().lines())
            }
        },
    }
}

fn print_result(outcome: &driver::RunOutcome, elapsed_seconds: f64, cpu_seconds: f64) {
    let status = match outcome.halt {
        Halt::Completed => Status::Success,
        Halt::Stopped(reason) => Status::from(reason),
    };

    match outcome.halt {
        Halt::Completed => {
            let satisfiable = !outcome.count.is_zero();
            println!("s {}", if satisfiable { "SATISFIABLE" } else { "UNSATISFIABLE" });
            println!("c s mc");
            println!("c s log10-estimate {}", outcome.count.log10_estimate());
            println!("c s exact arb int {}", outcome.count.to_decimal_string());
        }
        Halt::Stopped(_) => {
            println!("s UNKNOWN");
        }
    }
    println!("c o CPU-TIME-SECONDS={cpu_seconds:.3}");
    println!("c o ELAPSED-TIME-SECONDS={elapsed_seconds:.3}");
    println!("c o STATUS={status}");
    println!("c o OPERATIONS={}", outcome.operations);
}
