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

//! Wall-clock, CPU-time, memory and signal budgets the sweep engine polls at
//! step boundaries: a cheap, generic (no `dyn`) predicate checked from the hot
//! loop, generalized from "time only" to the fuller budget this counter needs
//! (time, CPU time, memory, signals).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use derive_builder::Builder;

/// Why the engine stopped before reaching a final answer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StopReason {
    Timeout,
    CpuTimeout,
    MemoryExceeded,
    SigInt,
    SigTerm,
}

/// Polled by the sweep engine at step boundaries and periodically during the
/// combine phase. Implementors report whether the run must stop now, and why.
pub trait Cutoff {
    fn should_stop(&self) -> Option<StopReason>;
}

/// Never stops early. Used when no `--timeout`/`--cpu-timeout`/`--maxrss` was
/// given and no signal handler is installed.
pub struct NoCutoff;
impl Cutoff for NoCutoff {
    fn should_stop(&self) -> Option<StopReason> {
        None
    }
}

/// The resolved wall-clock / CPU / memory budget for one run, assembled from
/// CLI options (`crate::cli`).
#[derive(Builder, Clone, Debug, Default)]
#[builder(setter(strip_option), default)]
pub struct Limits {
    pub wall_clock_seconds: Option<f64>,
    pub cpu_seconds: Option<f64>,
    pub max_rss_gb: Option<f64>,
}

/// Signal flags set by the `ctrlc`/`libc::signal` handlers installed in
/// `main`, polled from here rather than acted on directly inside a signal
/// handler.
#[derive(Clone, Default)]
pub struct SignalFlags {
    sigint: Arc<AtomicBool>,
    sigterm: Arc<AtomicBool>,
    /// Set by the `SIGTSTP` handler (Unix only, §5); polled and cleared by
    /// `RunBudget::should_stop`, which logs progress and keeps going rather
    /// than treating it as a `StopReason`.
    sigtstp: Arc<AtomicBool>,
}

impl SignalFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sigint_handle(&self) -> Arc<AtomicBool> {
        self.sigint.clone()
    }

    pub fn sigterm_handle(&self) -> Arc<AtomicBool> {
        self.sigterm.clone()
    }

    pub fn sigtstp_handle(&self) -> Arc<AtomicBool> {
        self.sigtstp.clone()
    }
}

/// Combines [`Limits`] with a start time and the CPU-time/memory accessors
/// (`libc::getrusage`) into a single [`Cutoff`] implementation.
pub struct RunBudget {
    limits: Limits,
    started_at: Instant,
    signals: SignalFlags,
}

impl RunBudget {
    pub fn new(limits: Limits, signals: SignalFlags, started_at: Instant) -> Self {
        RunBudget {
            limits,
            started_at,
            signals,
        }
    }

    /// CPU seconds (user + system) consumed by this process so far, via
    /// `getrusage`. Exposed so the driver can print `c o CPU-TIME-SECONDS=`
    /// (§6) without duplicating the `libc` call.
    pub fn cpu_seconds_elapsed() -> f64 {
        Self::cpu_seconds()
    }

    fn cpu_seconds() -> f64 {
        unsafe {
            let mut usage: libc::rusage = std::mem::zeroed();
            if libc::getrusage(libc::RUSAGE_SELF, &mut usage) != 0 {
                return 0.0;
            }
            let user = usage.ru_utime.tv_sec as f64 + usage.ru_utime.tv_usec as f64 / 1e6;
            let sys = usage.ru_stime.tv_sec as f64 + usage.ru_stime.tv_usec as f64 / 1e6;
            user + sys
        }
    }

    /// Peak resident set size in GiB, via `ru_maxrss` (kilobytes on Linux).
    fn max_rss_gb() -> f64 {
        unsafe {
            let mut usage: libc::rusage = std::mem::zeroed();
            if libc::getrusage(libc::RUSAGE_SELF, &mut usage) != 0 {
                return 0.0;
            }
            (usage.ru_maxrss as f64) / (1024.0 * 1024.0)
        }
    }
}

impl Cutoff for RunBudget {
    fn should_stop(&self) -> Option<StopReason> {
        if self.signals.sigtstp.swap(false, Ordering::Relaxed) {
            log::info!(
                "progress: elapsed={:.3}s cpu={:.3}s",
                self.started_at.elapsed().as_secs_f64(),
                Self::cpu_seconds()
            );
        }
        if self.signals.sigterm.load(Ordering::Relaxed) {
            return Some(StopReason::SigTerm);
        }
        if self.signals.sigint.load(Ordering::Relaxed) {
            return Some(StopReason::SigInt);
        }
        if let Some(limit) = self.limits.wall_clock_seconds {
            if self.started_at.elapsed().as_secs_f64() > limit {
                return Some(StopReason::Timeout);
            }
        }
        if let Some(limit) = self.limits.cpu_seconds {
            if Self::cpu_seconds() > limit {
                return Some(StopReason::CpuTimeout);
            }
        }
        if let Some(limit) = self.limits.max_rss_gb {
            if Self::max_rss_gb() > limit {
                return Some(StopReason::MemoryExceeded);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_cutoff_never_stops() {
        assert!(NoCutoff.should_stop().is_none());
    }

    #[test]
    fn run_budget_respects_wall_clock_limit() {
        let limits = LimitsBuilder::default()
            .wall_clock_seconds(0.0)
            .build()
            .unwrap();
        let budget = RunBudget::new(limits, SignalFlags::new(), Instant::now());
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(budget.should_stop(), Some(StopReason::Timeout));
    }

    #[test]
    fn sigterm_flag_takes_priority() {
        let signals = SignalFlags::new();
        signals.sigterm_handle().store(true, Ordering::Relaxed);
        let budget = RunBudget::new(Limits::default(), signals, Instant::now());
        assert_eq!(budget.should_stop(), Some(StopReason::SigTerm));
    }

    #[test]
    fn sigtstp_logs_progress_and_does_not_halt() {
        let signals = SignalFlags::new();
        signals.sigtstp_handle().store(true, Ordering::Relaxed);
        let budget = RunBudget::new(Limits::default(), signals.clone(), Instant::now());
        assert_eq!(budget.should_stop(), None);
        // the flag is consumed (swapped false) so it does not re-fire every poll
        assert!(!signals.sigtstp_handle().load(Ordering::Relaxed));
    }
}
