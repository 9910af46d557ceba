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

//! The single fallible boundary of this crate. Parsing is the only thing that
//! can fail below the engine; the engine's own invariants are enforced by
//! construction.

use std::num::ParseIntError;

/// Errors that can arise while reading and parsing a DIMACS instance.
#[derive(Debug, thiserror::Error)]
pub enum CountError {
    /// There was an io related error.
    #[error("io error {0}")]
    Io(#[from] std::io::Error),
    /// The parser expected to read something that was an integer but got some
    /// garbage.
    #[error("parse int {0}")]
    ParseInt(#[from] ParseIntError),
    /// The instance was not a well-formed DIMACS CNF file.
    #[error("malformed dimacs input: {0}")]
    Dimacs(String),
}

/// The outcome reported on the final `c o STATUS=` line (§6).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Status {
    Success,
    MemoryExceeded,
    TimeExceeded,
    Unknown,
    SigTerm,
}

impl Status {
    /// The exact token printed after `STATUS=`.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "SUCCESS",
            Status::MemoryExceeded => "MEMORY-EXCEEDED",
            Status::TimeExceeded => "TIME-EXCEEDED",
            Status::Unknown => "UNKNOWN",
            Status::SigTerm => "SIGTERM",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<crate::limits::StopReason> for Status {
    fn from(reason: crate::limits::StopReason) -> Self {
        use crate::limits::StopReason::*;
        match reason {
            Timeout | CpuTimeout => Status::TimeExceeded,
            MemoryExceeded => Status::MemoryExceeded,
            SigInt => Status::Unknown,
            SigTerm => Status::SigTerm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::StopReason;

    #[test]
    fn stop_reasons_map_to_their_status_tokens() {
        assert_eq!(Status::from(StopReason::Timeout).as_str(), "TIME-EXCEEDED");
        assert_eq!(Status::from(StopReason::CpuTimeout).as_str(), "TIME-EXCEEDED");
        assert_eq!(Status::from(StopReason::MemoryExceeded).as_str(), "MEMORY-EXCEEDED");
        assert_eq!(Status::from(StopReason::SigTerm).as_str(), "SIGTERM");
        assert_eq!(Status::from(StopReason::SigInt).as_str(), "UNKNOWN");
    }

    #[test]
    fn io_error_converts_via_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CountError = io_err.into();
        assert!(matches!(err, CountError::Io(_)));
    }
}
