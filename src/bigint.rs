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

//! A thin facade over an arbitrary-precision signed integer, used by the sweep
//! engine to accumulate the signed contribution of every partial assignment.
//! The rest of the crate only ever sees [`Count`]; the `num-bigint` dependency
//! is confined to this module.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

/// A signed arbitrary-precision integer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Count(BigInt);

impl Count {
    /// The additive identity.
    pub fn zero() -> Self {
        Count(BigInt::zero())
    }

    /// The value `1`.
    pub fn one() -> Self {
        Count(BigInt::from(1))
    }

    /// Builds a count from a machine-sized signed integer.
    pub fn from_i64(v: i64) -> Self {
        Count(BigInt::from(v))
    }

    /// `true` iff this count is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The sign of this count: `-1`, `0` or `1`.
    pub fn signum(&self) -> i32 {
        match self.0.cmp(&BigInt::zero()) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }

    /// `self * 2^bits`.
    pub fn shl(&self, bits: u32) -> Self {
        Count(&self.0 << bits)
    }

    /// `self / 2^bits`, truncating towards zero as `>>` does not apply to signed
    /// magnitudes here: the sweep only ever shifts down a value that is an exact
    /// multiple of `2^bits` (see the `extra` accounting in the sweep engine), so
    /// truncation is never lossy in practice.
    pub fn shr(&self, bits: u32) -> Self {
        Count(&self.0 >> bits)
    }

    /// Returns `-self`.
    pub fn negated(&self) -> Self {
        Count(-&self.0)
    }

    /// A base-10 approximation of `log10(|self|)`, or `f64::NEG_INFINITY` if zero.
    /// Used only for the `c s log10-estimate` progress line (§6).
    pub fn log10_estimate(&self) -> f64 {
        if self.is_zero() {
            return f64::NEG_INFINITY;
        }
        let decimal = self.0.magnitude().to_str_radix(10);
        let digits = decimal.len();
        let leading_digits = digits.min(12);
        let leading: f64 = decimal[..leading_digits].parse::<f64>().unwrap_or(1.0);
        leading.log10() + (digits - leading_digits) as f64
    }

    /// Renders the value in plain decimal, with a leading `-` for negative counts.
    pub fn to_decimal_string(&self) -> String {
        self.0.to_str_radix(10)
    }

    /// Best-effort conversion to `u64`, used only by tests that compare against a
    /// brute-force oracle on small instances.
    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }
}

impl Default for Count {
    fn default() -> Self {
        Count::zero()
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Count {
    fn from(v: i64) -> Self {
        Count::from_i64(v)
    }
}

impl Add for Count {
    type Output = Count;
    fn add(self, rhs: Count) -> Count {
        Count(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a Count> for Count {
    type Output = Count;
    fn add(self, rhs: &'a Count) -> Count {
        Count(self.0 + &rhs.0)
    }
}

impl AddAssign<&Count> for Count {
    fn add_assign(&mut self, rhs: &Count) {
        self.0 += &rhs.0;
    }
}

impl Sub for Count {
    type Output = Count;
    fn sub(self, rhs: Count) -> Count {
        Count(self.0 - rhs.0)
    }
}

impl Neg for Count {
    type Output = Count;
    fn neg(self) -> Count {
        Count(-self.0)
    }
}

impl Mul<u32> for Count {
    type Output = Count;
    fn mul(self, rhs: u32) -> Count {
        Count(self.0 * rhs)
    }
}
