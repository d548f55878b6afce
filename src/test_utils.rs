//! Shared test utilities.
//!
//! Small constructors so that test bodies read like the arithmetic they check.

#![allow(clippy::expect_used)]

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::bound::FixedPointBound;

/// Creates the exact rational `numer / denom`.
///
/// # Examples
/// ```ignore
/// let sixteenth = ratio(1, 16);
/// let three = ratio(3, 1);
/// ```
pub fn ratio(numer: i64, denom: i64) -> BigRational {
    BigRational::new(BigInt::from(numer), BigInt::from(denom))
}

/// Creates a bound, panicking on invalid input.
pub fn bound(bits: u32, mid: BigRational, rad: BigRational) -> FixedPointBound {
    FixedPointBound::new(bits, mid, rad).expect("test bound should be valid")
}
