//! Error types for bound arithmetic, coefficient generation and verification.
//!
//! # Contract violations vs. invariant violations
//!
//! Two very different things can go wrong during a verification run:
//!
//! - **Contract violations** are programming errors: a negative or fractional value
//!   where an exact non-negative integer is required, a zero divisor, operands
//!   modelled at different word widths. They surface as [`BoundError`] variants
//!   other than [`BoundError::CheckFailed`].
//! - **Invariant violations** are the failures this crate exists to find: a
//!   [`BoundError::CheckFailed`] raised by one of the overflow checks, wrapped by
//!   the evaluator into [`VerifyError::Invariant`] together with the series, the
//!   number of terms, the word width and the fold step at which it happened.
//!
//! Neither kind is transient, so nothing here is ever retried.

use std::fmt;

use num_rational::BigRational;

use crate::bound::Check;
use crate::rectangular::Step;
use crate::verify::SeriesKind;

/// Errors from [`FixedPointBound`](crate::FixedPointBound) arithmetic and checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoundError {
    /// A value supplied as an exact constant is negative or not an integer.
    InvalidOperand { value: BigRational },
    /// Division by the exact constant zero.
    ZeroDivisor,
    /// Binary operation on bounds modelled at different word widths.
    BitsMismatch { left: u32, right: u32 },
    /// A bound must model a word width of at least one bit.
    InvalidBits,
    /// A bound was constructed with a negative radius.
    NegativeRadius { rad: BigRational },
    /// One of the overflow checks did not hold.
    CheckFailed {
        check: Check,
        upper: BigRational,
        limit: BigRational,
    },
}

impl fmt::Display for BoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOperand { value } => {
                write!(f, "expected an exact non-negative integer, got {value}")
            }
            Self::ZeroDivisor => write!(f, "division by zero"),
            Self::BitsMismatch { left, right } => {
                write!(f, "operands use different word widths ({left} and {right} bits)")
            }
            Self::InvalidBits => write!(f, "word width must be at least one bit"),
            Self::NegativeRadius { rad } => write!(f, "radius must be non-negative, got {rad}"),
            Self::CheckFailed {
                check,
                upper,
                limit,
            } => write!(f, "{check} failed: upper bound {upper} against limit {limit}"),
        }
    }
}

impl std::error::Error for BoundError {}

/// Errors from the coefficient generators and table lookups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoefficientError {
    /// Fewer complete buckets were produced than terms requested.
    Shortfall { wanted: usize, produced: usize },
    /// A rescaled denominator does not fit below `2^bits - 1`.
    BucketBoundary { index: usize },
    /// The fold asked for a coefficient past the end of the table.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for CoefficientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shortfall { wanted, produced } => write!(
                f,
                "coefficient generator produced {produced} complete terms, {wanted} requested"
            ),
            Self::BucketBoundary { index } => {
                write!(f, "denominator at index {index} does not fit in one limb")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "coefficient index {index} out of range for table of length {len}")
            }
        }
    }
}

impl std::error::Error for CoefficientError {}

/// Errors from a single `(series, N, bits)` verification run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyError {
    /// An overflow or sign check failed during the fold or at finalization.
    Invariant {
        series: SeriesKind,
        terms: usize,
        bits: u32,
        step: Step,
        source: BoundError,
    },
    /// The final radius is larger than the accepted tolerance.
    RadiusExceeded {
        series: SeriesKind,
        terms: usize,
        bits: u32,
        rad: BigRational,
        tolerance: BigRational,
    },
    /// Arithmetic contract violation outside of a check.
    Bound(BoundError),
    /// The coefficient table could not serve the run.
    Coefficients(CoefficientError),
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invariant {
                series,
                terms,
                bits,
                step,
                source,
            } => write!(f, "{series} N={terms} bits={bits}: {step}: {source}"),
            Self::RadiusExceeded {
                series,
                terms,
                bits,
                rad,
                tolerance,
            } => write!(
                f,
                "{series} N={terms} bits={bits}: final radius {rad} exceeds {tolerance} ulp"
            ),
            Self::Bound(err) => write!(f, "{err}"),
            Self::Coefficients(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for VerifyError {}

impl From<BoundError> for VerifyError {
    fn from(error: BoundError) -> Self {
        Self::Bound(error)
    }
}

impl From<CoefficientError> for VerifyError {
    fn from(error: CoefficientError) -> Self {
        Self::Coefficients(error)
    }
}

/// Errors from rendering limb tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableError {
    /// The value at `index` needs more than one limb.
    LimbOverflow { index: usize, bits: u32 },
    /// Numerator and denominator tables differ in length.
    LengthMismatch { numer: usize, denom: usize },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LimbOverflow { index, bits } => {
                write!(f, "table entry {index} does not fit in a {bits}-bit limb")
            }
            Self::LengthMismatch { numer, denom } => {
                write!(f, "numerator table has {numer} entries, denominator table {denom}")
            }
        }
    }
}

impl std::error::Error for TableError {}
