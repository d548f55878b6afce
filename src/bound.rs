//! Fixed-point mid/radius enclosures.
//!
//! A [`FixedPointBound`] models one value held by the fixed-point evaluator as a
//! center `mid` (in absolute units) and a radius `rad` counted in ulps of a
//! `bits`-wide word, so the true value lies in `[mid - rad/2^bits, mid + rad/2^bits]`.
//!
//! Every operation charges exactly the rounding the target format incurs:
//!
//! | operation              | mid                  | rad                                          |
//! |------------------------|----------------------|----------------------------------------------|
//! | `add(b)`               | `m1 + m2`            | `r1 + r2`                                    |
//! | `add_int(c)`           | `m + c`              | `r`                                          |
//! | `mul(b)`               | `m1 * m2`            | `r1*m2 + m1*r2 + r1*r2/2^bits + 1`           |
//! | `mul_int(c)`           | `m * c`              | `r * c`                                      |
//! | `div_int(c)`           | `m / c`              | `r / c + 1`                                  |
//! | `addmul(b, c)`         | `m + m2 * c`         | `r + r2 * c`                                 |
//!
//! Bounds are immutable: each operation returns a fresh value.

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::constant::Constant;
use crate::error::BoundError;

/// Identifies which overflow check was evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Check {
    /// Fits in zero integral limbs: `upper < 1 - 2^-bits`.
    Overflow0,
    /// Fits in one integral limb: `upper < 2^bits - 2^-bits`.
    Overflow1,
    /// Adding the constant in an alternating series keeps the sum non-negative.
    LeInt(Constant),
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow0 => write!(f, "check_overflow_0"),
            Self::Overflow1 => write!(f, "check_overflow_1"),
            Self::LeInt(c) => write!(f, "check_le_int({c})"),
        }
    }
}

/// Rigorous enclosure of a fixed-point quantity with radius in ulps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedPointBound {
    bits: u32,
    mid: BigRational,
    rad: BigRational,
}

impl FixedPointBound {
    /// Creates a bound, validating the word width and the sign of the radius.
    pub fn new(bits: u32, mid: BigRational, rad: BigRational) -> Result<Self, BoundError> {
        if bits == 0 {
            return Err(BoundError::InvalidBits);
        }
        if rad.is_negative() {
            return Err(BoundError::NegativeRadius { rad });
        }
        Ok(Self { bits, mid, rad })
    }

    /// An exact value (radius zero).
    pub fn exact(bits: u32, mid: BigRational) -> Result<Self, BoundError> {
        Self::new(bits, mid, BigRational::zero())
    }

    /// The exact zero accumulator.
    pub fn zero(bits: u32) -> Result<Self, BoundError> {
        Self::exact(bits, BigRational::zero())
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn mid(&self) -> &BigRational {
        &self.mid
    }

    pub fn rad(&self) -> &BigRational {
        &self.rad
    }

    /// One unit in the last place, `2^-bits`.
    pub fn ulp(&self) -> BigRational {
        ulp(self.bits)
    }

    /// Largest value in the enclosure, `mid + rad * 2^-bits`.
    pub fn upper(&self) -> BigRational {
        &self.mid + &self.rad * self.ulp()
    }

    /// Approximate `(mid, rad)` for reporting. Never used for decisions.
    pub fn to_f64_pair(&self) -> (f64, f64) {
        (
            self.mid.to_f64().unwrap_or(f64::NAN),
            self.rad.to_f64().unwrap_or(f64::NAN),
        )
    }

    fn same_bits(&self, other: &Self) -> Result<(), BoundError> {
        if self.bits != other.bits {
            return Err(BoundError::BitsMismatch {
                left: self.bits,
                right: other.bits,
            });
        }
        Ok(())
    }

    fn with(&self, mid: BigRational, rad: BigRational) -> Self {
        Self {
            bits: self.bits,
            mid,
            rad,
        }
    }

    pub fn add(&self, other: &Self) -> Result<Self, BoundError> {
        self.same_bits(other)?;
        Ok(self.with(&self.mid + &other.mid, &self.rad + &other.rad))
    }

    /// Adding an exact integer never widens the radius.
    pub fn add_int(&self, c: &Constant) -> Self {
        self.with(&self.mid + c.to_ratio(), self.rad.clone())
    }

    pub fn mul(&self, other: &Self) -> Result<Self, BoundError> {
        self.same_bits(other)?;
        let mid = &self.mid * &other.mid;
        let rad = &self.rad * &other.mid
            + &self.mid * &other.rad
            + &self.rad * &other.rad * self.ulp()
            + BigRational::one();
        Ok(self.with(mid, rad))
    }

    /// Multiplication by a small exact integer is exact in the target format.
    pub fn mul_int(&self, c: &Constant) -> Self {
        let factor = c.to_ratio();
        self.with(&self.mid * &factor, &self.rad * &factor)
    }

    pub fn div_int(&self, c: &Constant) -> Result<Self, BoundError> {
        if c.is_zero() {
            return Err(BoundError::ZeroDivisor);
        }
        let divisor = c.to_ratio();
        Ok(self.with(&self.mid / &divisor, &self.rad / &divisor + BigRational::one()))
    }

    /// Fused `self + other * c` without an intermediate rounding step.
    pub fn addmul(&self, other: &Self, c: &Constant) -> Result<Self, BoundError> {
        self.same_bits(other)?;
        let factor = c.to_ratio();
        Ok(self.with(&self.mid + &other.mid * &factor, &self.rad + &other.rad * &factor))
    }

    /// Checks that the value fits in the fractional part of a word.
    pub fn check_overflow_0(&self) -> Result<(), BoundError> {
        let limit = BigRational::one() - self.ulp();
        self.check_strictly_below(Check::Overflow0, limit)
    }

    /// Checks that the value fits in one integral limb.
    pub fn check_overflow_1(&self) -> Result<(), BoundError> {
        let limit = pow2(self.bits) - self.ulp();
        self.check_strictly_below(Check::Overflow1, limit)
    }

    /// Checks `upper <= c`, i.e. subtracting from `c` cannot go negative.
    pub fn check_le_int(&self, c: &Constant) -> Result<(), BoundError> {
        let upper = self.upper();
        let limit = c.to_ratio();
        if upper <= limit {
            return Ok(());
        }
        Err(BoundError::CheckFailed {
            check: Check::LeInt(c.clone()),
            upper,
            limit,
        })
    }

    fn check_strictly_below(&self, check: Check, limit: BigRational) -> Result<(), BoundError> {
        let upper = self.upper();
        if upper < limit {
            return Ok(());
        }
        Err(BoundError::CheckFailed {
            check,
            upper,
            limit,
        })
    }
}

impl fmt::Display for FixedPointBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (mid, rad) = self.to_f64_pair();
        write!(f, "[{mid} +/- {rad} ulp @ {} bits]", self.bits)
    }
}

/// `2^bits` as an exact rational.
pub fn pow2(bits: u32) -> BigRational {
    BigRational::from_integer(BigInt::one() << bits)
}

/// `2^-bits` as an exact rational.
pub fn ulp(bits: u32) -> BigRational {
    BigRational::new(BigInt::one(), BigInt::one() << bits)
}
