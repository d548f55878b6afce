//! Exact non-negative integer constants.
//!
//! The modelled fixed-point format treats multiplication, fused multiply-add and
//! addition by a small exact integer as error-free, while division by one adds a
//! single ulp of rounding. That accounting is only sound if the operand really is
//! a non-negative integer, so the check happens once, here, when the constant is
//! built. Bound arithmetic then takes `&Constant` and cannot be handed anything else.

use std::fmt;

use num_bigint::{BigInt, BigUint, Sign};
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::error::BoundError;

/// An exact non-negative integer operand.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Constant {
    value: BigUint,
}

impl Constant {
    pub fn zero() -> Self {
        Self {
            value: BigUint::zero(),
        }
    }

    pub fn one() -> Self {
        Self {
            value: BigUint::one(),
        }
    }

    /// Validates a signed integer, rejecting negative values.
    pub fn try_from_bigint(value: &BigInt) -> Result<Self, BoundError> {
        match value.to_biguint() {
            Some(value) => Ok(Self { value }),
            None => Err(BoundError::InvalidOperand {
                value: BigRational::from_integer(value.clone()),
            }),
        }
    }

    /// Validates a rational, rejecting fractions and negative values.
    pub fn try_from_ratio(value: &BigRational) -> Result<Self, BoundError> {
        if !value.is_integer() || value.is_negative() {
            return Err(BoundError::InvalidOperand {
                value: value.clone(),
            });
        }
        Self::try_from_bigint(value.numer())
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// The constant as an exact rational.
    pub fn to_ratio(&self) -> BigRational {
        BigRational::from_integer(BigInt::from_biguint(Sign::Plus, self.value.clone()))
    }
}

impl From<BigUint> for Constant {
    fn from(value: BigUint) -> Self {
        Self { value }
    }
}

impl From<&BigUint> for Constant {
    fn from(value: &BigUint) -> Self {
        Self {
            value: value.clone(),
        }
    }
}

impl From<u32> for Constant {
    fn from(value: u32) -> Self {
        Self {
            value: BigUint::from(value),
        }
    }
}

impl From<u64> for Constant {
    fn from(value: u64) -> Self {
        Self {
            value: BigUint::from(value),
        }
    }
}

impl TryFrom<&BigInt> for Constant {
    type Error = BoundError;

    fn try_from(value: &BigInt) -> Result<Self, Self::Error> {
        Self::try_from_bigint(value)
    }
}

impl TryFrom<&BigRational> for Constant {
    type Error = BoundError;

    fn try_from(value: &BigRational) -> Result<Self, Self::Error> {
        Self::try_from_ratio(value)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn ratio(numer: i64, denom: i64) -> BigRational {
        BigRational::new(BigInt::from(numer), BigInt::from(denom))
    }

    #[test]
    fn accepts_non_negative_integers() {
        let c = Constant::try_from_ratio(&ratio(12, 4)).expect("3 is an integer");
        assert_eq!(c.value(), &BigUint::from(3u32));
        let zero = Constant::try_from_bigint(&BigInt::zero()).expect("zero is allowed");
        assert!(zero.is_zero());
    }

    #[test]
    fn rejects_fractions() {
        assert_eq!(
            Constant::try_from_ratio(&ratio(1, 3)),
            Err(BoundError::InvalidOperand { value: ratio(1, 3) })
        );
    }

    #[test]
    fn rejects_negative_values() {
        assert!(matches!(
            Constant::try_from_bigint(&BigInt::from(-1)),
            Err(BoundError::InvalidOperand { .. })
        ));
        assert!(matches!(
            Constant::try_from_ratio(&ratio(-4, 2)),
            Err(BoundError::InvalidOperand { .. })
        ));
    }

    #[test]
    fn to_ratio_round_trips_value() {
        let c = Constant::from(255u32);
        assert_eq!(c.to_ratio(), ratio(255, 1));
        assert_eq!(c.to_string(), "255");
    }
}
