//! Coefficients of `exp(x) = sum x^k / k!`.
//!
//! Denominators start as the factorials. Scanning upward, as soon as `k!` (divided
//! by everything already split off) would reach `2^bits - 1`, the bucket ending at
//! `k - 1` is frozen with denominator `q = Q[k-1]` and `q` is divided out of every
//! later entry. Numerators are then `Q[k]` divided by the running product of the
//! indices inside the current bucket, so that `P[k] / Q[k] = 1 / k!` up to the
//! factor already removed at the bucket boundaries.

use num_bigint::BigUint;
use num_traits::One;

use super::{CoefficientTable, limb_max, raw_term_count};
use crate::error::CoefficientError;

/// Builds `2m + TERM_MARGIN` bucketed exp coefficients at `bits`-bit limbs.
///
/// # Errors
///
/// [`CoefficientError::BucketBoundary`] if a rescaled denominator is not
/// strictly below `2^bits - 1`, which can only happen for limbs too narrow to
/// hold two consecutive indices.
pub fn exp_coefficients(m: usize, bits: u32) -> Result<CoefficientTable, CoefficientError> {
    let len = raw_term_count(m);
    let limit = limb_max(bits);

    let mut qs: Vec<BigUint> = Vec::with_capacity(len);
    let mut factorial = BigUint::one();
    for k in 0..len {
        if k > 0 {
            factorial *= k;
        }
        qs.push(factorial.clone());
    }

    let mut prevstop = 0;
    for k in 0..len {
        if qs[k] >= limit {
            if k == 0 {
                return Err(CoefficientError::BucketBoundary { index: 0 });
            }
            let q = qs[k - 1].clone();
            for later in &mut qs[k..] {
                *later /= &q;
            }
            for earlier in &mut qs[prevstop..k] {
                *earlier = q.clone();
            }
            prevstop = k;
        }
    }

    let mut ps = qs.clone();
    let mut fact = BigUint::one();
    for k in 1..len {
        if qs[k] >= limit {
            return Err(CoefficientError::BucketBoundary { index: k });
        }
        if qs[k] == qs[k - 1] {
            fact *= k;
        } else {
            fact = BigUint::from(k);
        }
        ps[k] /= &fact;
    }

    Ok(CoefficientTable::new(bits, ps, qs))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::coefficients::TERM_MARGIN;

    fn as_u64(values: &[BigUint]) -> Vec<u64> {
        values
            .iter()
            .map(|v| u64::try_from(v).expect("small value"))
            .collect()
    }

    #[test]
    fn length_is_twice_m_plus_margin() {
        for bits in [32, 64] {
            for m in [0, 1, 10, 300] {
                let table = exp_coefficients(m, bits).expect("valid width");
                assert_eq!(table.len(), 2 * m + TERM_MARGIN);
                assert_eq!(table.numerators().len(), table.denominators().len());
            }
        }
    }

    #[test]
    fn denominators_stay_below_limb_max() {
        for bits in [32, 64] {
            let limit = limb_max(bits);
            let table = exp_coefficients(300, bits).expect("valid width");
            for (k, q) in table.denominators().iter().enumerate() {
                assert!(*q < limit, "bits={bits} k={k}");
            }
        }
    }

    #[test]
    fn first_bucket_matches_factorials() {
        // 12! < 2^32 - 1 < 13!, so the first bucket is 0..=12 with Q = 12!.
        let table = exp_coefficients(10, 32).expect("valid width");
        let q = 479_001_600u64;
        let qs = as_u64(&table.denominators()[..13]);
        assert!(qs.iter().all(|&d| d == q));
        assert_ne!(table.denominators()[13], BigUint::from(q));
        let ps = as_u64(&table.numerators()[..4]);
        assert_eq!(ps, vec![q, q, q / 2, q / 6]);
    }

    #[test]
    fn bucket_entries_are_scaled_inverse_factorials() {
        // Inside the first bucket P[k] * k! == Q[k] exactly.
        let table = exp_coefficients(10, 64).expect("valid width");
        let mut factorial = BigUint::one();
        for k in 0..=20usize {
            if k > 0 {
                factorial *= k;
            }
            assert_eq!(&table.numerators()[k] * &factorial, table.denominators()[k]);
        }
    }

    #[test]
    fn one_bit_limbs_are_rejected() {
        assert_eq!(
            exp_coefficients(0, 1),
            Err(CoefficientError::BucketBoundary { index: 0 })
        );
    }
}
