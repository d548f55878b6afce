//! Coefficients of `atan(x) = sum (-1)^k x^(2k+1) / (2k+1)`.
//!
//! Signs are left to the evaluator, which alternates. Each bucket collects
//! consecutive denominators `2k+1` while their least common multiple stays below
//! `2^bits`; when the next one would push it over, the bucket is closed with
//! `Q = lcm` and `P[i] = Q / q_i` for every member.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;

use super::{CoefficientTable, raw_term_count};
use crate::error::CoefficientError;

/// Builds the first `n` bucketed atan coefficients at `bits`-bit limbs.
///
/// Terms left in the bucket that is still open after `2n + TERM_MARGIN` raw
/// terms are discarded, since their common denominator is not final.
///
/// # Errors
///
/// [`CoefficientError::Shortfall`] if fewer than `n` terms landed in closed
/// buckets.
///
/// # Examples
///
/// ```
/// use taylor_verify::atan_coefficients;
/// use num_bigint::BigUint;
///
/// let table = atan_coefficients(4, 8)?;
/// // lcm(1, 3, 5) = 15 fits in 8 bits, lcm(15, 7) = 105 too, lcm(105, 9) = 315 does not.
/// assert_eq!(table.denominators(), vec![BigUint::from(105u32); 4].as_slice());
/// assert_eq!(table.numerators()[1], BigUint::from(35u32));
/// # Ok::<(), taylor_verify::CoefficientError>(())
/// ```
pub fn atan_coefficients(n: usize, bits: u32) -> Result<CoefficientTable, CoefficientError> {
    let limit = BigUint::one() << bits;
    let mut ps = Vec::with_capacity(n);
    let mut qs = Vec::with_capacity(n);
    let mut open: Vec<BigUint> = Vec::new();
    let mut bucket = BigUint::one();

    for k in 0..raw_term_count(n) {
        let q = BigUint::from(2 * k + 1);
        let merged = bucket.lcm(&q);
        if merged < limit {
            open.push(q);
            bucket = merged;
        } else {
            for member in open.drain(..) {
                ps.push(&bucket / &member);
                qs.push(bucket.clone());
            }
            bucket = q.clone();
            open.push(q);
        }
    }

    if qs.len() < n {
        return Err(CoefficientError::Shortfall {
            wanted: n,
            produced: qs.len(),
        });
    }
    ps.truncate(n);
    qs.truncate(n);
    Ok(CoefficientTable::new(bits, ps, qs))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use num_traits::Zero;

    #[test]
    fn returns_exactly_n_terms_over_sweep_range() {
        for bits in [32, 64] {
            for n in [0, 1, 2, 17, 150, 299, 300] {
                let table = atan_coefficients(n, bits).expect("margin should suffice");
                assert_eq!(table.len(), n, "bits={bits} n={n}");
                assert_eq!(table.numerators().len(), n);
            }
        }
    }

    #[test]
    fn numerators_times_odd_denominator_give_bucket() {
        let table = atan_coefficients(300, 64).expect("margin should suffice");
        for (k, (p, q)) in table
            .numerators()
            .iter()
            .zip(table.denominators())
            .enumerate()
        {
            assert_eq!(p * BigUint::from(2 * k + 1), *q, "k={k}");
        }
    }

    #[test]
    fn denominators_fit_in_one_limb() {
        for bits in [32u32, 64] {
            let limit = BigUint::one() << bits;
            let table = atan_coefficients(300, bits).expect("margin should suffice");
            assert!(table.denominators().iter().all(|q| *q < limit));
        }
    }

    #[test]
    fn each_bucket_denominator_is_divisible_by_its_members() {
        let table = atan_coefficients(40, 32).expect("margin should suffice");
        for (k, q) in table.denominators().iter().enumerate() {
            assert!((q % BigUint::from(2 * k + 1)).is_zero());
        }
    }

    #[test]
    fn small_limbs_split_early() {
        let table = atan_coefficients(6, 8).expect("margin should suffice");
        let qs: Vec<u32> = [105, 105, 105, 105, 99, 99].to_vec();
        let expected: Vec<BigUint> = qs.into_iter().map(BigUint::from).collect();
        assert_eq!(table.denominators(), expected.as_slice());
        assert_eq!(table.numerators()[5], BigUint::from(9u32));
    }
}
