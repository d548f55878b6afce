//! Scaled Taylor coefficient tables for binary splitting.
//!
//! The fixed-point evaluator stores each series as two tables of one-limb
//! integers: numerators `P[k]` and denominators `Q[k]`. Consecutive terms are
//! grouped into buckets sharing one denominator; inside a bucket the evaluator
//! folds terms with exact integer multiply-adds, and only when `Q[k] != Q[k+1]`
//! does it pay for a division.
//!
//! # Modules
//!
//! - [`atan`]: buckets of `1/(2k+1)` merged by least common multiple
//! - [`exp`]: buckets of `1/k!` split where the factorial outgrows one limb

pub mod atan;
pub mod exp;

pub use atan::atan_coefficients;
pub use exp::exp_coefficients;

use num_bigint::BigUint;
use num_traits::One;

use crate::error::CoefficientError;

/// Extra raw terms generated beyond the `2n` the callers index into.
///
/// The margin is empirical. The atan generator reports
/// [`CoefficientError::Shortfall`] instead of silently returning a short table
/// if it ever turns out too small.
pub const TERM_MARGIN: usize = 50;

/// Number of raw terms generated for a request of `n` terms.
pub fn raw_term_count(n: usize) -> usize {
    2 * n + TERM_MARGIN
}

/// `2^bits - 1`, the largest value of one limb.
pub(crate) fn limb_max(bits: u32) -> BigUint {
    (BigUint::one() << bits) - BigUint::one()
}

/// Parallel numerator and denominator tables at a fixed limb width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoefficientTable {
    bits: u32,
    ps: Vec<BigUint>,
    qs: Vec<BigUint>,
}

impl CoefficientTable {
    pub(crate) fn new(bits: u32, ps: Vec<BigUint>, qs: Vec<BigUint>) -> Self {
        debug_assert_eq!(ps.len(), qs.len());
        Self { bits, ps, qs }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn len(&self) -> usize {
        self.qs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.qs.is_empty()
    }

    pub fn numerators(&self) -> &[BigUint] {
        &self.ps
    }

    pub fn denominators(&self) -> &[BigUint] {
        &self.qs
    }

    pub fn numer(&self, index: usize) -> Result<&BigUint, CoefficientError> {
        self.ps.get(index).ok_or(CoefficientError::IndexOutOfRange {
            index,
            len: self.ps.len(),
        })
    }

    pub fn denom(&self, index: usize) -> Result<&BigUint, CoefficientError> {
        self.qs.get(index).ok_or(CoefficientError::IndexOutOfRange {
            index,
            len: self.qs.len(),
        })
    }

    /// The first `len` entries (all of them if the table is shorter).
    pub fn truncated(&self, len: usize) -> Self {
        let end = len.min(self.len());
        Self::new(self.bits, self.ps[..end].to_vec(), self.qs[..end].to_vec())
    }

    /// Number of distinct buckets, counting each maximal run of equal denominators.
    pub fn bucket_count(&self) -> usize {
        let mut count = 0;
        let mut previous: Option<&BigUint> = None;
        for q in &self.qs {
            if previous != Some(q) {
                count += 1;
            }
            previous = Some(q);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(ps: &[u32], qs: &[u32]) -> CoefficientTable {
        CoefficientTable::new(
            8,
            ps.iter().map(|&p| BigUint::from(p)).collect(),
            qs.iter().map(|&q| BigUint::from(q)).collect(),
        )
    }

    #[test]
    fn lookups_past_the_end_are_errors() {
        let t = table(&[1, 2], &[3, 3]);
        assert_eq!(t.denom(1), Ok(&BigUint::from(3u32)));
        assert_eq!(
            t.numer(2),
            Err(CoefficientError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn bucket_count_counts_runs() {
        assert_eq!(table(&[], &[]).bucket_count(), 0);
        assert_eq!(table(&[1, 1, 1, 1], &[6, 6, 5, 6]).bucket_count(), 3);
    }

    #[test]
    fn truncated_keeps_prefix() {
        let t = table(&[1, 2, 3], &[6, 6, 6]).truncated(2);
        assert_eq!(t.len(), 2);
        assert_eq!(t.numerators(), &[BigUint::from(1u32), BigUint::from(2u32)]);
        assert_eq!(table(&[1], &[1]).truncated(5).len(), 1);
    }

    #[test]
    fn limb_max_is_all_ones() {
        assert_eq!(limb_max(8), BigUint::from(255u32));
        assert_eq!(raw_term_count(300), 650);
    }
}
