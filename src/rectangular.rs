//! Rectangular-splitting evaluation, replayed on bounds.
//!
//! The fixed-point evaluator computes `sum_{k<N} (P[k]/Q[k]) y^k` by precomputing
//! `y, y^2, ..., y^m` for an even splitting degree `m ~ sqrt(N)` and folding the
//! coefficients from the top down:
//!
//! - a *baby step* adds `P[k] * y^(k mod m)` with one fused multiply-add;
//! - every `m` terms a *giant step* adds `P[k]` directly and multiplies the whole
//!   accumulator by `y^m`;
//! - whenever the denominator changes between `k+1` and `k` the accumulator is
//!   rescaled to the new bucket.
//!
//! The replay here performs the same operations on [`FixedPointBound`]s and runs
//! every overflow check at the exact point the evaluator relies on it.

use std::fmt;

use crate::bound::FixedPointBound;
use crate::coefficients::CoefficientTable;
use crate::constant::Constant;
use crate::error::{BoundError, VerifyError};
use crate::verify::SeriesKind;

/// Where in a run a check was evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Moving the accumulator to a new bucket denominator before term `k`.
    Rescale { k: usize },
    /// Direct addition of term `k`, followed by multiplication by `y^m`.
    GiantStep { k: usize },
    /// Fused multiply-add of term `k` against a table power.
    BabyStep { k: usize },
    /// Final division by `Q[0]` and restoring the odd power of `x`.
    Finalize,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rescale { k } => write!(f, "rescale at k={k}"),
            Self::GiantStep { k } => write!(f, "giant step at k={k}"),
            Self::BabyStep { k } => write!(f, "baby step at k={k}"),
            Self::Finalize => write!(f, "finalize"),
        }
    }
}

/// Identifies one verification run for error attribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunContext {
    pub series: SeriesKind,
    pub terms: usize,
    pub bits: u32,
}

impl RunContext {
    /// Attributes a bound error to this run. Failed checks become
    /// [`VerifyError::Invariant`]; anything else is a contract violation.
    pub fn attribute(&self, step: Step, error: BoundError) -> VerifyError {
        match error {
            BoundError::CheckFailed { .. } => VerifyError::Invariant {
                series: self.series,
                terms: self.terms,
                bits: self.bits,
                step,
                source: error,
            },
            other => VerifyError::Bound(other),
        }
    }
}

/// Smallest even `m >= 2` with `m * m >= n`.
pub fn splitting_degree(n: usize) -> usize {
    let mut m = 2;
    while m * m < n {
        m += 2;
    }
    m
}

/// Bounds on `y, y^2, ..., y^m` built by the squaring ladder.
#[derive(Clone, Debug)]
pub struct PowerTable {
    // powers[j] encloses y^(j+1)
    powers: Vec<FixedPointBound>,
}

impl PowerTable {
    /// Builds the table for an even `degree >= 2`.
    ///
    /// `y^2` is a square; for each even `k` from 4 to `degree`,
    /// `y^(k-1) = y^(k/2) * y^(k/2-1)` and `y^k = y^(k/2) * y^(k/2)`. Every entry
    /// past the first therefore carries exactly one rounding.
    pub fn build(base: &FixedPointBound, degree: usize) -> Result<Self, BoundError> {
        debug_assert!(degree >= 2 && degree % 2 == 0);
        let mut powers = Vec::with_capacity(degree);
        powers.push(base.clone());
        powers.push(base.mul(base)?);
        for k in (4..=degree).step_by(2) {
            let half = &powers[k / 2 - 1];
            let below_half = &powers[k / 2 - 2];
            let odd = half.mul(below_half)?;
            let even = half.mul(half)?;
            powers.push(odd);
            powers.push(even);
        }
        Ok(Self { powers })
    }

    pub fn degree(&self) -> usize {
        self.powers.len()
    }

    /// Bound on `y^j`.
    ///
    /// # Panics
    ///
    /// Panics unless `1 <= j <= degree`.
    pub fn get(&self, j: usize) -> &FixedPointBound {
        &self.powers[j - 1]
    }

    /// Bound on `y^m`, the giant-step multiplier.
    pub fn top(&self) -> &FixedPointBound {
        self.get(self.degree())
    }
}

/// How the accumulator moves from denominator `e = Q[k+1]` to `d = Q[k]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rescale {
    /// `S * d / e`: lcm buckets, where `d` is not a multiple of `e` (atan).
    MulDiv,
    /// `S / e`: factorial buckets, where the new numerators already absorb `d` (exp, sin, cos).
    Div,
}

/// One backward fold over a strided view of a coefficient table.
///
/// Term `k` uses entry `stride * k + offset`; the next denominator in the series
/// is `stride` entries further on.
pub struct BackwardFold<'a> {
    pub table: &'a CoefficientTable,
    pub powers: &'a PowerTable,
    pub stride: usize,
    pub offset: usize,
    pub rescale: Rescale,
    pub context: RunContext,
}

impl BackwardFold<'_> {
    /// Folds terms `N-1` down to `0` into the accumulator, starting from exact zero.
    pub fn run(&self) -> Result<FixedPointBound, VerifyError> {
        let start = FixedPointBound::zero(self.context.bits)?;
        (0..self.context.terms)
            .rev()
            .try_fold(start, |acc, k| self.term(acc, k))
    }

    fn term(&self, acc: FixedPointBound, k: usize) -> Result<FixedPointBound, VerifyError> {
        let index = self.stride * k + self.offset;
        let c = Constant::from(self.table.numer(index)?);
        let d = Constant::from(self.table.denom(index)?);

        let acc = if k + 1 < self.context.terms {
            let e = Constant::from(self.table.denom(index + self.stride)?);
            if d != e {
                self.rescale(acc, k, &d, &e)?
            } else {
                acc
            }
        } else {
            acc
        };

        let m = self.powers.degree();
        if k % m == 0 {
            self.giant_step(acc, k, &c)
        } else {
            let step = Step::BabyStep { k };
            let next = acc
                .addmul(self.powers.get(k % m), &c)
                .map_err(|err| self.context.attribute(step, err))?;
            next.check_overflow_1()
                .map_err(|err| self.context.attribute(step, err))?;
            Ok(next)
        }
    }

    fn rescale(
        &self,
        acc: FixedPointBound,
        k: usize,
        d: &Constant,
        e: &Constant,
    ) -> Result<FixedPointBound, VerifyError> {
        let at = |err| self.context.attribute(Step::Rescale { k }, err);
        // when alternating, the sum is subtracted from e: it must not go negative
        acc.check_le_int(e).map_err(at)?;
        acc.add_int(e).check_overflow_1().map_err(at)?;
        match self.rescale {
            Rescale::MulDiv => {
                let scaled = acc.mul_int(d).div_int(e).map_err(at)?;
                scaled.add_int(d).check_overflow_1().map_err(at)?;
                Ok(scaled)
            }
            Rescale::Div => {
                let scaled = acc.div_int(e).map_err(at)?;
                scaled.add_int(&Constant::one()).check_overflow_1().map_err(at)?;
                Ok(scaled)
            }
        }
    }

    fn giant_step(
        &self,
        acc: FixedPointBound,
        k: usize,
        c: &Constant,
    ) -> Result<FixedPointBound, VerifyError> {
        let at = |err| self.context.attribute(Step::GiantStep { k }, err);
        acc.check_le_int(c).map_err(at)?;
        let summed = acc.add_int(c);
        summed.check_overflow_1().map_err(at)?;
        if k == 0 {
            return Ok(summed);
        }
        let raised = summed.mul(self.powers.top()).map_err(at)?;
        raised.check_overflow_1().map_err(at)?;
        Ok(raised)
    }
}
