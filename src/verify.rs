//! Verification drivers for the atan, exp and combined sin/cos evaluators.
//!
//! Each driver replays one fixed-point evaluation of `N` terms at the table's limb
//! width, starting from the exact expansion point (by default `x = 1/16`, the
//! largest argument the evaluators accept after argument reduction), and accepts
//! the run only if every overflow check holds and the final radius is within the
//! tolerance (by default 2 ulp).

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::bound::FixedPointBound;
use crate::coefficients::CoefficientTable;
use crate::constant::Constant;
use crate::error::VerifyError;
use crate::rectangular::{BackwardFold, PowerTable, Rescale, RunContext, Step, splitting_degree};

/// Default expansion point numerator and denominator.
const DEFAULT_POINT: (i64, i64) = (1, 16);

/// Default accepted final radius, in ulps.
const DEFAULT_TOLERANCE: i64 = 2;

/// The series whose evaluation a run replays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeriesKind {
    Atan,
    Exp,
    /// Even-indexed half of the combined sin/cos table.
    Cos,
    /// Odd-indexed half of the combined sin/cos table.
    Sin,
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atan => write!(f, "atan"),
            Self::Exp => write!(f, "exp"),
            Self::Cos => write!(f, "cos"),
            Self::Sin => write!(f, "sin"),
        }
    }
}

/// Expansion point and acceptance tolerance for a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyOptions {
    pub point: BigRational,
    /// Largest accepted final radius, in ulps.
    pub tolerance: BigRational,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            point: BigRational::new(BigInt::from(DEFAULT_POINT.0), BigInt::from(DEFAULT_POINT.1)),
            tolerance: BigRational::from_integer(BigInt::from(DEFAULT_TOLERANCE)),
        }
    }
}

/// A successful run: every check held and the final radius is within tolerance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verified {
    pub series: SeriesKind,
    pub terms: usize,
    pub bits: u32,
    pub result: FixedPointBound,
}

/// Both folds of a sin/cos run, sharing one power table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinCosVerified {
    pub cos: Verified,
    pub sin: Verified,
}

pub fn verify_atan(n: usize, table: &CoefficientTable) -> Result<Verified, VerifyError> {
    verify_atan_with(n, table, &VerifyOptions::default())
}

pub fn verify_exp(n: usize, table: &CoefficientTable) -> Result<Verified, VerifyError> {
    verify_exp_with(n, table, &VerifyOptions::default())
}

pub fn verify_sin_cos(n: usize, table: &CoefficientTable) -> Result<SinCosVerified, VerifyError> {
    verify_sin_cos_with(n, table, &VerifyOptions::default())
}

/// Replays the atan evaluation with `n` terms, folding the term magnitudes
/// `x * sum (x^2)^k / (2k+1)`.
///
/// The evaluator alternates signs by subtracting the running sum from each
/// coefficient; the `check_le_int` checks in the fold keep that subtraction
/// non-negative, so bounding the magnitudes bounds every limb it touches. The
/// table is built by [`atan_coefficients`](crate::atan_coefficients); the fold
/// runs in powers of `x^2` and the final multiplication by `x` restores the odd
/// power, after which the result must fit below one.
pub fn verify_atan_with(
    n: usize,
    table: &CoefficientTable,
    options: &VerifyOptions,
) -> Result<Verified, VerifyError> {
    let context = RunContext {
        series: SeriesKind::Atan,
        terms: n,
        bits: table.bits(),
    };
    let x = FixedPointBound::exact(context.bits, options.point.clone())?;
    let powers = PowerTable::build(&x.mul(&x)?, splitting_degree(n))?;
    let sum = BackwardFold {
        table,
        powers: &powers,
        stride: 1,
        offset: 0,
        rescale: Rescale::MulDiv,
        context,
    }
    .run()?;

    let at = |err| context.attribute(Step::Finalize, err);
    let q0 = Constant::from(table.denom(0)?);
    let result = sum.div_int(&q0).map_err(at)?.mul(&x).map_err(at)?;
    result.check_overflow_0().map_err(at)?;
    accept(context, result, options)
}

/// Replays `exp(x) = sum x^k / k!` with `n` terms.
///
/// The result is close to `1 + x` and must fit in one integral limb.
pub fn verify_exp_with(
    n: usize,
    table: &CoefficientTable,
    options: &VerifyOptions,
) -> Result<Verified, VerifyError> {
    let context = RunContext {
        series: SeriesKind::Exp,
        terms: n,
        bits: table.bits(),
    };
    let x = FixedPointBound::exact(context.bits, options.point.clone())?;
    let powers = PowerTable::build(&x, splitting_degree(n))?;
    let sum = BackwardFold {
        table,
        powers: &powers,
        stride: 1,
        offset: 0,
        rescale: Rescale::Div,
        context,
    }
    .run()?;

    let at = |err| context.attribute(Step::Finalize, err);
    let q0 = Constant::from(table.denom(0)?);
    let result = sum.div_int(&q0).map_err(at)?;
    result.check_overflow_1().map_err(at)?;
    accept(context, result, options)
}

/// Replays the combined evaluation of `cos(x)` and `sin(x)` with `n` terms each.
///
/// As for atan, the term magnitudes are folded and the signs are left to the
/// evaluator's alternation, so the folds sum `x^(2k) / (2k)!` and
/// `x^(2k+1) / (2k+1)!`. Both read the exp table: cosine the even entries, sine
/// the odd ones, each stepping in powers of `x^2`. The cosine result may
/// reach one and is checked against one integral limb (its top limb being 0 or 1
/// then follows from the radius bound); the sine result is multiplied by `x` and
/// must fit below one.
pub fn verify_sin_cos_with(
    n: usize,
    table: &CoefficientTable,
    options: &VerifyOptions,
) -> Result<SinCosVerified, VerifyError> {
    let bits = table.bits();
    let x = FixedPointBound::exact(bits, options.point.clone())?;
    let powers = PowerTable::build(&x.mul(&x)?, splitting_degree(n))?;
    let q0 = Constant::from(table.denom(0)?);

    let fold = |series: SeriesKind,
                offset: usize|
     -> Result<(RunContext, FixedPointBound), VerifyError> {
        let context = RunContext {
            series,
            terms: n,
            bits,
        };
        let sum = BackwardFold {
            table,
            powers: &powers,
            stride: 2,
            offset,
            rescale: Rescale::Div,
            context,
        }
        .run()?;
        let at = |err| context.attribute(Step::Finalize, err);
        let result = sum.div_int(&q0).map_err(at)?;
        result.check_overflow_1().map_err(at)?;
        Ok((context, result))
    };

    let (cos_context, cos_sum) = fold(SeriesKind::Cos, 0)?;
    let cos = accept(cos_context, cos_sum, options)?;

    let (sin_context, sin_sum) = fold(SeriesKind::Sin, 1)?;
    let at = |err| sin_context.attribute(Step::Finalize, err);
    let sin_times_x = sin_sum.mul(&x).map_err(at)?;
    sin_times_x.check_overflow_0().map_err(at)?;
    let sin = accept(sin_context, sin_times_x, options)?;

    Ok(SinCosVerified { cos, sin })
}

fn accept(
    context: RunContext,
    result: FixedPointBound,
    options: &VerifyOptions,
) -> Result<Verified, VerifyError> {
    let (mid, rad) = result.to_f64_pair();
    tracing::debug!(
        series = %context.series,
        bits = context.bits,
        terms = context.terms,
        mid,
        rad,
        "finished fold"
    );
    if result.rad() > &options.tolerance {
        return Err(VerifyError::RadiusExceeded {
            series: context.series,
            terms: context.terms,
            bits: context.bits,
            rad: result.rad().clone(),
            tolerance: options.tolerance.clone(),
        });
    }
    Ok(Verified {
        series: context.series,
        terms: context.terms,
        bits: context.bits,
        result,
    })
}
