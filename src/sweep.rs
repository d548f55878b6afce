//! The verification sweep over word widths and series lengths.
//!
//! Every `(bits, N)` pair is an independent proof attempt sharing nothing but the
//! coefficient table, which is built once per series and width. Runs within a
//! table can therefore be spread over rayon's pool; results are gathered in `N`
//! order either way so reports and the first reported failure are deterministic.

use rayon::prelude::*;

use crate::coefficients::{CoefficientTable, atan_coefficients, exp_coefficients};
use crate::error::VerifyError;
use crate::verify::{Verified, VerifyOptions, verify_atan_with, verify_exp_with, verify_sin_cos_with};

/// Which verification driver a sweep runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SweepSeries {
    Exp,
    Atan,
    SinCos,
}

impl SweepSeries {
    pub const ALL: [Self; 3] = [Self::SinCos, Self::Exp, Self::Atan];

    /// Builds the coefficient table this driver reads.
    pub fn table(self, max_terms: usize, bits: u32) -> Result<CoefficientTable, VerifyError> {
        let table = match self {
            Self::Exp | Self::SinCos => exp_coefficients(max_terms, bits)?,
            Self::Atan => atan_coefficients(max_terms, bits)?,
        };
        Ok(table)
    }

    /// Runs the driver for `n` terms. Sin/cos yields two results.
    pub fn verify(
        self,
        n: usize,
        table: &CoefficientTable,
        options: &VerifyOptions,
    ) -> Result<Vec<Verified>, VerifyError> {
        match self {
            Self::Exp => Ok(vec![verify_exp_with(n, table, options)?]),
            Self::Atan => Ok(vec![verify_atan_with(n, table, options)?]),
            Self::SinCos => {
                let both = verify_sin_cos_with(n, table, options)?;
                Ok(vec![both.cos, both.sin])
            }
        }
    }
}

/// Sweep parameters. The default is the full reference sweep.
#[derive(Clone, Debug)]
pub struct SweepConfig {
    pub bits: Vec<u32>,
    /// Runs cover `N` in `0..max_terms`.
    pub max_terms: usize,
    pub series: Vec<SweepSeries>,
    pub options: VerifyOptions,
    /// Stop at the first failure instead of cataloging all of them.
    pub fail_fast: bool,
    pub parallel: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            bits: vec![32, 64],
            max_terms: 300,
            series: SweepSeries::ALL.to_vec(),
            options: VerifyOptions::default(),
            fail_fast: true,
            parallel: false,
        }
    }
}

/// Outcome of a sweep run in cataloging mode.
#[derive(Clone, Debug, Default)]
pub struct SweepReport {
    pub passed: Vec<Verified>,
    pub failures: Vec<VerifyError>,
}

impl SweepReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs the sweep described by `config`.
///
/// With `fail_fast` the first failure (in series, width, `N` order) is returned as
/// the error; otherwise every failure is collected into the report and `Ok` is
/// returned even if some runs failed.
pub fn run_sweep(config: &SweepConfig) -> Result<SweepReport, VerifyError> {
    let mut report = SweepReport::default();

    for &series in &config.series {
        for &bits in &config.bits {
            let span = tracing::info_span!("sweep", ?series, bits);
            let _entered = span.enter();

            let table = match series.table(config.max_terms, bits) {
                Ok(table) => table,
                Err(err) => {
                    tracing::error!(%err, "cannot build coefficient table");
                    if config.fail_fast {
                        return Err(err);
                    }
                    report.failures.push(err);
                    continue;
                }
            };

            let run = |n: usize| series.verify(n, &table, &config.options);
            let outcomes: Vec<Result<Vec<Verified>, VerifyError>> = if config.parallel {
                (0..config.max_terms).into_par_iter().map(run).collect()
            } else {
                (0..config.max_terms).map(run).collect()
            };

            let before = report.failures.len();
            for outcome in outcomes {
                match outcome {
                    Ok(results) => {
                        for verified in results {
                            let (mid, rad) = verified.result.to_f64_pair();
                            tracing::info!(
                                series = %verified.series,
                                bits,
                                terms = verified.terms,
                                mid,
                                rad,
                                "verified"
                            );
                            report.passed.push(verified);
                        }
                    }
                    Err(err) => {
                        tracing::error!(%err, "verification failed");
                        if config.fail_fast {
                            return Err(err);
                        }
                        report.failures.push(err);
                    }
                }
            }
            tracing::info!(
                runs = config.max_terms,
                failures = report.failures.len() - before,
                "finished"
            );
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::test_utils::ratio;
    use crate::verify::SeriesKind;

    fn small(series: SweepSeries) -> SweepConfig {
        SweepConfig {
            max_terms: 12,
            series: vec![series],
            ..SweepConfig::default()
        }
    }

    #[test]
    fn default_matches_reference_sweep() {
        let config = SweepConfig::default();
        assert_eq!(config.bits, vec![32, 64]);
        assert_eq!(config.max_terms, 300);
        assert_eq!(config.series.len(), 3);
        assert!(config.fail_fast);
    }

    #[test]
    fn sin_cos_reports_both_folds() {
        let report = run_sweep(&small(SweepSeries::SinCos)).expect("small sweep verifies");
        assert!(report.is_success());
        assert_eq!(report.passed.len(), 2 * 2 * 12);
        let sines = report
            .passed
            .iter()
            .filter(|v| v.series == SeriesKind::Sin)
            .count();
        assert_eq!(sines, 2 * 12);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let sequential = run_sweep(&small(SweepSeries::Atan)).expect("verifies");
        let parallel = run_sweep(&SweepConfig {
            parallel: true,
            ..small(SweepSeries::Atan)
        })
        .expect("verifies");
        assert_eq!(sequential.passed, parallel.passed);
    }

    #[test]
    fn cataloging_collects_every_failure() {
        let config = SweepConfig {
            bits: vec![32],
            fail_fast: false,
            options: VerifyOptions {
                tolerance: ratio(0, 1),
                ..VerifyOptions::default()
            },
            ..small(SweepSeries::Exp)
        };
        let report = run_sweep(&config).expect("cataloging never errors");
        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 12);
        assert!(report.passed.is_empty());
    }

    #[test]
    fn fail_fast_returns_first_failure() {
        let config = SweepConfig {
            bits: vec![32],
            options: VerifyOptions {
                tolerance: ratio(0, 1),
                ..VerifyOptions::default()
            },
            ..small(SweepSeries::Exp)
        };
        match run_sweep(&config) {
            Err(VerifyError::RadiusExceeded { terms, .. }) => assert_eq!(terms, 0),
            other => panic!("expected radius failure at N=0, got {other:?}"),
        }
    }
}
