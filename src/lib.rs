//! Exact-rational verification of fixed-point rectangular-splitting Taylor series.
//!
//! The fixed-point evaluators for `atan`, `exp`, `sin` and `cos` work on arrays of
//! machine limbs, fold bucketed integer coefficients by rectangular splitting and
//! round after every multiplication and division. This crate replays those
//! evaluations with [`FixedPointBound`]s, enclosures with an exact rational center
//! and a radius counted in ulps, and proves for each series length and limb width
//! that:
//!
//! - no intermediate quantity outgrows the limbs allotted to it,
//! - subtracting a partial sum from a coefficient in an alternating series can never
//!   go negative,
//! - the final radius stays within 2 ulp.
//!
//! # Example
//!
//! ```
//! use taylor_verify::{exp_coefficients, verify_exp};
//!
//! let table = exp_coefficients(300, 64)?;
//! let verified = verify_exp(100, &table)?;
//! assert!(verified.result.rad() <= &num_rational::BigRational::from_integer(2.into()));
//! # Ok::<(), taylor_verify::VerifyError>(())
//! ```
#![warn(
    clippy::shadow_reuse,
    clippy::shadow_same,
    clippy::shadow_unrelated,
    clippy::dbg_macro,
    clippy::expect_used,
    clippy::panic,
    clippy::print_stderr,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

pub mod bound;
pub mod coefficients;
mod constant;
mod error;
pub mod rectangular;
pub mod sweep;
pub mod tables;
pub mod verify;

#[cfg(test)]
mod test_utils;

pub use bound::{Check, FixedPointBound};
pub use coefficients::{CoefficientTable, TERM_MARGIN, atan_coefficients, exp_coefficients};
pub use constant::Constant;
pub use error::{BoundError, CoefficientError, TableError, VerifyError};
pub use rectangular::{PowerTable, Step, splitting_degree};
pub use sweep::{SweepConfig, SweepReport, SweepSeries, run_sweep};
pub use tables::{render_coefficient_tables, render_limb_table, verified_table};
pub use verify::{
    SeriesKind, SinCosVerified, Verified, VerifyOptions, verify_atan, verify_atan_with,
    verify_exp, verify_exp_with, verify_sin_cos, verify_sin_cos_with,
};
