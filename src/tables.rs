//! Rendering verified coefficient tables as C limb arrays.
//!
//! The fixed-point evaluators read their coefficients from static `mp_limb_t`
//! tables (`factorial_tab_numer` / `factorial_tab_denom` for exp, sin and cos).
//! [`verified_table`] rebuilds such a table and replays every evaluation length it
//! can serve before anything is rendered, so a table that leaves this module has
//! been proven safe for all of its lengths.

use num_bigint::BigUint;
use rayon::prelude::*;

use crate::coefficients::CoefficientTable;
use crate::error::{TableError, VerifyError};
use crate::sweep::SweepSeries;
use crate::verify::{VerifyOptions, verify_atan_with, verify_exp_with, verify_sin_cos_with};

/// Builds the first `len` coefficients for `series` and verifies every run they support.
///
/// An exp table is checked for `verify_exp` with `N < len` and for `verify_sin_cos`
/// with `2N <= len`, since the sin/cos evaluator reads the same table at twice the
/// index. An atan table is checked for `N <= len`.
pub fn verified_table(
    series: SweepSeries,
    len: usize,
    bits: u32,
    options: &VerifyOptions,
) -> Result<CoefficientTable, VerifyError> {
    let table = series.table(len, bits)?.truncated(len);
    match series {
        SweepSeries::Exp | SweepSeries::SinCos => {
            (0..len)
                .into_par_iter()
                .try_for_each(|n| verify_exp_with(n, &table, options).map(drop))?;
            (0..=len / 2)
                .into_par_iter()
                .try_for_each(|n| verify_sin_cos_with(n, &table, options).map(drop))?;
        }
        SweepSeries::Atan => {
            (0..=len)
                .into_par_iter()
                .try_for_each(|n| verify_atan_with(n, &table, options).map(drop))?;
        }
    }
    tracing::info!(?series, len, bits, "table verified");
    Ok(table)
}

/// Values per line in a rendered limb array.
const PER_LINE: usize = 8;

/// Renders `values` as a C array of `bits`-bit limbs, eight per line.
///
/// # Errors
///
/// [`TableError::LimbOverflow`] if any value needs more than `bits` bits.
pub fn render_limb_table(name: &str, values: &[BigUint], bits: u32) -> Result<String, TableError> {
    if let Some(index) = values.iter().position(|v| v.bits() > u64::from(bits)) {
        return Err(TableError::LimbOverflow { index, bits });
    }

    let mut out = format!("const mp_limb_t {name}[{}] =\n{{\n", values.len());
    for row in values.chunks(PER_LINE) {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        out.push_str(&format!("    {},\n", cells.join(", ")));
    }
    out.push_str("};\n");
    Ok(out)
}

/// Renders the `{prefix}_numer` and `{prefix}_denom` arrays of a table.
pub fn render_coefficient_tables(prefix: &str, table: &CoefficientTable) -> Result<String, TableError> {
    let numer = table.numerators();
    let denom = table.denominators();
    if numer.len() != denom.len() {
        return Err(TableError::LengthMismatch {
            numer: numer.len(),
            denom: denom.len(),
        });
    }
    let bits = table.bits();
    let mut out = format!("#if FLINT_BITS == {bits}\n\n");
    out.push_str(&render_limb_table(&format!("{prefix}_numer"), numer, bits)?);
    out.push('\n');
    out.push_str(&render_limb_table(&format!("{prefix}_denom"), denom, bits)?);
    out.push_str("\n#endif\n");
    Ok(out)
}
