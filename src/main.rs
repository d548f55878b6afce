use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use num_bigint::BigInt;
use num_rational::BigRational;
use tracing_subscriber::EnvFilter;

use taylor_verify::{
    SweepConfig, SweepSeries, VerifyOptions, render_coefficient_tables, run_sweep, verified_table,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify the fixed-point evaluators over a sweep of series lengths and limb widths
    Verify {
        /// Limb widths to check (repeatable)
        #[arg(long = "bits", default_values_t = [32u32, 64])]
        bits: Vec<u32>,

        /// Check series lengths 0..MAX_TERMS
        #[arg(long, default_value_t = 300)]
        max_terms: usize,

        /// Series to check (repeatable); all by default
        #[arg(long, value_enum)]
        series: Vec<SeriesArg>,

        /// Expansion point as NUM/DEN
        #[arg(long, default_value = "1/16")]
        point: String,

        /// Largest accepted final radius in ulps
        #[arg(long, default_value_t = 2)]
        tolerance: u64,

        /// Catalog every failure instead of stopping at the first
        #[arg(long)]
        keep_going: bool,

        /// Spread runs over all cores
        #[arg(long)]
        parallel: bool,
    },
    /// Print verified coefficient tables as C limb arrays
    Tables {
        #[arg(long, value_enum, default_value_t = SeriesArg::Exp)]
        series: SeriesArg,

        #[arg(long, default_value_t = 64)]
        bits: u32,

        /// Number of table entries
        #[arg(long, default_value_t = 288)]
        len: usize,

        /// Array name prefix; `<prefix>_numer` and `<prefix>_denom` are emitted
        #[arg(long)]
        prefix: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SeriesArg {
    Exp,
    Atan,
    SinCos,
}

impl From<SeriesArg> for SweepSeries {
    fn from(arg: SeriesArg) -> Self {
        match arg {
            SeriesArg::Exp => Self::Exp,
            SeriesArg::Atan => Self::Atan,
            SeriesArg::SinCos => Self::SinCos,
        }
    }
}

fn parse_point(text: &str) -> Result<BigRational, String> {
    let (numer, denom) = text.split_once('/').unwrap_or((text, "1"));
    let numer: BigInt = numer
        .trim()
        .parse()
        .map_err(|_| format!("invalid numerator in point '{text}'"))?;
    let denom: BigInt = denom
        .trim()
        .parse()
        .map_err(|_| format!("invalid denominator in point '{text}'"))?;
    if denom == BigInt::from(0) {
        return Err(format!("zero denominator in point '{text}'"));
    }
    Ok(BigRational::new(numer, denom))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Verify {
            bits,
            max_terms,
            series,
            point,
            tolerance,
            keep_going,
            parallel,
        } => {
            let point = match parse_point(&point) {
                Ok(point) => point,
                Err(message) => {
                    tracing::error!("{message}");
                    return ExitCode::FAILURE;
                }
            };
            let series = if series.is_empty() {
                SweepSeries::ALL.to_vec()
            } else {
                series.into_iter().map(SweepSeries::from).collect()
            };
            let config = SweepConfig {
                bits,
                max_terms,
                series,
                options: VerifyOptions {
                    point,
                    tolerance: BigRational::from_integer(BigInt::from(tolerance)),
                },
                fail_fast: !keep_going,
                parallel,
            };
            match run_sweep(&config) {
                Ok(report) if report.is_success() => {
                    tracing::info!(runs = report.passed.len(), "all checks passed");
                    ExitCode::SUCCESS
                }
                Ok(report) => {
                    tracing::error!(
                        passed = report.passed.len(),
                        failed = report.failures.len(),
                        "sweep found failures"
                    );
                    ExitCode::FAILURE
                }
                Err(err) => {
                    tracing::error!(%err, "sweep aborted");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Tables {
            series,
            bits,
            len,
            prefix,
        } => {
            let prefix = prefix.unwrap_or_else(|| match series {
                SeriesArg::Exp | SeriesArg::SinCos => "factorial_tab".to_string(),
                SeriesArg::Atan => "atan_tab".to_string(),
            });
            let table = match verified_table(series.into(), len, bits, &VerifyOptions::default())
            {
                Ok(table) => table,
                Err(err) => {
                    tracing::error!(%err, "table failed verification");
                    return ExitCode::FAILURE;
                }
            };
            match render_coefficient_tables(&prefix, &table) {
                Ok(rendered) => {
                    print!("{rendered}");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    tracing::error!(%err, "cannot render table");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fraction_and_integer_points() {
        assert_eq!(
            parse_point("1/16"),
            Ok(BigRational::new(BigInt::from(1), BigInt::from(16)))
        );
        assert_eq!(parse_point(" 3 "), Ok(BigRational::from_integer(BigInt::from(3))));
        assert!(parse_point("1/0").is_err());
        assert!(parse_point("x/2").is_err());
    }

    #[test]
    fn cli_defaults_match_reference_sweep() {
        let cli = Cli::parse_from(["taylor-verify", "verify"]);
        match cli.command {
            Command::Verify {
                bits,
                max_terms,
                keep_going,
                ..
            } => {
                assert_eq!(bits, vec![32, 64]);
                assert_eq!(max_terms, 300);
                assert!(!keep_going);
            }
            Command::Tables { .. } => unreachable!(),
        }
    }
}
