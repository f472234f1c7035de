//! Module holding the numeric checks scenarios make against the outputs.
//!
//! Every check returns `Ok(())` on success and an [`Error::Check`] describing the mismatch otherwise,
//! so that step definitions only have to propagate it.

use std::fmt;
use std::str::FromStr;

use crate::Error;
use crate::error::check_failed;
use crate::output::TimeSeries;


/// Hours in a non-leap year, i.e. the expected length of a generated series.
pub const HOURS_PER_YEAR: usize = 8760;

/// Relative tolerance accepted between the expected and the observed average available power.
pub const OUTAGE_STATS_TOLERANCE: f64 = 0.15;

/// Absolute slack of the "equal to" comparator.
const EQUALITY_EPSILON: f64 = 1e-6;

/// Checks `|actual - expected| <= relative_tolerance * max(|expected|, 1e-6)`.
pub fn assert_double_close(expected: f64, actual: f64, relative_tolerance: f64) -> Result<(), Error> {
    let scale = expected.abs().max(1e-6);
    let relative_gap = (actual - expected).abs() / scale;
    if relative_gap <= relative_tolerance {
        Ok(())
    } else {
        Err(check_failed(format!(
            "expected {expected}, got {actual} (relative gap {relative_gap:.6} > {relative_tolerance})"
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparison {
    GreaterThan(f64),
    EqualTo(f64),
}

/// Per-hour bound written in plain words, e.g. `zero or greater than 150`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyComparator {
    pub comparison: Comparison,
    /// Zero is accepted regardless of the comparison
    pub or_zero: bool,
}

impl HourlyComparator {
    pub fn accepts(&self, value: f64) -> bool {
        let ok = match self.comparison {
            Comparison::GreaterThan(bound) => value >= bound,
            Comparison::EqualTo(target) => (value - target).abs() <= EQUALITY_EPSILON,
        };
        ok || (self.or_zero && value == 0.0)
    }
}

impl FromStr for HourlyComparator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || Error::NotImplemented(format!("Unknown comparator '{s}'"));

        let text = s.trim();
        let (or_zero, text) = match text.strip_prefix("zero or ") {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let (kind, value) = text.rsplit_once(' ').ok_or_else(unknown)?;
        let value: f64 = value.parse().map_err(|_| unknown())?;
        let comparison = match kind.trim() {
            "greater than" => Comparison::GreaterThan(value),
            "equal to" => Comparison::EqualTo(value),
            _ => return Err(unknown()),
        };

        Ok(Self {
            comparison,
            or_zero,
        })
    }
}

impl fmt::Display for HourlyComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.or_zero {
            write!(f, "zero or ")?;
        }
        match self.comparison {
            Comparison::GreaterThan(bound) => write!(f, "greater than {bound}"),
            Comparison::EqualTo(target) => write!(f, "equal to {target}"),
        }
    }
}

/// Every hourly value must satisfy the comparator.
pub fn check_hourly(values: &[f64], comparator: &HourlyComparator) -> Result<(), Error> {
    match values.iter().position(|&v| !comparator.accepts(v)) {
        None => Ok(()),
        Some(hour) => Err(check_failed(format!(
            "hour {}: {} is not {comparator}",
            hour + 1,
            values[hour]
        ))),
    }
}

/// Average available power of a cluster whose units suffer forced (`fo_pct`) and planned (`po_pct`) outages.
///
/// `n_units * max_p * (1 - fo) * (1 - po) / (1 - fo * po)`; zero when both rates are 100%.
pub fn expected_average_power(n_units: u32, max_p_per_unit: f64, fo_pct: f64, po_pct: f64) -> f64 {
    let fo = fo_pct / 100.0;
    let po = po_pct / 100.0;
    let denominator = 1.0 - fo * po;
    if denominator == 0.0 {
        return 0.0;
    }
    f64::from(n_units) * max_p_per_unit * (1.0 - fo) * (1.0 - po) / denominator
}

/// A year of hourly values for each of the `n_ts` generated series.
pub fn check_ts_shape(ts: &TimeSeries, n_ts: usize) -> Result<(), Error> {
    let (n_lines, n_cols) = ts.shape();
    if n_lines != HOURS_PER_YEAR {
        return Err(check_failed(format!(
            "Number of generated timesteps is {n_lines} (expected {HOURS_PER_YEAR})"
        )));
    }
    if n_cols != n_ts {
        return Err(check_failed(format!(
            "Number of generated TS is {n_cols} (expected {n_ts})"
        )));
    }
    Ok(())
}

/// The mean of every generated series must be close to `expected_av_power`.
pub fn check_ts_outage_stats(
    ts: &TimeSeries,
    expected_av_power: f64,
    relative_tolerance: f64,
) -> Result<(), Error> {
    let (n_lines, n_cols) = ts.shape();
    if n_lines == 0 || n_cols == 0 {
        return Err(check_failed(format!(
            "no generated values to check ({n_lines} timesteps, {n_cols} TS)"
        )));
    }
    for (index, mean) in ts.column_means().into_iter().enumerate() {
        assert_double_close(expected_av_power, mean, relative_tolerance)
            .map_err(|e| match e {
                Error::Check(msg) => check_failed(format!("TS {}: {msg}", index + 1)),
                other => other,
            })?;
    }
    Ok(())
}

/// Each hour, production must lie within `[nodu * min_p, nodu * max_p]`.
pub fn check_pmin_pmax(
    production: &[f64],
    dispatched_units: &[f64],
    min_p: f64,
    max_p: f64,
) -> Result<(), Error> {
    if production.len() != dispatched_units.len() {
        return Err(check_failed(format!(
            "{} production values but {} dispatched unit counts",
            production.len(),
            dispatched_units.len()
        )));
    }
    for (hour, (&prod, &nodu)) in production.iter().zip(dispatched_units).enumerate() {
        if prod > nodu * max_p {
            return Err(check_failed(format!(
                "max_p constraint not respected at hour {}: {prod} > {nodu} x {max_p}",
                hour + 1
            )));
        }
        if prod < nodu * min_p {
            return Err(check_failed(format!(
                "min_p constraint not respected at hour {}: {prod} < {nodu} x {min_p}",
                hour + 1
            )));
        }
    }
    Ok(())
}
