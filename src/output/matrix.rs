use std::io::Read;
use std::path::Path;

use crate::Error;
use crate::error::{csv_error, io_error, malformed};

/// Headerless numeric matrix: one row per time step, one column per series.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    n_rows: usize,
    n_cols: usize,
    // row-major
    values: Vec<f64>,
}

impl TimeSeries {
    /// Builds a matrix from rows of equal width.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, String> {
        let n_cols = rows.first().map_or(0, Vec::len);
        if let Some(index) = rows.iter().position(|row| row.len() != n_cols) {
            return Err(format!(
                "row {} has {} values, expected {n_cols}",
                index + 1,
                rows[index].len()
            ));
        }
        Ok(Self {
            n_rows: rows.len(),
            n_cols,
            values: rows.into_iter().flatten().collect(),
        })
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    pub fn column(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.values
            .iter()
            .skip(index)
            .step_by(self.n_cols.max(1))
            .copied()
            .take(if index < self.n_cols { self.n_rows } else { 0 })
    }

    /// Arithmetic mean of a column, NaN when the matrix has no rows.
    pub fn column_mean(&self, index: usize) -> f64 {
        self.column(index).sum::<f64>() / self.n_rows as f64
    }

    pub fn column_means(&self) -> Vec<f64> {
        (0..self.n_cols).map(|i| self.column_mean(i)).collect()
    }
}

pub(crate) fn read_time_series(path: &Path) -> Result<TimeSeries, Error> {
    let file = std::fs::File::open(path).map_err(|e| io_error(path, e))?;
    parse_time_series(file, path)
}

/// Parses tab-separated values; `path` is only used to label errors.
pub(crate) fn parse_time_series(reader: impl Read, path: &Path) -> Result<TimeSeries, Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut width: Option<usize> = None;
    for result in csv_reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let line = record.position().map_or(0, |p| p.line() as usize);

        // writers may leave a trailing separator
        let fields: Vec<&str> = {
            let mut fields: Vec<&str> = record.iter().collect();
            while fields.last().is_some_and(|f| f.is_empty()) {
                fields.pop();
            }
            fields
        };
        if fields.is_empty() {
            continue;
        }

        let row = fields
            .iter()
            .map(|field| {
                field
                    .parse::<f64>()
                    .map_err(|_| malformed(path, line, format!("'{field}' is not a number")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match width {
            None => width = Some(row.len()),
            Some(expected) if expected != row.len() => {
                return Err(malformed(
                    path,
                    line,
                    format!("{} values, expected {expected}", row.len()),
                ));
            }
            Some(_) => {}
        }
        rows.push(row);
    }

    TimeSeries::from_rows(rows).map_err(|msg| malformed(path, 0, msg))
}
