use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::Error;
use crate::error::{csv_error, io_error, malformed};

/// Hourly result files start with 4 lines of metadata (the last one empty), then 3 header lines:
/// variable names, units and statistics.
const METADATA_LINES: usize = 4;
const NAME_LINE: usize = METADATA_LINES + 1;
const UNIT_LINE: usize = NAME_LINE + 1;
const STAT_LINE: usize = UNIT_LINE + 1;

/// Leading columns: area, index, day, month, hour.
const TIME_COLUMNS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLabel {
    pub name: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStamp {
    pub day: u32,
    pub month: String,
    pub hour: String,
}

impl TimeStamp {
    /// Matches a date written as `DD MON HH:MM`, e.g. `02 JAN 09:00`.
    pub fn matches(&self, date: &str) -> bool {
        let mut parts = date.split_whitespace();
        let (Some(day), Some(month), Some(hour), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        day.parse::<u32>().is_ok_and(|d| d == self.day)
            && month.eq_ignore_ascii_case(&self.month)
            && hour == self.hour
    }
}

/// One result file of the simulator, stored column by column.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTable {
    labels: Vec<ColumnLabel>,
    timestamps: Vec<TimeStamp>,
    columns: Vec<Vec<f64>>,
}

impl OutputTable {
    pub fn labels(&self) -> &[ColumnLabel] {
        &self.labels
    }

    pub fn timestamps(&self) -> &[TimeStamp] {
        &self.timestamps
    }

    /// First column called `name` (and, if given, expressed in `unit`).
    pub fn column(&self, name: &str, unit: Option<&str>) -> Option<&[f64]> {
        self.labels
            .iter()
            .position(|label| {
                label.name.eq_ignore_ascii_case(name)
                    && unit.is_none_or(|unit| label.unit.eq_ignore_ascii_case(unit))
            })
            .map(|index| self.columns[index].as_slice())
    }

    pub(crate) fn require_column(
        &self,
        path: &Path,
        name: &str,
        unit: Option<&str>,
    ) -> Result<&[f64], Error> {
        self.column(name, unit).ok_or_else(|| {
            let what = match unit {
                Some(unit) => format!("'{name}' ({unit})"),
                None => format!("'{name}'"),
            };
            malformed(path, NAME_LINE, format!("no column {what}"))
        })
    }

    pub fn row_at(&self, date: &str) -> Option<usize> {
        self.timestamps.iter().position(|ts| ts.matches(date))
    }
}

pub(crate) fn read_output_table(path: &Path) -> Result<OutputTable, Error> {
    let file = std::fs::File::open(path).map_err(|e| io_error(path, e))?;
    parse_output_table(file, path)
}

pub(crate) fn parse_output_table(reader: impl Read, path: &Path) -> Result<OutputTable, Error> {
    let mut reader = BufReader::new(reader);
    let mut skipped = String::new();
    for _ in 0..METADATA_LINES {
        skipped.clear();
        reader
            .read_line(&mut skipped)
            .map_err(|e| io_error(path, e))?;
    }

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut names: Vec<String> = Vec::new();
    let mut units: Vec<String> = Vec::new();
    let mut stats: Vec<String> = Vec::new();
    let mut timestamps = Vec::new();
    let mut columns: Vec<Vec<f64>> = Vec::new();

    // records are counted: the reader skips blank lines, so its positions cannot locate the headers
    for (index, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let line = NAME_LINE + index;
        let cells = || record.iter().skip(TIME_COLUMNS).map(str::to_string);

        match line {
            NAME_LINE => names = cells().collect(),
            UNIT_LINE => units = cells().collect(),
            STAT_LINE => {
                stats = cells().collect();
                let width = names.len().max(units.len()).max(stats.len());
                columns = vec![Vec::new(); width];
            }
            _ => {
                if record.iter().all(str::is_empty) {
                    continue;
                }
                if columns.is_empty() {
                    return Err(malformed(path, line, "data before header"));
                }
                timestamps.push(parse_timestamp(&record, path, line)?);

                let values: Vec<&str> = record.iter().skip(TIME_COLUMNS).collect();
                if values.len() < columns.len() {
                    return Err(malformed(
                        path,
                        line,
                        format!("{} values, expected {}", values.len(), columns.len()),
                    ));
                }
                for (column, raw) in columns.iter_mut().zip(values) {
                    column.push(parse_cell(raw, path, line)?);
                }
            }
        }
    }

    if columns.is_empty() {
        return Err(malformed(path, 0, "missing header lines"));
    }

    let label_at = |cells: &[String], i: usize| cells.get(i).cloned().unwrap_or_default();
    let labels = (0..columns.len())
        .map(|i| ColumnLabel {
            name: label_at(&names, i),
            unit: label_at(&units, i),
        })
        .collect();

    Ok(OutputTable {
        labels,
        timestamps,
        columns,
    })
}

fn parse_timestamp(record: &csv::StringRecord, path: &Path, line: usize) -> Result<TimeStamp, Error> {
    let field = |i: usize| record.get(i).unwrap_or_default();
    let day = field(2)
        .parse()
        .map_err(|_| malformed(path, line, format!("invalid day '{}'", field(2))))?;
    Ok(TimeStamp {
        day,
        month: field(3).to_string(),
        hour: field(4).to_string(),
    })
}

fn parse_cell(raw: &str, path: &Path, line: usize) -> Result<f64, Error> {
    if raw.eq_ignore_ascii_case("N/A") || raw == "-" {
        return Ok(f64::NAN);
    }
    raw.parse()
        .map_err(|_| malformed(path, line, format!("'{raw}' is not a number")))
}
