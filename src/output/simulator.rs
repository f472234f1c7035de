use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::table::{OutputTable, read_output_table};
use crate::Error;
use crate::error::{csv_error, io_error, malformed};

const ANNUAL_SYSTEM_COST: &str = "annualSystemCost.txt";
const TIME_MEASUREMENT: &str = "time_measurement.txt";
const VALUES_HOURLY: &str = "values-hourly.txt";
const DETAILS_HOURLY: &str = "details-hourly.txt";
const SIMULATION_MODES: [&str; 2] = ["economy", "adequacy"];

const LOSS_OF_LOAD_DURATION: &str = "LOLD";
const UNSUPPLIED_ENERGY: &str = "UNSP. ENRG";
const NON_PROPORTIONAL_COST: &str = "NP COST";
const PRODUCTION_UNIT: &str = "MWh";
const DISPATCHED_UNITS_UNIT: &str = "NODU";

/// Statistics of the annual system cost over all Monte-Carlo years.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnualSystemCost {
    pub exp: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

// Intermediate type mirroring the rows of the timing file
#[derive(Deserialize)]
struct RawTiming {
    item: String,
    duration_ms: f64,
    _occurrences: u64,
}

/// Read access to one output folder of the simulator.
#[derive(Debug)]
pub struct SimulatorOutput {
    root: PathBuf,
    tables: HashMap<(String, u32, &'static str), (PathBuf, OutputTable)>,
}

impl SimulatorOutput {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tables: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn annual_system_cost(&self) -> Result<AnnualSystemCost, Error> {
        let path = self.root.join(ANNUAL_SYSTEM_COST);
        let text = std::fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        parse_annual_system_cost(&text, &path)
    }

    /// Total duration of the simulation in seconds.
    pub fn simu_time(&self) -> Result<f64, Error> {
        let path = self.root.join(TIME_MEASUREMENT);
        let file = std::fs::File::open(&path).map_err(|e| io_error(&path, e))?;
        parse_total_time(file, &path)
    }

    pub fn loss_of_load_duration_h(&mut self, area: &str, year: u32) -> Result<u32, Error> {
        let hours: f64 = self
            .column(area, year, VALUES_HOURLY, LOSS_OF_LOAD_DURATION, None)?
            .iter()
            .sum();
        Ok(hours.round() as u32)
    }

    /// Unsupplied energy during the hour written as `DD MON HH:MM`.
    pub fn unsupplied_energy_mwh(&mut self, area: &str, year: u32, date: &str) -> Result<f64, Error> {
        let (path, table) = self.table(area, year, VALUES_HOURLY)?;
        let column = table.require_column(path, UNSUPPLIED_ENERGY, None)?;
        let row = table
            .row_at(date)
            .ok_or_else(|| malformed(path, 0, format!("no hour matching '{date}'")))?;
        Ok(column[row])
    }

    pub fn hourly_prod_mwh(&mut self, area: &str, year: u32, cluster: &str) -> Result<Vec<f64>, Error> {
        self.column(area, year, DETAILS_HOURLY, cluster, Some(PRODUCTION_UNIT))
            .map(<[f64]>::to_vec)
    }

    pub fn hourly_n_dispatched_units(
        &mut self,
        area: &str,
        year: u32,
        cluster: &str,
    ) -> Result<Vec<f64>, Error> {
        self.column(area, year, DETAILS_HOURLY, cluster, Some(DISPATCHED_UNITS_UNIT))
            .map(<[f64]>::to_vec)
    }

    pub fn non_proportional_cost(&mut self, area: &str, year: u32) -> Result<f64, Error> {
        Ok(self
            .column(area, year, VALUES_HOURLY, NON_PROPORTIONAL_COST, None)?
            .iter()
            .sum())
    }

    fn column(
        &mut self,
        area: &str,
        year: u32,
        file: &'static str,
        name: &str,
        unit: Option<&str>,
    ) -> Result<&[f64], Error> {
        let (path, table) = self.table(area, year, file)?;
        table.require_column(path, name, unit)
    }

    fn table(
        &mut self,
        area: &str,
        year: u32,
        file: &'static str,
    ) -> Result<(&Path, &OutputTable), Error> {
        let key = (area.to_lowercase(), year, file);
        if !self.tables.contains_key(&key) {
            let path = self.year_folder(&key.0, year).join(file);
            let table = read_output_table(&path)?;
            debug!(area, year, file, rows = table.timestamps().len(), "parsed simulator output");
            self.tables.insert(key.clone(), (path, table));
        }
        let (path, table) = &self.tables[&key];
        Ok((path.as_path(), table))
    }

    // the first existing `<mode>/mc-ind/<year>/areas/<area>`, economy when none exists
    fn year_folder(&self, area: &str, year: u32) -> PathBuf {
        let candidates: Vec<PathBuf> = SIMULATION_MODES
            .iter()
            .map(|mode| {
                self.root
                    .join(mode)
                    .join("mc-ind")
                    .join(format!("{year:05}"))
                    .join("areas")
                    .join(area)
            })
            .collect();
        candidates
            .iter()
            .find(|path| path.is_dir())
            .unwrap_or(&candidates[0])
            .clone()
    }
}

pub(crate) fn parse_annual_system_cost(text: &str, path: &Path) -> Result<AnnualSystemCost, Error> {
    let mut values: HashMap<&str, f64> = HashMap::new();
    for (index, line) in text.lines().enumerate() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if !matches!(key, "EXP" | "STD" | "MIN" | "MAX") {
            continue;
        }
        let value = value
            .trim()
            .parse()
            .map_err(|_| malformed(path, index + 1, format!("invalid {key} value '{}'", value.trim())))?;
        values.insert(key, value);
    }

    let get = |key: &str| {
        values
            .get(key)
            .copied()
            .ok_or_else(|| malformed(path, 0, format!("missing {key} entry")))
    };
    Ok(AnnualSystemCost {
        exp: get("EXP")?,
        std: get("STD")?,
        min: get("MIN")?,
        max: get("MAX")?,
    })
}

pub(crate) fn parse_total_time(reader: impl std::io::Read, path: &Path) -> Result<f64, Error> {
    let csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    for result in csv_reader.into_deserialize::<RawTiming>() {
        let timing = result.map_err(|e| csv_error(path, e))?;
        if timing.item == "total" {
            return Ok(timing.duration_ms / 1000.0);
        }
    }
    Err(malformed(path, 0, "no 'total' timing"))
}
