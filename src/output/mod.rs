//! Module parsing what the external binaries write to disk: generated time series and simulation results.

use std::path::Path;

use tracing::info;

use crate::Error;
use crate::error::io_error;

mod matrix;
mod simulator;
mod table;
mod ts_generator;


pub use matrix::TimeSeries;
pub use simulator::{AnnualSystemCost, SimulatorOutput};
pub use table::{ColumnLabel, OutputTable, TimeStamp};
pub use ts_generator::TsGeneratorOutput;

/// Handler over the folder one run of an external binary wrote to.
pub trait OutputFolder {
    fn root(&self) -> &Path;
}

impl OutputFolder for SimulatorOutput {
    fn root(&self) -> &Path {
        SimulatorOutput::root(self)
    }
}

impl OutputFolder for TsGeneratorOutput {
    fn root(&self) -> &Path {
        TsGeneratorOutput::root(self)
    }
}

pub fn remove_output_folder(folder: &Path) -> Result<(), Error> {
    std::fs::remove_dir_all(folder).map_err(|e| io_error(folder, e))?;
    info!(folder = %folder.display(), "output removed");
    Ok(())
}

/// Stores `next` in `slot`. The folder of the output it replaces is removed unless `keep` is set
/// or both outputs share it.
pub fn replace_output<T: OutputFolder>(
    slot: &mut Option<T>,
    next: Option<T>,
    keep: bool,
) -> Result<(), Error> {
    let replaced = std::mem::replace(slot, next);
    match replaced {
        Some(old) if !keep && slot.as_ref().map(OutputFolder::root) != Some(old.root()) => {
            remove_output_folder(old.root())
        }
        _ => Ok(()),
    }
}
