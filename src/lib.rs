pub mod checks;
pub mod config;
mod error;
pub mod output;
pub mod process;
pub mod study;
mod telemetry;

pub use config::AcceptanceConfig;
pub use error::Error;
pub use output::{SimulatorOutput, TimeSeries, TsGeneratorOutput};
pub use process::{ProcessRun, SimulatorOptions, TsGeneratorTargets};
pub use study::StudyInput;
pub use telemetry::setup_logging;

/// Runs the time-series generator on a study and opens the thermal series it produced.
///
/// The return code is always reported. The output handler is only available when the generator
/// announced its thermal output folder in its logs; otherwise the lookup error is returned in its place
/// so that a scenario expecting a failure can still inspect the return code.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use antares_acceptance::{TsGeneratorTargets, generate_time_series};
///
/// let targets = TsGeneratorTargets { all_thermal: true, all_links: false };
/// let (run, output) = generate_time_series(
///     Path::new("/opt/antares/antares-ts-generator"),
///     Path::new("/data/studies/ts-generator/cluster1"),
///     targets,
/// )
/// .unwrap();
/// assert!(run.succeeded());
/// let ts = output.unwrap().generated_ts("fr", "base").unwrap().shape();
/// # let _ = ts;
/// ```
pub fn generate_time_series(
    generator: &std::path::Path,
    study: &std::path::Path,
    targets: TsGeneratorTargets,
) -> Result<(ProcessRun, Result<TsGeneratorOutput, Error>), Error> {
    let run = process::run_ts_generator(generator, study, targets)?;
    let output = run
        .output_folder(process::THERMAL_OUTPUT_MARKER)
        .map(TsGeneratorOutput::new);
    Ok((run, output))
}

/// Runs the simulator on a study and opens its output folder, see [`generate_time_series`].
pub fn simulate(
    solver: &std::path::Path,
    study: &std::path::Path,
    options: SimulatorOptions,
) -> Result<(ProcessRun, Result<SimulatorOutput, Error>), Error> {
    let run = process::run_simulator(solver, study, options)?;
    let output = run
        .output_folder(process::SIMULATOR_OUTPUT_MARKER)
        .map(SimulatorOutput::new);
    Ok((run, output))
}
