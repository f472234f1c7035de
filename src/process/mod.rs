//! Module driving the external binaries: building their command lines, running them to completion
//! and locating the folder they wrote their results into.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::Error;
use crate::error::malformed;


/// Log line prefix announcing the simulator's output folder
pub const SIMULATOR_OUTPUT_MARKER: &str = "Output folder : ";

/// Log line prefix announcing where the generator wrote the thermal time series
pub const THERMAL_OUTPUT_MARKER: &str = "Thermal output folder : ";

const PARALLEL_JOBS: &str = "4";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulatorOptions {
    pub named_mps_problems: bool,
    pub parallel: bool,
}

/// Which time series the generator is asked to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TsGeneratorTargets {
    pub all_thermal: bool,
    pub all_links: bool,
}

/// A fully built command line, ready to be run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
    discard_stderr: bool,
}

impl Invocation {
    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Spawns the process and waits for it to exit, capturing its standard output.
    pub fn run(&self) -> Result<ProcessRun, Error> {
        info!("Running command: {self}");
        let stderr = if self.discard_stderr {
            Stdio::null()
        } else {
            Stdio::inherit()
        };

        let started = Instant::now();
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stderr(stderr)
            .output()
            .map_err(|source| Error::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let elapsed = started.elapsed();

        // killed by a signal: no exit code
        let return_code = output.status.code().unwrap_or(-1);
        info!(return_code, elapsed_ms = elapsed.as_millis() as u64, "process finished");
        debug!("stdout:\n{}", String::from_utf8_lossy(&output.stdout));

        Ok(ProcessRun {
            return_code,
            stdout: output.stdout,
            elapsed,
        })
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// What a finished process left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRun {
    pub return_code: i32,
    pub stdout: Vec<u8>,
    pub elapsed: Duration,
}

impl ProcessRun {
    pub fn succeeded(&self) -> bool {
        self.return_code == 0
    }

    pub fn output_folder(&self, marker: &'static str) -> Result<PathBuf, Error> {
        find_output_folder(&self.stdout, marker)
    }
}

/// `<solver> -i <study> [--named-mps-problems] [--force-parallel 4]`
pub fn simulator_command(solver: &Path, study: &Path, options: SimulatorOptions) -> Invocation {
    let mut args: Vec<OsString> = vec!["-i".into(), study.into()];
    if options.named_mps_problems {
        args.push("--named-mps-problems".into());
    }
    if options.parallel {
        args.push("--force-parallel".into());
        args.push(PARALLEL_JOBS.into());
    }
    Invocation {
        program: solver.to_path_buf(),
        args,
        discard_stderr: false,
    }
}

/// `<generator> [--all-thermal] [--all-links] <study>`: the study path always comes last.
pub fn ts_generator_command(
    generator: &Path,
    study: &Path,
    targets: TsGeneratorTargets,
) -> Invocation {
    let mut args: Vec<OsString> = Vec::new();
    if targets.all_thermal {
        args.push("--all-thermal".into());
    }
    if targets.all_links {
        args.push("--all-links".into());
    }
    args.push(study.into());
    Invocation {
        program: generator.to_path_buf(),
        args,
        discard_stderr: true,
    }
}

pub fn run_simulator(
    solver: &Path,
    study: &Path,
    options: SimulatorOptions,
) -> Result<ProcessRun, Error> {
    simulator_command(solver, study, options).run()
}

pub fn run_ts_generator(
    generator: &Path,
    study: &Path,
    targets: TsGeneratorTargets,
) -> Result<ProcessRun, Error> {
    ts_generator_command(generator, study, targets).run()
}

/// Returns the text following `marker` on the first log line containing it.
pub fn find_output_folder(logs: &[u8], marker: &'static str) -> Result<PathBuf, Error> {
    let needle = marker.as_bytes();
    for (index, line) in logs.split(|&b| b == b'\n').enumerate() {
        let Some(start) = line
            .windows(needle.len())
            .position(|window| window == needle)
        else {
            continue;
        };
        let rest = &line[start + needle.len()..];
        if !rest.is_ascii() {
            return Err(malformed(
                "<process stdout>",
                index + 1,
                "output folder path is not ASCII",
            ));
        }
        let folder = String::from_utf8_lossy(rest);
        return Ok(PathBuf::from(folder.trim_end_matches('\r')));
    }
    Err(Error::OutputFolderNotFound { marker })
}
