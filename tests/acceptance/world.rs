use std::path::PathBuf;

use anyhow::{Context, anyhow};
use antares_acceptance::output::{remove_output_folder, replace_output};
use antares_acceptance::{
    AcceptanceConfig, Error, ProcessRun, SimulatorOutput, StudyInput, TsGeneratorOutput,
};
use cucumber::World;
use tracing::{info, warn};

/// State of one scenario: which study it targets and what the last run produced.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct AntaresWorld {
    pub config: AcceptanceConfig,
    study: Option<StudyInput>,
    return_code: Option<i32>,
    simulator_output: Option<SimulatorOutput>,
    ts_generator_output: Option<TsGeneratorOutput>,
    // why the last run has no output handler
    missing_output: Option<String>,
    nb_years: Option<u32>,
}

impl AntaresWorld {
    fn new() -> Self {
        let config = AcceptanceConfig::from_env()
            .expect("the runner only starts scenarios once the configuration is valid");
        Self {
            config,
            study: None,
            return_code: None,
            simulator_output: None,
            ts_generator_output: None,
            missing_output: None,
            nb_years: None,
        }
    }

    pub fn set_study(&mut self, relative: &str) {
        let path = self.config.study_path(relative);
        info!(study = %path.display(), "study selected");
        self.study = Some(StudyInput::new(path));
        self.nb_years = None;
    }

    pub fn study(&mut self) -> anyhow::Result<&mut StudyInput> {
        self.study
            .as_mut()
            .ok_or_else(|| anyhow!("no study selected, start the scenario with 'the study path is ...'"))
    }

    pub fn study_path(&mut self) -> anyhow::Result<PathBuf> {
        Ok(self.study()?.study_path().to_path_buf())
    }

    pub fn nb_years(&mut self) -> anyhow::Result<u32> {
        if let Some(n) = self.nb_years {
            return Ok(n);
        }
        let n = self.study()?.nb_years()?;
        self.nb_years = Some(n);
        Ok(n)
    }

    pub fn return_code(&self) -> anyhow::Result<i32> {
        self.return_code
            .ok_or_else(|| anyhow!("nothing has been run in this scenario"))
    }

    pub fn simulator_output(&mut self) -> anyhow::Result<&mut SimulatorOutput> {
        match &mut self.simulator_output {
            Some(output) => Ok(output),
            None => Err(no_output("simulator", &self.missing_output)),
        }
    }

    pub fn ts_generator_output(&mut self) -> anyhow::Result<&mut TsGeneratorOutput> {
        match &mut self.ts_generator_output {
            Some(output) => Ok(output),
            None => Err(no_output("time-series generator", &self.missing_output)),
        }
    }

    pub fn record_simulation(
        &mut self,
        run: &ProcessRun,
        output: Result<SimulatorOutput, Error>,
    ) -> anyhow::Result<()> {
        self.record_run(run);
        let output = self.accept_output(run, output)?;
        if let Err(e) = replace_output(&mut self.simulator_output, output, self.config.keep_outputs) {
            warn!("failed to remove the output of the previous run: {e}");
        }
        Ok(())
    }

    pub fn record_ts_generation(
        &mut self,
        run: &ProcessRun,
        output: Result<TsGeneratorOutput, Error>,
    ) -> anyhow::Result<()> {
        self.record_run(run);
        let output = self.accept_output(run, output)?;
        if let Err(e) = replace_output(&mut self.ts_generator_output, output, self.config.keep_outputs) {
            warn!("failed to remove the output of the previous run: {e}");
        }
        Ok(())
    }

    fn record_run(&mut self, run: &ProcessRun) {
        self.return_code = Some(run.return_code);
        self.missing_output = None;
    }

    // A successful run must announce its output folder; a failed one may not.
    fn accept_output<T>(
        &mut self,
        run: &ProcessRun,
        output: Result<T, Error>,
    ) -> anyhow::Result<Option<T>> {
        match output {
            Ok(output) => Ok(Some(output)),
            Err(e) if run.succeeded() => Err(e).context("the run succeeded but left no output folder"),
            Err(e) => {
                warn!(return_code = run.return_code, "{e}");
                self.missing_output = Some(e.to_string());
                Ok(None)
            }
        }
    }
}

fn no_output(producer: &str, missing_output: &Option<String>) -> anyhow::Error {
    match missing_output {
        Some(reason) => anyhow!("no {producer} output available: {reason}"),
        None => anyhow!("no {producer} output available, run it first"),
    }
}

impl Drop for AntaresWorld {
    fn drop(&mut self) {
        if self.config.keep_outputs {
            return;
        }
        let simulator = self.simulator_output.as_ref().map(SimulatorOutput::root);
        let generator = self.ts_generator_output.as_ref().map(TsGeneratorOutput::root);
        for folder in simulator.into_iter().chain(generator) {
            if let Err(e) = remove_output_folder(folder) {
                warn!("failed to remove output: {e}");
            }
        }
    }
}
