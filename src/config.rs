//! Harness configuration, read from the environment.

use std::path::{Path, PathBuf};

use crate::Error;

pub const RESOURCES_PATH_VAR: &str = "ANTARES_RESOURCES_PATH";
pub const SOLVER_VAR: &str = "ANTARES_SOLVER";
pub const TS_GENERATOR_VAR: &str = "ANTARES_TS_GENERATOR";
pub const KEEP_OUTPUTS_VAR: &str = "ANTARES_KEEP_OUTPUTS";
pub const FEATURES_PATH_VAR: &str = "ANTARES_FEATURES_PATH";

/// Where the test studies live and which binaries to drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptanceConfig {
    pub resources_path: PathBuf,
    pub solver: Option<PathBuf>,
    pub ts_generator: Option<PathBuf>,
    /// Leave the output folders on disk once a scenario is over
    pub keep_outputs: bool,
    /// Folder holding the `.feature` files, if not the suite's own
    pub features_path: Option<PathBuf>,
}

impl AcceptanceConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let resources_path = non_empty(RESOURCES_PATH_VAR)
            .map(PathBuf::from)
            .ok_or_else(|| Error::Config(format!("{RESOURCES_PATH_VAR} is not set")))?;

        let keep_outputs = match non_empty(KEEP_OUTPUTS_VAR).as_deref() {
            None | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(Error::Config(format!(
                    "{KEEP_OUTPUTS_VAR} must be a boolean, got '{other}'"
                )));
            }
        };

        Ok(Self {
            resources_path,
            solver: non_empty(SOLVER_VAR).map(PathBuf::from),
            ts_generator: non_empty(TS_GENERATOR_VAR).map(PathBuf::from),
            keep_outputs,
            features_path: non_empty(FEATURES_PATH_VAR).map(PathBuf::from),
        })
    }

    /// Resolves a `/`-separated study path relative to the resources folder.
    pub fn study_path(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.resources_path.clone(), |path, part| path.join(part))
    }

    pub fn solver(&self) -> Result<&Path, Error> {
        self.solver
            .as_deref()
            .ok_or_else(|| Error::Config(format!("{SOLVER_VAR} is not set")))
    }

    pub fn ts_generator(&self) -> Result<&Path, Error> {
        self.ts_generator
            .as_deref()
            .ok_or_else(|| Error::Config(format!("{TS_GENERATOR_VAR} is not set")))
    }
}
