use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::matrix::{TimeSeries, read_time_series};
use crate::Error;

/// Read access to the thermal time series written by the generator.
#[derive(Debug)]
pub struct TsGeneratorOutput {
    root: PathBuf,
    generated: HashMap<(String, String), TimeSeries>,
}

impl TsGeneratorOutput {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            generated: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Series generated for `cluster` of `area`, read from `<root>/<area>/<cluster>.txt` on first access.
    pub fn generated_ts(&mut self, area: &str, cluster: &str) -> Result<&TimeSeries, Error> {
        let key = (area.to_string(), cluster.to_string());
        if !self.generated.contains_key(&key) {
            let path = self.root.join(area).join(format!("{cluster}.txt"));
            let ts = read_time_series(&path)?;
            debug!(area, cluster, shape = ?ts.shape(), "parsed generated TS");
            self.generated.insert(key.clone(), ts);
        }
        Ok(&self.generated[&key])
    }
}
