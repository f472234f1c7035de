//! Module reading the few input values of a study that scenarios need, e.g. the unit count of a thermal cluster.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::Error;
use crate::error::{io_error, malformed};

mod ini;


pub use ini::IniDocument;

const GENERAL_DATA: &str = "settings/generaldata.ini";

/// Lazily parsed view over the INI files of one study.
#[derive(Debug)]
pub struct StudyInput {
    study_path: PathBuf,
    documents: HashMap<PathBuf, IniDocument>,
}

impl StudyInput {
    pub fn new(study_path: impl Into<PathBuf>) -> Self {
        Self {
            study_path: study_path.into(),
            documents: HashMap::new(),
        }
    }

    pub fn study_path(&self) -> &Path {
        &self.study_path
    }

    /// Returns the raw value of `key` in `[section]` of the `/`-separated `relative_file`.
    pub fn get_input(
        &mut self,
        relative_file: &str,
        section: &str,
        key: &str,
    ) -> Result<&str, Error> {
        let path = relative_file
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.study_path.clone(), |path, part| path.join(part));

        if !self.documents.contains_key(&path) {
            let text = std::fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
            let document = IniDocument::parse(&text).map_err(|(line, msg)| malformed(&path, line, msg))?;
            self.documents.insert(path.clone(), document);
        }

        self.documents[&path]
            .get(section, key)
            .ok_or_else(|| Error::MissingInput {
                file: path.clone(),
                section: section.to_string(),
                key: key.to_string(),
            })
    }

    pub fn nb_years(&mut self) -> Result<u32, Error> {
        self.parsed_input(GENERAL_DATA, "general", "nbyears")
    }

    pub fn cluster_unit_count(&mut self, area: &str, cluster: &str) -> Result<u32, Error> {
        self.parsed_input(&cluster_list(area), cluster, "unitcount")
    }

    pub fn cluster_nominal_capacity(&mut self, area: &str, cluster: &str) -> Result<f64, Error> {
        self.parsed_input(&cluster_list(area), cluster, "nominalcapacity")
    }

    fn parsed_input<T: std::str::FromStr>(
        &mut self,
        relative_file: &str,
        section: &str,
        key: &str,
    ) -> Result<T, Error> {
        let study_path = self.study_path.clone();
        let raw = self.get_input(relative_file, section, key)?;
        raw.parse().map_err(|_| {
            malformed(
                study_path.join(relative_file),
                0,
                format!("[{section}] {key} = '{raw}' is not a valid value"),
            )
        })
    }
}

fn cluster_list(area: &str) -> String {
    format!("thermal/clusters/{area}/list.ini")
}
