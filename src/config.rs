//! Where the dataset comes from.
//!
//! An explicit path (command line or `JOB_INSIGHTS_DATASET`) is the only
//! candidate when given. Otherwise `filtered_dataset.csv` is looked up next
//! to the executable first, then in the working directory.

use std::path::{Path, PathBuf};

use crate::error::{InsightsError, Result};

pub const DATASET_FILE_NAME: &str = "filtered_dataset.csv";
pub const DATASET_ENV_VAR: &str = "JOB_INSIGHTS_DATASET";

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Explicit dataset path; disables the default search.
    pub dataset: Option<PathBuf>,
}

impl Config {
    /// Take the dataset path from `JOB_INSIGHTS_DATASET` when set.
    pub fn from_env() -> Self {
        let dataset = std::env::var_os(DATASET_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Config { dataset }
    }

    /// A path given on the command line wins over the environment.
    pub fn with_dataset(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.dataset = path;
        }
        self
    }

    /// Paths searched for the dataset, in order.
    pub fn candidate_paths(&self) -> Vec<PathBuf> {
        if let Some(path) = &self.dataset {
            return vec![path.clone()];
        }

        let mut candidates = Vec::new();
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            candidates.push(dir.join(DATASET_FILE_NAME));
        }
        candidates.push(PathBuf::from(DATASET_FILE_NAME));
        candidates
    }

    /// First candidate that exists on disk.
    pub fn locate_dataset(&self) -> Result<PathBuf> {
        locate(self.candidate_paths())
    }
}

fn locate(candidates: Vec<PathBuf>) -> Result<PathBuf> {
    match candidates.iter().find(|p| p.is_file()) {
        Some(found) => Ok(found.clone()),
        None => Err(InsightsError::DatasetNotFound {
            searched: candidates,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_is_the_only_candidate() {
        let config = Config::default().with_dataset(Some(PathBuf::from("/data/jobs.csv")));
        assert_eq!(config.candidate_paths(), vec![PathBuf::from("/data/jobs.csv")]);
    }

    #[test]
    fn default_search_ends_in_working_directory() {
        let candidates = Config::default().candidate_paths();
        assert_eq!(candidates.last(), Some(&PathBuf::from(DATASET_FILE_NAME)));
    }

    #[test]
    fn missing_everywhere_is_reported_with_searched_paths() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        let err = Config::default()
            .with_dataset(Some(missing.clone()))
            .locate_dataset()
            .unwrap_err();

        match err {
            InsightsError::DatasetNotFound { searched } => assert_eq!(searched, vec![missing]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn first_existing_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join(DATASET_FILE_NAME);
        std::fs::write(&present, "company_name,skill_required,location,ctc\n").unwrap();

        let found = locate(vec![dir.path().join("absent.csv"), present.clone()]).unwrap();
        assert_eq!(found, present);
    }
}
