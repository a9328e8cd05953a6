use std::path::PathBuf;

use thiserror::Error;

/// Errors the pipeline reports to its caller.
#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("dataset file not found; searched: {}", display_paths(.searched))]
    DatasetNotFound { searched: Vec<PathBuf> },

    #[error("unsupported dataset format: .{0}")]
    UnsupportedFormat(String),

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("unknown view: {0}")]
    UnknownView(String),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, InsightsError>;
