use std::path::PathBuf;

use thiserror::Error;

use crate::profile::profileerror::ProfileError;

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error("directory walk failed: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("table has no header row")]
    EmptyTable,

    #[error("line {line}: expected {expected} values, found {found}")]
    MalformedRow { line: usize, expected: usize, found: usize },

    #[error("cannot find axis, candidates: {candidates:?}")]
    AxisNotFound { candidates: Vec<String> },

    #[error("no '{0}' column found")]
    DoseColumnMissing(String),

    #[error("directory name '{name}' is not a measurement date: {source}")]
    DirectoryDate { name: String, source: chrono::ParseError },

    #[error("{path}: no containing directory to date the measurement")]
    NoDirectory { path: PathBuf },

    #[error(transparent)]
    ProfileError(#[from] ProfileError)
}
