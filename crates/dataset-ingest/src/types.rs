use std::path::PathBuf;

use thiserror::Error;

/// Failure to read the dataset file. Always fatal at startup.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open dataset {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("dataset {source_name} is missing required columns: {}", missing.join(", "))]
    MissingColumns {
        source_name: String,
        missing: Vec<String>,
    },
    #[error("malformed CSV in {source_name}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
