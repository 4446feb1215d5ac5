use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("unknown test variant '{0}' (expected 'mannwhitney' or 't-test')")]
    UnknownTestVariant(String),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Failures at the data source boundary. Propagated unchanged to the caller.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("{path} contains no data rows")]
    EmptyTable { path: PathBuf },
}
