use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row did not have enough fields to reach a required column.
    #[error("{}, line {line}: expected at least {expected} fields, found {found}", .path.display())]
    SchemaAssumption {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No UMLS MRCONSO file found in or under {}", .dir.display())]
    NoInputFiles { dir: PathBuf },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
