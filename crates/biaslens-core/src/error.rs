use crate::model::RecordStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read record store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Analysis not found: {0}")]
    NotFound(String),

    #[error("Analysis {id} is not ready for comparison (status: {status})")]
    ComparisonNotReady { id: String, status: RecordStatus },

    #[error("Analysis {id} was already resolved (status: {status})")]
    AlreadyResolved { id: String, status: RecordStatus },
}

pub type Result<T> = std::result::Result<T, Error>;
