use thiserror::Error;

#[derive(Error, Debug)]
pub enum RfmError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid bin count: expected 3..=7, got {bins}")]
    InvalidBins { bins: u8 },

    #[error("Invalid config field '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Unknown segment '{label}'")]
    UnknownSegment { label: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type RfmResult<T> = Result<T, RfmError>;
