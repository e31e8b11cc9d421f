use thiserror::Error;

#[derive(Error, Debug)]
pub enum TeamForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    /// The caller broke a precondition of the request (rejected before any search).
    #[error("Invalid Request: {0}")]
    Contract(String),
}

pub type TfResult<T> = Result<T, TeamForgeError>;
