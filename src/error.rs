// Error kinds for the ETL run
// Every variant is fatal to the run; malformed table rows never reach here.

use thiserror::Error;

pub type EtlResult<T> = Result<T, EtlError>;

#[derive(Debug, Error)]
pub enum EtlError {
    /// Network or HTTP failure retrieving a source document
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Missing table or markup that cannot be scraped at all
    #[error("parse failed: {0}")]
    Parse(String),

    /// Missing/invalid rate, bad table name, unreadable config file
    #[error("configuration error: {0}")]
    Config(String),

    /// Database unavailable or write failure
    #[error("store error: {0}")]
    Store(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<rusqlite::Error> for EtlError {
    fn from(err: rusqlite::Error) -> Self {
        EtlError::Store(err.to_string())
    }
}

impl From<reqwest::Error> for EtlError {
    fn from(err: reqwest::Error) -> Self {
        EtlError::Fetch(err.to_string())
    }
}

impl EtlError {
    pub fn is_config(&self) -> bool {
        matches!(self, EtlError::Config(_))
    }
}
