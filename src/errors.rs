use thiserror::Error;

/// Error type that captures common wallet failures.
///
/// Running out of a currency is not an error; it is reported through the
/// `on_insufficient` callback and the boolean result of a charge.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, WalletError>;
