use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuickAddError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown {kind}: {value}")]
    Unknown { kind: &'static str, value: String },
}
