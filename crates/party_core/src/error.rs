use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Insufficient pool: {required} characters required, {available} available")]
    InsufficientPool { required: usize, available: usize },

    #[error("Unsupported party size: {0} (expected 4 or 8)")]
    UnsupportedPartySize(usize),

    #[error("Invalid slot index {index} for squad of size {size}")]
    InvalidSlot { index: usize, size: usize },

    #[error("Invalid squad index {index} for party of {count} squad(s)")]
    InvalidSquad { index: usize, count: usize },

    #[error("Reference table error: {0}")]
    TableLoad(String),
}

impl EngineError {
    /// Stable error code used by the JSON boundary.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InsufficientPool { .. } => "INSUFFICIENT_POOL",
            EngineError::UnsupportedPartySize(_) => "UNSUPPORTED_PARTY_SIZE",
            EngineError::InvalidSlot { .. } => "INVALID_SLOT",
            EngineError::InvalidSquad { .. } => "INVALID_SQUAD",
            EngineError::TableLoad(_) => "TABLE_LOAD",
        }
    }
}

impl From<serde_yaml::Error> for EngineError {
    fn from(err: serde_yaml::Error) -> Self {
        EngineError::TableLoad(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
