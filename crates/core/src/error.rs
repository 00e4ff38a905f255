use thiserror::Error;

pub type AdsResult<T> = Result<T, AdsError>;

/// Failure to turn structured text into a record. Decoding is all-or-nothing:
/// on error no partially populated record is ever returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Failed to parse JSON: {0}")]
    ParseFailure(String),

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            // Well-formed JSON whose shape does not match the record.
            serde_json::error::Category::Data => DecodeError::InvalidField {
                field: "record",
                reason: err.to_string(),
            },
            _ => DecodeError::ParseFailure(err.to_string()),
        }
    }
}

/// Rejection of a raw confirmation type at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationTypeError {
    #[error("Confirmation type ordinal {0} is out of range")]
    OutOfRange(u8),

    #[error("Unknown confirmation type '{0}'")]
    Unknown(String),
}

/// Catalog payload validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Unsupported catalog version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Missing {0}")]
    MissingId(&'static str),

    #[error("Duplicate creative set id '{0}'")]
    DuplicateCreativeSet(String),

    #[error("Campaign '{0}' ends before it starts")]
    InvalidDateRange(String),
}

#[derive(Error, Debug)]
pub enum AdsError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Confirmation type error: {0}")]
    ConfirmationType(#[from] ConfirmationTypeError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
