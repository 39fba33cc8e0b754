use thiserror::Error;

/// Reasons a raw record cannot be turned into a typed message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown subtype: {0}")]
    UnknownSubtype(String),

    #[error("unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("unknown accessory type: {0}")]
    UnknownAccessoryType(String),

    #[error("unknown rich text element type: {0}")]
    UnknownElementType(String),

    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("no non-empty name found")]
    NoDisplayName,

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("field {field} is not a {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("rich text nested deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("unrecognized message kind: neither a user message nor a files message")]
    UnrecognizedMessage,

    #[error("day log is not an array of records")]
    NotAnArray,

    #[error("record {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    pub fn wrong_type(field: &str, expected: &'static str) -> Self {
        DecodeError::WrongType {
            field: field.to_string(),
            expected,
        }
    }

    pub fn at_record(self, index: usize) -> Self {
        DecodeError::Record {
            index,
            source: Box::new(self),
        }
    }
}

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
