use crate::compress::CompressError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not an XLZF save: bad magic line")]
    BadMagic,

    #[error("malformed header: expected `{field}:=` line")]
    Format { field: &'static str },

    #[error("header field {field} is not a number: `{value}`")]
    NumericField { field: &'static str, value: String },

    #[error("payload length mismatch: header declares {declared} bytes, file carries {actual}")]
    PayloadLength { declared: usize, actual: usize },

    #[error("decompressed size mismatch: header declares {expected} bytes, got {actual}")]
    Integrity { expected: usize, actual: usize },

    #[error("compression failed: {0}")]
    Compression(#[from] CompressError),
}

impl SaveError {
    /// Whether retrying the operation can succeed.
    ///
    /// Only an undersized compression capacity qualifies; every other
    /// variant means the input or the file is bad.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SaveError::Compression(e) => e.is_capacity(),
            _ => false,
        }
    }
}
