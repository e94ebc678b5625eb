use thiserror::Error;

use crate::format::CoverFormat;

#[derive(Error, Debug)]
pub enum DisguiseError {
    /// Represents a cover image that lacks the expected format boundary,
    /// for example a JPEG without an end-of-image marker
    #[error("Cover image is not a valid {0} file")]
    InvalidCoverImage(CoverFormat),

    /// Represents an unrecognized output format tag
    #[error("Unsupported output format: {0}")]
    UnsupportedOutputFormat(String),

    /// Represents a metadata block whose declared length runs past the end
    /// of the buffer. Recoverable during detection
    #[error("Metadata block is truncated")]
    TruncatedMetadata,

    /// Represents a metadata block that is not a structurally valid record.
    /// Recoverable during detection
    #[error("Metadata block could not be parsed")]
    MetadataParseError(#[from] serde_json::Error),

    /// Represents an extraction attempt against a buffer that carries no
    /// recoverable payload
    #[error("No disguised payload found")]
    NotDisguised,

    /// Represents an error caused by an invalid payload file name, for
    /// example an empty one or one with an unsupported charset
    #[error("A file with an invalid file name was provided")]
    InvalidFileName,

    /// Represents a failure to read from input.
    #[error("Read error")]
    ReadError { source: std::io::Error },

    /// Represents a failure to write the target file.
    #[error("Write error")]
    WriteError { source: std::io::Error },

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("API Error: Missing payload file")]
    PayloadNotSet,

    #[error("API Error: Missing cover image")]
    CoverNotSet,

    #[error("API Error: Missing suspect file")]
    SuspectNotSet,

    #[error("API Error: Missing output location")]
    TargetNotSet,
}
