use std::fmt::Display;
use thiserror::Error;
use zip::result::ZipError;

/// Errors that can terminate a conversion run.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// No registered parser recognized the input.
    #[error("unrecognized input format")]
    UnrecognizedFormat,

    /// The input passed sniffing but its structure did not match the format.
    #[error("malformed {format} document: {message}")]
    Format {
        format: &'static str,
        message: String,
    },

    /// The requested output extension or type matches no registered generator.
    #[error("unknown output format: {0:?}")]
    UnknownOutputFormat(String),

    /// A generator could not represent the outline in its target format.
    #[error("cannot write {format} output: {message}")]
    Generate {
        format: &'static str,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub fn format(format: &'static str, message: impl Display) -> Self {
        ConvertError::Format {
            format,
            message: message.to_string(),
        }
    }

    pub fn generate(format: &'static str, message: impl Display) -> Self {
        ConvertError::Generate {
            format,
            message: message.to_string(),
        }
    }

    /// Maps an archive error, passing underlying I/O failures through unchanged.
    pub fn archive(format: &'static str, err: ZipError) -> Self {
        match err {
            ZipError::Io(io) => ConvertError::Io(io),
            other => ConvertError::format(format, other),
        }
    }
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
