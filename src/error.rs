//! Error types for extraction.

use crate::program::ProgramError;
use thiserror::Error;

/// Errors raised by the public extraction entry points.
///
/// Unresolvable symbols and missing value declarations are not errors:
/// they are dropped from the output.
#[derive(Debug, Error)]
pub enum Error {
    /// The file list was missing or not an ordered sequence of paths.
    #[error("{0}")]
    InvalidArgument(String),

    /// Failure while building the program model, passed through as-is.
    #[error(transparent)]
    Program(#[from] ProgramError),
}

impl Error {
    /// Create an invalid-argument error for a file list of the given kind.
    pub fn expected_file_array(received: &str) -> Self {
        Self::InvalidArgument(format!(
            "expected array of file paths, received {}",
            received
        ))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
