use std::{error::Error as StdError, fmt::Display, path::Path};

/// The good status code
pub const GOOD_RET: u8 = 0;
pub const INPUT_ERROR: u8 = 1;
pub const IO_ERROR: u8 = 2;
pub const INVALID_DATA: u8 = 3;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// bad command-line or configuration input
    Input(String),

    /// a file could not be found, read, or written. the message already
    /// contains the offending path
    Io(String, std::io::ErrorKind),

    /// file contents did not match the expected format
    InvalidData(String),
}

impl Error {
    /// wrap `e` from an operation on `path`
    pub fn io(path: impl AsRef<Path>, e: std::io::Error) -> Self {
        Self::Io(format!("{}: {e}", path.as_ref().display()), e.kind())
    }

    /// the process exit code associated with this kind of error
    pub fn code(&self) -> u8 {
        match self {
            Error::Input(_) => INPUT_ERROR,
            Error::Io(..) => IO_ERROR,
            Error::InvalidData(_) => INVALID_DATA,
        }
    }

    /// Returns `true` if the error is [`InvalidData`].
    ///
    /// [`InvalidData`]: Error::InvalidData
    #[must_use]
    pub fn is_invalid_data(&self) -> bool {
        matches!(self, Self::InvalidData(..))
    }

    /// Returns `true` if the error is [`Io`].
    ///
    /// [`Io`]: Error::Io
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(..))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Input(s) => write!(f, "{s}"),
            Error::Io(s, _) => write!(f, "{s}"),
            Error::InvalidData(s) => write!(f, "{s}"),
        }
    }
}

impl StdError for Error {}
