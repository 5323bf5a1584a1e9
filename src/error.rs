use std::{error, fmt, io};

// -------------------------------------------------------------------------------------------------

/// Provides an enumeration of all possible errors reported by gsynth.
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    /// A configuration value is out of its valid range.
    ParameterError(String),
    /// The audio device or wav writer failed.
    OutputDeviceError(Box<dyn error::Error + Send + Sync>),
    /// A buffer got submitted to a sink which already got closed.
    SinkClosed,
    IoError(io::Error),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParameterError(str) => write!(f, "Invalid parameter: {str}"),
            Self::OutputDeviceError(err) => err.fmt(f),
            Self::SinkClosed => write!(f, "Playback sink is closed"),
            Self::IoError(err) => err.fmt(f),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}
