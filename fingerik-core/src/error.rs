use std::{error, fmt, io};

pub type Result<T> = std::result::Result<T, Error>;

/// Construction and configuration faults.
///
/// None of these are raised while solving. A chain that fails to
/// initialize simply stays idle.
#[derive(Debug)]
pub enum Error {
    /// A referenced node does not exist in the skeleton.
    MissingNode(String),
    /// The rest pose was already captured.
    AlreadyInitialized,
    /// A configuration value is out of range.
    InvalidConfig(String),
    /// Configuration file could not be read.
    Io(io::Error),
    /// Configuration file could not be parsed.
    Parse(toml::de::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingNode(node) => write!(f, "node '{}' not found in skeleton", node),
            Error::AlreadyInitialized => write!(f, "chain is already initialized"),
            Error::InvalidConfig(reason) => write!(f, "invalid configuration: {}", reason),
            Error::Io(e) => write!(f, "{}", e),
            Error::Parse(e) => write!(f, "{}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Error::Io(value)
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Error::Parse(value)
    }
}
