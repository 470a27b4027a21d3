use std::fmt;
use std::io;

#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    MissingExtension,
    InvalidExtension {
        expected: &'static str,
        found: String,
    },
    EmptyRom,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "I/O error: {}", err),
            LoadError::MissingExtension => write!(f, "ROM file has no extension"),
            LoadError::InvalidExtension { expected, found } => write!(
                f,
                "Invalid ROM file extension: expected '{}', found '{}'",
                expected, found
            ),
            LoadError::EmptyRom => write!(f, "ROM file is empty"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<LoadError> for io::Error {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Io(inner) => inner,
            other => io::Error::new(io::ErrorKind::InvalidInput, other.to_string()),
        }
    }
}
