use std::fmt;

#[derive(Debug)]
pub enum ErrorKind {
    Io,
    CorruptIndex,
    CorpusEmpty,
    /// Reserved: the current query grammar accepts all input, so nothing
    /// constructs this yet.
    MalformedQuery,
    /// Reserved: `rust-stemmers` stems infallibly, so nothing constructs
    /// this yet.
    Stemming,
    Utf8,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Error {
            kind,
            context: context.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            kind: ErrorKind::Io,
            context: err.to_string(),
        }
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error {
            kind: ErrorKind::CorruptIndex,
            context: err.to_string(),
        }
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error {
            kind: ErrorKind::Utf8,
            context: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
