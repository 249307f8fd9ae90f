use std::{borrow::Cow, io};

/// zlib status codes for the error conditions a codec engine can report.
pub const Z_STREAM_ERROR: i32 = -2;
pub const Z_DATA_ERROR: i32 = -3;
pub const Z_MEM_ERROR: i32 = -4;
pub const Z_BUF_ERROR: i32 = -5;
pub const Z_VERSION_ERROR: i32 = -6;

/// Classification of a codec engine failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GzipErrorKind {
    /// Invalid call sequence, or the stream is in a state that can't accept the call.
    StreamError,
    /// Corrupt input, or input that isn't in the expected container format.
    DataError,
    /// The engine couldn't allocate memory.
    MemoryError,
    /// The engine couldn't make any progress.
    BufferError,
    /// Engine library and header disagree on their version.
    VersionError,
    /// Any status code not covered above.
    Other(i32),
}

impl GzipErrorKind {
    /// Maps a zlib-style numeric status code to its kind.
    pub fn from_code(code: i32) -> Self {
        match code {
            Z_STREAM_ERROR => Self::StreamError,
            Z_DATA_ERROR => Self::DataError,
            Z_MEM_ERROR => Self::MemoryError,
            Z_BUF_ERROR => Self::BufferError,
            Z_VERSION_ERROR => Self::VersionError,
            code => Self::Other(code),
        }
    }
}

/// An engine failure: its kind plus the engine's own diagnostic, when it gave one.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}", describe(.message, .kind))]
pub struct GzipError {
    kind: GzipErrorKind,
    message: Option<String>,
}

impl GzipError {
    pub fn new(kind: GzipErrorKind, message: Option<String>) -> Self {
        Self {
            kind,
            message,
        }
    }

    /// Builds the error for a raw engine status code.
    pub fn from_code(code: i32, message: Option<String>) -> Self {
        Self::new(GzipErrorKind::from_code(code), message)
    }

    pub(crate) fn data(message: &str) -> Self {
        Self::new(GzipErrorKind::DataError, Some(message.to_owned()))
    }

    pub(crate) fn stream(message: &str) -> Self {
        Self::new(GzipErrorKind::StreamError, Some(message.to_owned()))
    }

    pub fn kind(&self) -> GzipErrorKind {
        self.kind
    }

    /// The engine's diagnostic text, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl From<GzipErrorKind> for GzipError {
    fn from(kind: GzipErrorKind) -> Self {
        Self::new(kind, None)
    }
}

fn describe<'a>(message: &'a Option<String>, kind: &GzipErrorKind) -> Cow<'a, str> {
    match (message, kind) {
        (Some(message), _) => Cow::Borrowed(message),
        (None, GzipErrorKind::Other(code)) => Cow::Owned(format!("unknown gzip error, code {code}")),
        (None, _) => Cow::Borrowed("unknown gzip error"),
    }
}

/// Errors surfaced by the drivers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The codec engine failed; the driver is unusable afterwards.
    #[error(transparent)]
    Gzip(#[from] GzipError),
    /// The bound endpoint failed, passed through as-is.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// The engine error kind, `None` for endpoint errors.
    pub fn gzip_kind(&self) -> Option<GzipErrorKind> {
        match self {
            Self::Gzip(err) => Some(err.kind()),
            Self::Io(_) => None,
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(err) => err,
            Error::Gzip(err) if err.kind() == GzipErrorKind::DataError => {
                io::Error::new(io::ErrorKind::InvalidData, err)
            }
            Error::Gzip(err) => io::Error::new(io::ErrorKind::Other, err),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
