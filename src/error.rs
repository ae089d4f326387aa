use thiserror::Error;

/// A possible error returned by a reader or writer operation.
///
/// `InvalidState` and `InvalidArgument` are caller errors: the codec's
/// position is left unchanged and the same call may legally be retried
/// once the caller fixes its side. `Truncated`, `Malformed` and `Io` are
/// stream errors: the codec transitions to its terminal error phase and
/// every subsequent operation fails with `InvalidState`.
#[derive(Debug, Error)]
pub enum Error {
    /// The operation is not legal in the codec's current phase.
    #[error("operation not legal in current phase: {0}")]
    InvalidState(&'static str),

    /// The caller supplied a value outside its documented domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The underlying stream ended before enough bytes could be read.
    #[error("stream truncated: {0}")]
    Truncated(String),

    /// Bytes were read but violate the container or codec format.
    #[error("malformed gif data: {0}")]
    Malformed(String),

    /// The underlying stream returned an I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_state(what: &'static str) -> Self {
        Error::InvalidState(what)
    }

    pub(crate) fn invalid_argument(what: &'static str) -> Self {
        Error::InvalidArgument(what)
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::Malformed(msg.into())
    }

    pub(crate) fn truncated(msg: impl Into<String>) -> Self {
        Error::Truncated(msg.into())
    }

    /// True for the stream errors that transition the codec to `Error`.
    pub(crate) fn is_sticky(&self) -> bool {
        !matches!(self, Error::InvalidState(_) | Error::InvalidArgument(_))
    }
}

/// Turns an `io::Error` into `Truncated` for EOF and `Io` for everything else.
pub(crate) fn from_io(err: std::io::Error, context: &'static str) -> Error {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::truncated(context)
    } else {
        Error::Io(err)
    }
}
