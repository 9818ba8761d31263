use core::fmt::{Debug, Display, Formatter};

/// Errors surfaced to the caller of the driver.
///
/// Protocol problems (desynchronisation, short payloads, bad checksums) are
/// recovered inside the reader and never show up here.
#[derive(Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// An argument is outside the range the sensor accepts.
    InvalidArgument,
    /// The underlying transport failed.
    Transport(E),
}

impl<E: Debug> Display for Error<E> {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::Transport(err) => write!(f, "transport error: {err:?}"),
        }
    }
}

impl<E: Debug> core::error::Error for Error<E> {}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Transport(err)
    }
}
