use std::convert::From;
use std::fmt;

/// Errors returned by this crate.
#[derive(Debug)]
pub enum Error {
    /// Key length didn't match what the cipher expects.
    KeySize {
        /// Required key length, in bytes
        expected: usize,
        /// Length that was provided
        found: usize,
    },
    /// Nonce length didn't match what the cipher expects.
    NonceSize {
        /// Required nonce length, in bytes
        expected: usize,
        /// Length that was provided
        found: usize,
    },
    /// The randomness source failed while generating a key.
    RandRead(rand_core::Error),
    /// A peer's public value is missing a coordinate, is not on the curve, or
    /// is outside the group.
    InvalidPublic,
    /// Any other failure, with a description.
    Message(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeySize { expected, found } => {
                write!(f, "invalid key size: expected {} found {}", expected, found)
            }
            Error::NonceSize { expected, found } => {
                write!(f, "invalid nonce size: expected {} found {}", expected, found)
            }
            Error::RandRead(err) => write!(f, "failed to read random bytes: {}", err),
            Error::InvalidPublic => f.write_str("invalid public key"),
            Error::Message(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::RandRead(err) => Some(err),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Message(message)
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::Message(message.into())
    }
}

impl From<rand_core::Error> for Error {
    fn from(error: rand_core::Error) -> Self {
        Error::RandRead(error)
    }
}

macro_rules! hcdh_error {
    ($msg:expr) => {{ crate::error::Error::from(format!("{}, from {}:{}", $msg, file!(), line!())) }};
}
