//! Error definitions.
use std::error::Error;
use std::{fmt, result};

/// A specialized Result type for this library.
pub type Result<T, E = LshIndexError> = result::Result<T, E>;

/// Errors in this library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LshIndexError {
    /// Contains [`ConfigurationError`].
    Configuration(ConfigurationError),
    /// Contains [`EmptyInputError`].
    EmptyInput(EmptyInputError),
}

impl fmt::Display for LshIndexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Configuration(e) => e.fmt(f),
            Self::EmptyInput(e) => e.fmt(f),
        }
    }
}

impl Error for LshIndexError {}

impl LshIndexError {
    pub(crate) fn configuration<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::Configuration(ConfigurationError { msg: msg.into() })
    }

    pub(crate) const fn empty_input() -> Self {
        Self::EmptyInput(EmptyInputError)
    }
}

/// Error used when a strategy or an index is constructed with invalid parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationError {
    msg: String,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ConfigurationError: {}", self.msg)
    }
}

/// Error used when an item without any feature is hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyInputError;

impl fmt::Display for EmptyInputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EmptyInputError: The input feature set must not be empty.")
    }
}
