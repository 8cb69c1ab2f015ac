//! Validation errors.
//!
//! Every error here describes malformed input. None of them are transient, so
//! callers should surface them instead of retrying.

use std::fmt;
use thiserror::Error as ThisError;

/// Fixed message for a blob that is neither a structured record nor query text.
pub const BLOB_TRANSLATE_ERROR: &str = "unable to translate query blob";

pub type Result<T> = std::result::Result<T, Error>;

/// Which side of the time window an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Start => f.write_str("start"),
            Bound::End => f.write_str("end"),
        }
    }
}

///
/// Error
///

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    #[error("unable to translate query blob")]
    BlobTranslate,

    #[error("unable to parse time ({input})")]
    TimeParse { input: String },

    #[error("{bound} time must not be empty")]
    EmptyTime { bound: Bound },

    #[error("date range should have a start time before the end time")]
    RangeOrder,

    #[error("query should not be empty")]
    EmptyQuery,
}

/// Fieldless discriminant of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BlobTranslate,
    TimeParse,
    EmptyTime,
    RangeOrder,
    EmptyQuery,
}

impl Error {
    pub(crate) fn time_parse(input: impl Into<String>) -> Self {
        Error::TimeParse { input: input.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::BlobTranslate => ErrorKind::BlobTranslate,
            Error::TimeParse { .. } => ErrorKind::TimeParse,
            Error::EmptyTime { .. } => ErrorKind::EmptyTime,
            Error::RangeOrder => ErrorKind::RangeOrder,
            Error::EmptyQuery => ErrorKind::EmptyQuery,
        }
    }
}
