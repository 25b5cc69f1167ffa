//! Error types for loading a world description.
//!
//! A [`ManifestError`] is either *malformed* (the line itself cannot be read)
//! or *referential* (the line parsed but names an object the engine rejects).
//! Both kinds are per-line: the loader records them in a
//! [`crate::LoadReport`] and moves on to the next line. Only
//! [`ManifestError::Io`] and [`ManifestError::Engine`] stop a load outright.

use std::path::PathBuf;

use harbor::HarborError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    /// The description file could not be read.
    #[error("Cannot read world description {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The first token of a line is not a known record type.
    #[error("Line {line}: unknown record type `{keyword}`")]
    UnknownKeyword { line: usize, keyword: String },

    /// A record ended before all of its fields were given.
    #[error("Line {line}: {keyword} record is missing its {field}")]
    MissingField {
        line: usize,
        keyword: &'static str,
        field: &'static str,
    },

    /// A numeric field did not parse.
    #[error("Line {line}: {field} `{value}` is not a valid number")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// A job duration parsed but is negative or not finite.
    #[error("Line {line}: duration `{value}` is not a non-negative number of seconds")]
    InvalidDuration { line: usize, value: String },

    /// The line parsed, but the engine refused it (unknown reference,
    /// duplicate index, ...).
    #[error("Line {line}: {source}")]
    Reference {
        line: usize,
        #[source]
        source: HarborError,
    },

    /// The engine could not be set up at all.
    #[error(transparent)]
    Engine(#[from] HarborError),
}

impl ManifestError {
    /// The 1-based line the error refers to, if it is a per-line error.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::UnknownKeyword { line, .. }
            | Self::MissingField { line, .. }
            | Self::InvalidNumber { line, .. }
            | Self::InvalidDuration { line, .. }
            | Self::Reference { line, .. } => Some(*line),
            Self::Io { .. } | Self::Engine(_) => None,
        }
    }

    /// Returns `true` when the line itself could not be read.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::UnknownKeyword { .. }
                | Self::MissingField { .. }
                | Self::InvalidNumber { .. }
                | Self::InvalidDuration { .. }
        )
    }
}
