//! Error types for the override engine.

use crate::resolver::ResolveError;
use srd_model::ModelError;
use srd_types::FormType;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, OverrideError>;

/// How loudly a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Logged; processing of the surrounding record continues.
    Warning,
    /// Logged and shown to the user; the affected record or document is skipped.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Failures while discovering, parsing or applying override documents.
///
/// Only [`OverrideError::Discovery`] aborts a batch. Everything else is
/// scoped to one document, record or field.
#[derive(Debug, Error)]
pub enum OverrideError {
    #[error("failed to read data directory {}: {source}", path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {document}\n{message}")]
    Parse { document: String, message: String },

    #[error("{field} {identifier} of {expected} does not exist in {document} ({reason})")]
    Resolution {
        document: String,
        section: String,
        field: String,
        identifier: String,
        expected: FormType,
        #[source]
        reason: ResolveError,
    },

    #[error("Failed to parse entry in {document}\n{section}: {message}")]
    Schema {
        document: String,
        section: String,
        message: String,
    },

    #[error("{section} entry in {document} has no {field}, skipping it")]
    MissingIdentity {
        document: String,
        section: String,
        field: String,
    },

    #[error("{block} entry does not exist in form {form} in {document}")]
    MissingSoundData {
        document: String,
        form: String,
        block: &'static str,
    },

    #[error("failed to write {field} on {form} in {document}: {source}")]
    Host {
        document: String,
        form: String,
        field: String,
        #[source]
        source: ModelError,
    },
}

impl OverrideError {
    /// Severity used when logging and notifying.
    ///
    /// An unresolved `Form` costs the whole record and is an error; an
    /// unresolved field value only costs that field and is a warning.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Resolution { field, .. } if field != "Form" => Severity::Warning,
            Self::MissingIdentity { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// The document this failure belongs to, if it is document-scoped.
    pub fn document(&self) -> Option<&str> {
        match self {
            Self::Discovery { .. } => None,
            Self::Parse { document, .. }
            | Self::Resolution { document, .. }
            | Self::Schema { document, .. }
            | Self::MissingIdentity { document, .. }
            | Self::MissingSoundData { document, .. }
            | Self::Host { document, .. } => Some(document),
        }
    }
}
