//! Error types for host registry operations.

use srd_types::{FormId, FormType, ReferenceField};
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("form {0} does not exist")]
    FormNotFound(FormId),

    #[error("field '{field}' does not exist on {form_type} form {form}")]
    FieldNotApplicable {
        form: FormId,
        form_type: FormType,
        field: ReferenceField,
    },

    #[error("form {0} is not a region")]
    NotARegion(FormId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
