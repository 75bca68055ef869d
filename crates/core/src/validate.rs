/// Input validation applied by the service façades before anything touches
/// the repository.
use thiserror::Error;

use crate::{Class, Document};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("class id cannot be empty")]
    EmptyClassId,
    #[error("class name cannot be empty")]
    EmptyClassName,
    #[error("document id cannot be empty")]
    EmptyDocumentId,
    #[error("document class_id cannot be empty")]
    EmptyDocumentClassId,
}

/// Validate that a class has the minimum required fields.
pub fn validate_class(class: &Class) -> Result<(), ValidationError> {
    if class.id.is_empty() {
        return Err(ValidationError::EmptyClassId);
    }
    if class.name.is_empty() {
        return Err(ValidationError::EmptyClassName);
    }
    Ok(())
}

/// Validate that a document has the minimum required fields.
pub fn validate_document(doc: &Document) -> Result<(), ValidationError> {
    if doc.id.is_empty() {
        return Err(ValidationError::EmptyDocumentId);
    }
    if doc.class_id.is_empty() {
        return Err(ValidationError::EmptyDocumentClassId);
    }
    Ok(())
}
