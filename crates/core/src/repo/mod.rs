//! Durable CRUD and listing for classes and documents over DynamoDB.

pub mod attr;
mod dynamo;
pub mod record;

pub use dynamo::DynamoRepository;
pub use record::NO_PARENT;

use crate::Range;

/// Table names for each entity kind, resolved by the bootstrap layer from
/// the environment and passed in explicitly — no process-wide globals.
#[derive(Debug, Clone)]
pub struct Tables {
    pub class: String,
    pub document: String,
}

#[derive(Debug, Clone, Default)]
pub struct ClassFilter {
    pub range: Range,
}

/// List filter for documents. `class_id` selects documents of one class via
/// the class index; `parent_id` selects children of one document via the
/// parent index, with the empty string selecting root documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub class_id: Option<String>,
    pub parent_id: Option<String>,
    pub range: Range,
}
