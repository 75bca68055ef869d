use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A versioned content instance of a [`crate::Class`].
///
/// `id` is stable across versions; every update appends a row with a
/// strictly greater `version`, and the highest version is the current
/// revision. An empty `parent_id` means the document sits at the root of
/// the content tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    /// Starts at 1 on create; assigned by the repository, not the caller.
    #[serde(default)]
    pub version: i64,
    pub class_id: String,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub template_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// Free-form content payload keyed by field name.
    #[serde(default)]
    pub values: serde_json::Map<String, Value>,
}
