use crate::error::Result;
use crate::repo::{DocumentFilter, DynamoRepository};
use crate::validate::validate_document;
use crate::{Document, Range};

#[derive(Clone)]
pub struct DocumentService {
    repo: DynamoRepository,
}

impl DocumentService {
    pub fn new(repo: DynamoRepository) -> Self {
        Self { repo }
    }

    /// Create version 1 of a document; the repository assigns `version`.
    pub async fn create(&self, doc: &mut Document) -> Result<()> {
        validate_document(doc)?;
        self.repo.create_document(doc).await
    }

    /// The current (highest-version) revision.
    pub async fn by_id(&self, id: &str) -> Result<Document> {
        self.repo.get_document(id).await
    }

    pub async fn by_id_version(&self, id: &str, version: i64) -> Result<Document> {
        self.repo.get_document_version(id, version).await
    }

    /// Append a new revision of an existing document.
    pub async fn update(&self, doc: &mut Document) -> Result<()> {
        validate_document(doc)?;
        self.repo.update_document(doc).await
    }

    /// Remove the logical document, every version included.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.repo.delete_document(id).await
    }

    pub async fn list(&self, filter: &DocumentFilter) -> Result<(Vec<Document>, Range)> {
        self.repo.document_list(filter).await
    }
}
