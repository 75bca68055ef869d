use std::sync::Arc;

use quill_core::repo::DynamoRepository;
use quill_core::service::{ClassService, DocumentService};

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State`
/// extractor. Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    repo: DynamoRepository,
    classes: ClassService,
    documents: DocumentService,
    #[allow(dead_code)]
    config: AppConfig,
}

impl AppState {
    pub fn new(repo: DynamoRepository, config: AppConfig) -> Self {
        Self {
            inner: Arc::new(InnerState {
                classes: ClassService::new(repo.clone()),
                documents: DocumentService::new(repo.clone()),
                repo,
                config,
            }),
        }
    }

    pub fn repo(&self) -> &DynamoRepository {
        &self.inner.repo
    }

    pub fn classes(&self) -> &ClassService {
        &self.inner.classes
    }

    pub fn documents(&self) -> &DocumentService {
        &self.inner.documents
    }
}
