use super::now_micros;
use crate::error::Result;
use crate::repo::{ClassFilter, DynamoRepository};
use crate::validate::validate_class;
use crate::{Class, Range};

#[derive(Clone)]
pub struct ClassService {
    repo: DynamoRepository,
}

impl ClassService {
    pub fn new(repo: DynamoRepository) -> Self {
        Self { repo }
    }

    /// Create a class, stamping both timestamps.
    pub async fn create(&self, class: &mut Class) -> Result<()> {
        validate_class(class)?;
        let now = now_micros();
        class.created = now;
        class.updated = now;
        self.repo.create_class(class).await
    }

    pub async fn by_id(&self, id: &str) -> Result<Class> {
        self.repo.get_class(id).await
    }

    /// Update a class in place, refreshing `updated`.
    pub async fn update(&self, class: &mut Class) -> Result<()> {
        validate_class(class)?;
        class.updated = now_micros();
        self.repo.update_class(class).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.repo.delete_class(id).await
    }

    pub async fn list(&self, filter: &ClassFilter) -> Result<(Vec<Class>, Range)> {
        self.repo.class_list(filter).await
    }
}
