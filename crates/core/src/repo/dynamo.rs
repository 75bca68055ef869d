use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use tracing::debug;

use super::record::{
    self, ATTR_CLASS_ID, ATTR_DOCUMENT_ID, ATTR_PARENT_ID, ATTR_VERSION,
};
use super::{ClassFilter, DocumentFilter, Tables};
use crate::error::{Error, Result};
use crate::{Class, Document, Range};

/// Index over `(ClassId, Version)` for "documents of this class" queries.
const GSI_CLASS: &str = "GSI-Class";
/// Index over `(ParentId, Version)` for "children of this document" queries.
const GSI_PARENT: &str = "GSI-Parent";

type Item = HashMap<String, AttributeValue>;

/// DynamoDB-backed repository for classes and documents.
///
/// One table per entity kind: the class table is keyed by `ClassId` alone;
/// the document table by `(DocumentId, Version)` with one row per version,
/// the highest version being the current revision. Every mutation is a
/// single conditional put or delete against one key, so no read-modify-write
/// races are introduced here; transient store errors pass through without
/// retries.
#[derive(Clone)]
pub struct DynamoRepository {
    client: Client,
    tables: Tables,
}

impl DynamoRepository {
    pub fn new(config: &aws_config::SdkConfig, tables: Tables) -> Self {
        Self {
            client: Client::new(config),
            tables,
        }
    }

    /// Cheap connectivity check for health endpoints.
    pub async fn ping(&self) -> Result<()> {
        self.client
            .describe_table()
            .table_name(&self.tables.class)
            .send()
            .await
            .map_err(|e| Error::Store(e.into()))?;
        Ok(())
    }

    pub async fn create_class(&self, class: &Class) -> Result<()> {
        debug!(id = %class.id, "creating class");
        let result = self
            .client
            .put_item()
            .table_name(&self.tables.class)
            .set_item(Some(record::class_to_item(class)))
            .condition_expression("attribute_not_exists(ClassId)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                let err = err.into_service_error();
                if err.is_conditional_check_failed_exception() {
                    return Err(Error::AlreadyExists(class.id.clone()));
                }
                Err(Error::Store(err.into()))
            }
        }
    }

    pub async fn get_class(&self, id: &str) -> Result<Class> {
        let out = self
            .client
            .get_item()
            .table_name(&self.tables.class)
            .key(ATTR_CLASS_ID, AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| Error::Store(e.into()))?;

        let item = out.item.ok_or(Error::NotFound)?;
        Ok(record::class_from_item(&item))
    }

    /// Overwrites the class row in place. The target must already exist.
    pub async fn update_class(&self, class: &Class) -> Result<()> {
        debug!(id = %class.id, "updating class");
        let result = self
            .client
            .put_item()
            .table_name(&self.tables.class)
            .set_item(Some(record::class_to_item(class)))
            .condition_expression("attribute_exists(ClassId)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                let err = err.into_service_error();
                if err.is_conditional_check_failed_exception() {
                    return Err(Error::NotFound);
                }
                Err(Error::Store(err.into()))
            }
        }
    }

    pub async fn delete_class(&self, id: &str) -> Result<()> {
        debug!(id, "deleting class");
        let result = self
            .client
            .delete_item()
            .table_name(&self.tables.class)
            .key(ATTR_CLASS_ID, AttributeValue::S(id.to_string()))
            .condition_expression("attribute_exists(ClassId)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                let err = err.into_service_error();
                if err.is_conditional_check_failed_exception() {
                    return Err(Error::NotFound);
                }
                Err(Error::Store(err.into()))
            }
        }
    }

    /// List classes with offset pagination.
    ///
    /// DynamoDB has no ordinal-offset query, so the full candidate set is
    /// materialized and windowed client-side; ordering is creation time then
    /// id, which is stable across calls against unchanged data.
    pub async fn class_list(&self, filter: &ClassFilter) -> Result<(Vec<Class>, Range)> {
        let mut classes = Vec::new();
        let mut pages = self
            .client
            .scan()
            .table_name(&self.tables.class)
            .into_paginator()
            .items()
            .send();
        while let Some(item) = pages.next().await {
            let item = item.map_err(|e| Error::Store(e.into()))?;
            classes.push(record::class_from_item(&item));
        }

        classes.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));

        let window = filter.range.window(classes.len())?;
        let page = classes[window.start..=window.end].to_vec();
        Ok((page, window))
    }

    /// Writes version 1 of a new document, assigning `doc.version`.
    pub async fn create_document(&self, doc: &mut Document) -> Result<()> {
        doc.version = 1;
        debug!(id = %doc.id, "creating document");
        self.put_document_version(doc).await
    }

    /// Resolves the current (highest-version) revision of a document.
    pub async fn get_document(&self, id: &str) -> Result<Document> {
        let out = self
            .client
            .query()
            .table_name(&self.tables.document)
            .key_condition_expression("DocumentId = :id")
            .expression_attribute_values(":id", AttributeValue::S(id.to_string()))
            .scan_index_forward(false)
            .limit(1)
            .send()
            .await
            .map_err(|e| Error::Store(e.into()))?;

        let item = out.items().first().ok_or(Error::NotFound)?;
        Ok(record::document_from_item(item))
    }

    /// Point read of one specific version.
    pub async fn get_document_version(&self, id: &str, version: i64) -> Result<Document> {
        let out = self
            .client
            .get_item()
            .table_name(&self.tables.document)
            .key(ATTR_DOCUMENT_ID, AttributeValue::S(id.to_string()))
            .key(ATTR_VERSION, AttributeValue::N(version.to_string()))
            .send()
            .await
            .map_err(|e| Error::Store(e.into()))?;

        let item = out.item.ok_or(Error::NotFound)?;
        Ok(record::document_from_item(&item))
    }

    /// Appends a new version row rather than mutating an existing one.
    /// Fails with `NotFound` when the document does not exist; a concurrent
    /// writer losing the race for the next version number surfaces as
    /// `AlreadyExists`.
    pub async fn update_document(&self, doc: &mut Document) -> Result<()> {
        let current = self.get_document(&doc.id).await?;
        doc.version = current.version + 1;
        debug!(id = %doc.id, version = doc.version, "appending document version");
        self.put_document_version(doc).await
    }

    /// Removes every version row of the logical document, so a subsequent
    /// get reports not-found. Each row is deleted with its own request; a
    /// failed delete surfaces as a store error instead of leaving a
    /// partially deleted document behind a success result.
    pub async fn delete_document(&self, id: &str) -> Result<()> {
        debug!(id, "deleting document");
        let mut items = Vec::new();
        let mut pages = self
            .client
            .query()
            .table_name(&self.tables.document)
            .key_condition_expression("DocumentId = :id")
            .expression_attribute_values(":id", AttributeValue::S(id.to_string()))
            .projection_expression("DocumentId, #v")
            .expression_attribute_names("#v", ATTR_VERSION)
            .into_paginator()
            .items()
            .send();
        while let Some(item) = pages.next().await {
            items.push(item.map_err(|e| Error::Store(e.into()))?);
        }

        if items.is_empty() {
            return Err(Error::NotFound);
        }

        for item in &items {
            let mut request = self.client.delete_item().table_name(&self.tables.document);
            for name in [ATTR_DOCUMENT_ID, ATTR_VERSION] {
                if let Some(attr) = item.get(name) {
                    request = request.key(name, attr.clone());
                }
            }
            request
                .send()
                .await
                .map_err(|e| Error::Store(e.into()))?;
        }

        Ok(())
    }

    /// List current document revisions, optionally narrowed by class or
    /// parent through the secondary indexes. The candidate set (every
    /// version of every matching document) is collapsed to the highest
    /// version per id, then checked for currency: old version rows linger
    /// in an index after an update moves a document to a different class
    /// or parent, so an index hit only counts when it is the document's
    /// latest revision.
    pub async fn document_list(&self, filter: &DocumentFilter) -> Result<(Vec<Document>, Range)> {
        let items = if let Some(class_id) = filter.class_id.as_deref() {
            self.query_document_index(GSI_CLASS, ATTR_CLASS_ID, class_id)
                .await?
        } else if let Some(parent_id) = filter.parent_id.as_deref() {
            // The index stores the sentinel, so an empty parent filter
            // selects root documents.
            let parent_key = if parent_id.is_empty() {
                record::NO_PARENT
            } else {
                parent_id
            };
            self.query_document_index(GSI_PARENT, ATTR_PARENT_ID, parent_key)
                .await?
        } else {
            self.scan_documents().await?
        };

        let mut latest: HashMap<String, Document> = HashMap::new();
        for item in &items {
            let doc = record::document_from_item(item);
            let newer = latest
                .get(&doc.id)
                .map_or(true, |existing| doc.version > existing.version);
            if newer {
                latest.insert(doc.id.clone(), doc);
            }
        }

        // An index query only sees the rows stored under the requested key,
        // so the collapsed version may be superseded by a newer revision
        // filed under another class or parent. Keep only ids whose current
        // revision is the one the index produced.
        let index_filtered = filter.class_id.is_some() || filter.parent_id.is_some();
        let mut docs: Vec<Document> = Vec::with_capacity(latest.len());
        for doc in latest.into_values() {
            if index_filtered {
                match self.get_document(&doc.id).await {
                    Ok(head) if head.version == doc.version => {}
                    Ok(_) | Err(Error::NotFound) => continue,
                    Err(err) => return Err(err),
                }
            }
            docs.push(doc);
        }

        if filter.class_id.is_some() {
            if let Some(parent_id) = filter.parent_id.as_deref() {
                docs.retain(|doc| doc.parent_id == parent_id);
            }
        }
        docs.sort_by(|a, b| a.id.cmp(&b.id));

        let window = filter.range.window(docs.len())?;
        let page = docs[window.start..=window.end].to_vec();
        Ok((page, window))
    }

    async fn put_document_version(&self, doc: &Document) -> Result<()> {
        let result = self
            .client
            .put_item()
            .table_name(&self.tables.document)
            .set_item(Some(record::document_to_item(doc)))
            .condition_expression("attribute_not_exists(DocumentId)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                let err = err.into_service_error();
                if err.is_conditional_check_failed_exception() {
                    return Err(Error::AlreadyExists(format!(
                        "{} version {}",
                        doc.id, doc.version
                    )));
                }
                Err(Error::Store(err.into()))
            }
        }
    }

    async fn query_document_index(&self, index: &str, key: &str, value: &str) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        let mut pages = self
            .client
            .query()
            .table_name(&self.tables.document)
            .index_name(index)
            .key_condition_expression(format!("{key} = :value"))
            .expression_attribute_values(":value", AttributeValue::S(value.to_string()))
            .into_paginator()
            .items()
            .send();
        while let Some(item) = pages.next().await {
            items.push(item.map_err(|e| Error::Store(e.into()))?);
        }
        Ok(items)
    }

    async fn scan_documents(&self) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        let mut pages = self
            .client
            .scan()
            .table_name(&self.tables.document)
            .into_paginator()
            .items()
            .send();
        while let Some(item) = pages.next().await {
            items.push(item.map_err(|e| Error::Store(e.into()))?);
        }
        Ok(items)
    }
}
