//! Repository integration tests against DynamoDB Local.
//!
//! Run with DynamoDB Local listening on `localhost:8000`:
//!
//! ```text
//! docker run -p 8000:8000 amazon/dynamodb-local
//! cargo test -p quill-core -- --ignored
//! ```
//!
//! Each test creates its own uniquely named table so runs never collide.

use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection,
    ProjectionType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;
use chrono::Utc;
use serde_json::json;

use quill_core::repo::{ClassFilter, DocumentFilter, DynamoRepository, Tables};
use quill_core::{Class, Document, Error, Range};

async fn local_config() -> aws_config::SdkConfig {
    std::env::set_var("AWS_ACCESS_KEY_ID", "local");
    std::env::set_var("AWS_SECRET_ACCESS_KEY", "local");
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .endpoint_url("http://localhost:8000")
        .region(aws_config::Region::new("local"))
        .load()
        .await
}

fn table_name(prefix: &str) -> String {
    format!("{prefix}-{}", Utc::now().format("%Y%m%d-%H%M%S%.6f"))
}

async fn create_class_table(client: &Client, name: &str) {
    client
        .create_table()
        .table_name(name)
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name("ClassId")
                .attribute_type(ScalarAttributeType::S)
                .build()
                .unwrap(),
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name("ClassId")
                .key_type(KeyType::Hash)
                .build()
                .unwrap(),
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .expect("create class table");
}

async fn create_document_table(client: &Client, name: &str) {
    let string_attr = |attr: &str| {
        AttributeDefinition::builder()
            .attribute_name(attr)
            .attribute_type(ScalarAttributeType::S)
            .build()
            .unwrap()
    };
    let index = |index_name: &str, hash: &str| {
        GlobalSecondaryIndex::builder()
            .index_name(index_name)
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name(hash)
                    .key_type(KeyType::Hash)
                    .build()
                    .unwrap(),
            )
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name("Version")
                    .key_type(KeyType::Range)
                    .build()
                    .unwrap(),
            )
            .projection(
                Projection::builder()
                    .projection_type(ProjectionType::All)
                    .build(),
            )
            .build()
            .unwrap()
    };

    client
        .create_table()
        .table_name(name)
        .attribute_definitions(string_attr("DocumentId"))
        .attribute_definitions(string_attr("ClassId"))
        .attribute_definitions(string_attr("ParentId"))
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name("Version")
                .attribute_type(ScalarAttributeType::N)
                .build()
                .unwrap(),
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name("DocumentId")
                .key_type(KeyType::Hash)
                .build()
                .unwrap(),
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name("Version")
                .key_type(KeyType::Range)
                .build()
                .unwrap(),
        )
        .global_secondary_indexes(index("GSI-Class", "ClassId"))
        .global_secondary_indexes(index("GSI-Parent", "ParentId"))
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .expect("create document table");
}

#[tokio::test]
#[ignore = "requires DynamoDB Local on localhost:8000"]
async fn class_crud_and_pagination() {
    let config = local_config().await;
    let tables = Tables {
        class: table_name("quill-classes"),
        document: String::new(),
    };
    create_class_table(&Client::new(&config), &tables.class).await;
    let repo = DynamoRepository::new(&config, tables);

    let now = chrono::DateTime::from_timestamp_micros(Utc::now().timestamp_micros()).unwrap();
    let mut class1 = Class {
        id: "1".to_string(),
        name: "My Class".to_string(),
        created: now,
        updated: now,
        fields: Vec::new(),
    };

    // Create + read back deep-equal.
    repo.create_class(&class1).await.unwrap();
    let check = repo.get_class(&class1.id).await.unwrap();
    assert_eq!(check, class1);

    // Create-only semantics: the same id collides.
    assert!(matches!(
        repo.create_class(&class1).await,
        Err(Error::AlreadyExists(_))
    ));

    // Repeated reads with no writes in between are identical.
    assert_eq!(repo.get_class(&class1.id).await.unwrap(), check);

    // Update mutates in place and nothing else changes.
    class1.name = "My New Class".to_string();
    repo.update_class(&class1).await.unwrap();
    assert_eq!(repo.get_class(&class1.id).await.unwrap(), class1);

    // Seed up to 10 classes total for the pagination cases.
    let count = 10;
    for i in 2..=count {
        let class = Class {
            id: i.to_string(),
            name: format!("Class {i}"),
            created: now,
            updated: now,
            fields: Vec::new(),
        };
        repo.create_class(&class).await.unwrap();
    }

    let list = |start, end| ClassFilter {
        range: Range { start, end, size: 0 },
    };

    // All.
    let (classes, r) = repo.class_list(&list(0, 9)).await.unwrap();
    assert_eq!(classes.len(), 10);
    assert_eq!(r, Range { start: 0, end: 9, size: 10 });

    // Front.
    let (classes, r) = repo.class_list(&list(0, 4)).await.unwrap();
    assert_eq!(classes.len(), 5);
    assert_eq!(r, Range { start: 0, end: 4, size: 10 });

    // Middle.
    let (classes, r) = repo.class_list(&list(3, 6)).await.unwrap();
    assert_eq!(classes.len(), 4);
    assert_eq!(r, Range { start: 3, end: 6, size: 10 });

    // Back.
    let (classes, r) = repo.class_list(&list(5, 9)).await.unwrap();
    assert_eq!(classes.len(), 5);
    assert_eq!(r, Range { start: 5, end: 9, size: 10 });

    // End past the data is clamped, not an error.
    let (classes, r) = repo.class_list(&list(5, 19)).await.unwrap();
    assert_eq!(classes.len(), 5);
    assert_eq!(r.end, 9);

    // Start past the data is a bad range; maps to 416 upstream.
    assert!(matches!(
        repo.class_list(&list(15, 19)).await,
        Err(Error::BadRange(_))
    ));

    // Delete, then read-after-delete reports not-found.
    repo.delete_class(&class1.id).await.unwrap();
    assert!(matches!(
        repo.get_class(&class1.id).await,
        Err(Error::NotFound)
    ));
    assert!(matches!(
        repo.delete_class(&class1.id).await,
        Err(Error::NotFound)
    ));
}

#[tokio::test]
#[ignore = "requires DynamoDB Local on localhost:8000"]
async fn document_lifecycle() {
    let config = local_config().await;
    let tables = Tables {
        class: String::new(),
        document: table_name("quill-documents"),
    };
    create_document_table(&Client::new(&config), &tables.document).await;
    let repo = DynamoRepository::new(&config, tables);

    // Create with a parent.
    let mut doc = Document {
        id: "doc_1".to_string(),
        class_id: "class_1".to_string(),
        template_id: "template_1".to_string(),
        parent_id: "doc_0".to_string(),
        title: "CreateDocument Test".to_string(),
        ..Default::default()
    };
    repo.create_document(&mut doc).await.unwrap();
    assert_eq!(doc.version, 1);

    // Create without a parent; the sentinel never leaks out.
    let mut root = Document {
        id: "doc_2".to_string(),
        class_id: "class_1".to_string(),
        title: "CreateDocument Nil Parent Test".to_string(),
        ..Default::default()
    };
    repo.create_document(&mut root).await.unwrap();
    assert_eq!(repo.get_document("doc_2").await.unwrap().parent_id, "");

    // Get returns a deep-equal copy.
    let mut doc3 = Document {
        id: "doc_3".to_string(),
        class_id: "class_2".to_string(),
        template_id: "template_2".to_string(),
        parent_id: "doc_1".to_string(),
        values: json!({ "date": "2022-07-28" }).as_object().unwrap().clone(),
        ..Default::default()
    };
    repo.create_document(&mut doc3).await.unwrap();
    assert_eq!(repo.get_document("doc_3").await.unwrap(), doc3);

    // Update appends a version; get resolves the newest.
    let mut doc4 = Document {
        id: "doc_4".to_string(),
        class_id: "class_2".to_string(),
        template_id: "template_2".to_string(),
        parent_id: "doc_1".to_string(),
        ..Default::default()
    };
    repo.create_document(&mut doc4).await.unwrap();
    doc4.template_id = "template_3".to_string();
    repo.update_document(&mut doc4).await.unwrap();
    assert_eq!(doc4.version, 2);
    assert_eq!(repo.get_document("doc_4").await.unwrap(), doc4);

    // Both versions remain addressable.
    assert_eq!(
        repo.get_document_version("doc_4", 1)
            .await
            .unwrap()
            .template_id,
        "template_2"
    );

    // Updating a document that does not exist is not-found.
    let mut ghost = Document {
        id: "doc_ghost".to_string(),
        class_id: "class_1".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        repo.update_document(&mut ghost).await,
        Err(Error::NotFound)
    ));

    // Delete removes every version.
    let mut doc5 = Document {
        id: "doc_5".to_string(),
        class_id: "class_1".to_string(),
        template_id: "template_1".to_string(),
        parent_id: "doc_1".to_string(),
        ..Default::default()
    };
    repo.create_document(&mut doc5).await.unwrap();
    doc5.title = "second revision".to_string();
    repo.update_document(&mut doc5).await.unwrap();
    repo.delete_document("doc_5").await.unwrap();
    assert!(matches!(
        repo.get_document("doc_5").await,
        Err(Error::NotFound)
    ));
    assert!(matches!(
        repo.get_document_version("doc_5", 1).await,
        Err(Error::NotFound)
    ));
}

#[tokio::test]
#[ignore = "requires DynamoDB Local on localhost:8000"]
async fn document_list_filters() {
    let config = local_config().await;
    let tables = Tables {
        class: String::new(),
        document: table_name("quill-doc-list"),
    };
    create_document_table(&Client::new(&config), &tables.document).await;
    let repo = DynamoRepository::new(&config, tables);

    for i in 1..=4 {
        let mut doc = Document {
            id: format!("doc_{i}"),
            class_id: if i <= 2 { "news" } else { "page" }.to_string(),
            parent_id: if i == 4 { "doc_1".to_string() } else { String::new() },
            ..Default::default()
        };
        repo.create_document(&mut doc).await.unwrap();
    }
    // A second revision must not produce a duplicate list entry.
    let mut doc1 = repo.get_document("doc_1").await.unwrap();
    doc1.title = "updated".to_string();
    repo.update_document(&mut doc1).await.unwrap();

    let range = Range { start: 0, end: 9, size: 0 };

    // By class: current revisions only.
    let filter = DocumentFilter {
        class_id: Some("news".to_string()),
        range,
        ..Default::default()
    };
    let (docs, r) = repo.document_list(&filter).await.unwrap();
    assert_eq!(r.size, 2);
    assert_eq!(docs.len(), 2);
    let doc1_listed = docs.iter().find(|d| d.id == "doc_1").unwrap();
    assert_eq!(doc1_listed.version, 2);
    assert_eq!(doc1_listed.title, "updated");

    // By parent.
    let filter = DocumentFilter {
        parent_id: Some("doc_1".to_string()),
        range,
        ..Default::default()
    };
    let (docs, _) = repo.document_list(&filter).await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, "doc_4");

    // Empty parent filter selects root documents.
    let filter = DocumentFilter {
        parent_id: Some(String::new()),
        range,
        ..Default::default()
    };
    let (docs, _) = repo.document_list(&filter).await.unwrap();
    assert_eq!(docs.len(), 3);

    // Unfiltered scan covers everything, windowed.
    let filter = DocumentFilter {
        range: Range { start: 0, end: 1, size: 0 },
        ..Default::default()
    };
    let (docs, r) = repo.document_list(&filter).await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(r.size, 4);
}

#[tokio::test]
#[ignore = "requires DynamoDB Local on localhost:8000"]
async fn document_list_reflects_reparenting() {
    let config = local_config().await;
    let tables = Tables {
        class: String::new(),
        document: table_name("quill-doc-reparent"),
    };
    create_document_table(&Client::new(&config), &tables.document).await;
    let repo = DynamoRepository::new(&config, tables);

    for id in ["parent_1", "parent_2"] {
        let mut doc = Document {
            id: id.to_string(),
            class_id: "page".to_string(),
            ..Default::default()
        };
        repo.create_document(&mut doc).await.unwrap();
    }
    let mut child = Document {
        id: "child_1".to_string(),
        class_id: "page".to_string(),
        parent_id: "parent_1".to_string(),
        ..Default::default()
    };
    repo.create_document(&mut child).await.unwrap();

    // Move the child under the other parent and into another class. The
    // version 1 row stays in both indexes under the old key values.
    child.parent_id = "parent_2".to_string();
    child.class_id = "news".to_string();
    repo.update_document(&mut child).await.unwrap();
    assert_eq!(child.version, 2);

    let range = Range { start: 0, end: 9, size: 0 };

    // The old parent has no current children left; the stale index row
    // must not resurrect revision 1.
    let filter = DocumentFilter {
        parent_id: Some("parent_1".to_string()),
        range,
        ..Default::default()
    };
    assert!(matches!(
        repo.document_list(&filter).await,
        Err(Error::BadRange(_))
    ));

    // The new parent lists the current revision.
    let filter = DocumentFilter {
        parent_id: Some("parent_2".to_string()),
        range,
        ..Default::default()
    };
    let (docs, _) = repo.document_list(&filter).await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, "child_1");
    assert_eq!(docs[0].version, 2);

    // Same for the class index: the child shows up only under its new
    // class, never under both.
    let filter = DocumentFilter {
        class_id: Some("news".to_string()),
        range,
        ..Default::default()
    };
    let (docs, _) = repo.document_list(&filter).await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].version, 2);

    let filter = DocumentFilter {
        class_id: Some("page".to_string()),
        range,
        ..Default::default()
    };
    let (docs, _) = repo.document_list(&filter).await.unwrap();
    let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["parent_1", "parent_2"]);
}

#[tokio::test]
#[ignore = "requires DynamoDB Local on localhost:8000"]
async fn delete_removes_every_version_row() {
    let config = local_config().await;
    let tables = Tables {
        class: String::new(),
        document: table_name("quill-doc-delete"),
    };
    create_document_table(&Client::new(&config), &tables.document).await;
    let repo = DynamoRepository::new(&config, tables);

    // Pile up well past a single batch worth of version rows.
    let mut doc = Document {
        id: "doc_1".to_string(),
        class_id: "page".to_string(),
        ..Default::default()
    };
    repo.create_document(&mut doc).await.unwrap();
    for i in 2..=30 {
        doc.title = format!("revision {i}");
        repo.update_document(&mut doc).await.unwrap();
    }
    assert_eq!(doc.version, 30);

    repo.delete_document("doc_1").await.unwrap();

    assert!(matches!(
        repo.get_document("doc_1").await,
        Err(Error::NotFound)
    ));
    for version in [1, 15, 30] {
        assert!(matches!(
            repo.get_document_version("doc_1", version).await,
            Err(Error::NotFound)
        ));
    }
}
