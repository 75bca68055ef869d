//! Core domain and persistence layer for Quill CMS.
//!
//! A **Class** is a content-type schema; a **Document** is a versioned
//! content instance of a Class. Both are persisted in DynamoDB through
//! [`repo::DynamoRepository`], with list endpoints paginated via the
//! HTTP-Range-style [`Range`] protocol.

pub mod class;
pub mod document;
pub mod error;
pub mod range;
pub mod repo;
pub mod service;
pub mod validate;

pub use class::{Class, Field};
pub use document::Document;
pub use error::Error;
pub use range::Range;
