use std::env;

use quill_core::repo::Tables;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// DynamoDB table holding class rows.
    pub class_table: String,
    /// DynamoDB table holding document version rows.
    pub document_table: String,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from environment variables. Table names are
    /// required; the rest have development defaults.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3030".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
            class_table: env::var("DYNAMODB_CLASS_TABLE")?,
            document_table: env::var("DYNAMODB_DOCUMENT_TABLE")?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn tables(&self) -> Tables {
        Tables {
            class: self.class_table.clone(),
            document: self.document_table.clone(),
        }
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
