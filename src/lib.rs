//! Hourse-Harvest: listing extraction for paginated real-estate search results
//!
//! This crate turns the item fragments of a listings search page into fixed-shape
//! listing records and maps them onto a city → section → listing store.

pub mod config;
pub mod dom;
pub mod harvest;
pub mod parser;
pub mod selector;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Hourse-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised by the DOM-query and row-count collaborators
#[derive(Debug, Error)]
pub enum DomError {
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Query '{selector}' failed: {message}")]
    Query { selector: String, message: String },

    #[error("Row-count lookup for '{selector}' was cancelled")]
    Cancelled { selector: String },
}

/// Reasons a single listing item could not be turned into a record
///
/// Any of these discards the whole item; no partial record is produced.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unexpected absolute link '{href}' under '{selector}'")]
    MalformedLink { selector: String, href: String },

    #[error("Cannot resolve link '{href}': {source}")]
    UnresolvableLink {
        href: String,
        source: ::url::ParseError,
    },

    #[error("Missing {field} element '{selector}'")]
    MissingElement { field: &'static str, selector: String },

    #[error("Schema mismatch under '{selector}': expected {expected} items, found {found}")]
    SchemaMismatch {
        selector: String,
        expected: usize,
        found: usize,
    },

    #[error("No section boundary in {field} text '{text}'")]
    BoundaryNotFound { field: &'static str, text: String },

    #[error("Invalid price '{text}' under '{selector}'")]
    InvalidPrice { selector: String, text: String },

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Result type alias for Hourse-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for per-item extraction
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

// Re-export commonly used types
pub use config::Config;
pub use dom::{DomElement, HtmlFragment, RowCounter};
pub use parser::{ListingParser, ListingRecord, YungChing};
pub use selector::QuerySelector;
pub use state::Pagination;
