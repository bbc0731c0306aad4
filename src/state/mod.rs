//! State module for tracking crawl progress
//!
//! This module provides the pagination state owned by the single crawl loop of a
//! listing parser.
//!
//! # Components
//!
//! - `Pagination`: current page, memoized total page count, and fixed page size

mod pagination;

// Re-export main types
pub use pagination::Pagination;
