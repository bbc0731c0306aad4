//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::parser::ListingRecord;
use crate::storage::{CityRecord, HourseRecord, SectionRecord};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("City not found: {0}")]
    CityNotFound(i64),

    #[error("Section not found: {0}")]
    SectionNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Uniqueness of city and section names holds among live rows only; soft
/// deletion is expressed through `deleted_at`.
pub trait Storage {
    // ===== Cities and Sections =====

    /// Returns the live city with this name, creating it if needed
    fn upsert_city(&mut self, name: &str) -> StorageResult<i64>;

    /// Gets a live city by name
    fn get_city(&self, name: &str) -> StorageResult<Option<CityRecord>>;

    /// Returns the live section of `city_id` with this name, creating it if needed
    ///
    /// # Errors
    ///
    /// `CityNotFound` if `city_id` is not a live city
    fn upsert_section(&mut self, city_id: i64, name: &str) -> StorageResult<i64>;

    /// Gets a live section by owning city and name
    fn get_section(&self, city_id: i64, name: &str) -> StorageResult<Option<SectionRecord>>;

    // ===== Listings =====

    /// Inserts or updates a listing keyed by its surrogate identity
    ///
    /// An existing row keeps its identity and creation time; link, price, age,
    /// notes and owning section are refreshed and a soft-deleted row is revived.
    ///
    /// # Errors
    ///
    /// `SectionNotFound` if `section_id` is not a live section
    fn upsert_hourse(
        &mut self,
        section_id: i64,
        listing: &ListingRecord,
    ) -> StorageResult<HourseRecord>;

    /// Gets a listing by surrogate identity, including soft-deleted ones
    fn get_hourse(&self, universal_id: &Uuid) -> StorageResult<Option<HourseRecord>>;

    /// Lists the live listings of a section
    fn list_hourses(&self, section_id: i64) -> StorageResult<Vec<HourseRecord>>;

    /// Marks a listing as deleted
    ///
    /// Returns false if there was no live listing with this identity.
    fn soft_delete_hourse(&mut self, universal_id: &Uuid) -> StorageResult<bool>;

    /// Stores a listing under its city and section
    fn store_listing(&mut self, listing: &ListingRecord) -> StorageResult<HourseRecord> {
        let city_id = self.upsert_city(&listing.city)?;
        let section_id = self.upsert_section(city_id, &listing.section)?;
        self.upsert_hourse(section_id, listing)
    }

    // ===== Statistics =====

    /// Counts live cities
    fn count_cities(&self) -> StorageResult<u64>;

    /// Counts live sections
    fn count_sections(&self) -> StorageResult<u64>;

    /// Counts live listings
    fn count_hourses(&self) -> StorageResult<u64>;
}
