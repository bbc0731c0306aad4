//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::parser::ListingRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{listing_identity, CityRecord, HourseRecord, SectionRecord};
use crate::HarvestError;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use uuid::Uuid;

const HOURSE_COLUMNS: &str = "id, universal_id, section_id, link, layout, address, price, floor,
     shape, age, area, main_area, raw, others, created_at, updated_at, deleted_at";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(HarvestError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, HarvestError> {
        Ok(Self {
            conn: init_database(path)?,
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, HarvestError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn city_exists(&self, city_id: i64) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM city WHERE id = ?1 AND deleted_at IS NULL",
                params![city_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn section_exists(&self, section_id: i64) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM section WHERE id = ?1 AND deleted_at IS NULL",
                params![section_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn count_live(&self, table: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE deleted_at IS NULL", table),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

/// Empty strings are stored as NULL in nullable columns
fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn conversion_error<E>(column: usize, error: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(error))
}

fn hourse_from_row(row: &Row<'_>) -> rusqlite::Result<HourseRecord> {
    let universal_id: String = row.get(1)?;
    let others: String = row.get(13)?;

    Ok(HourseRecord {
        id: row.get(0)?,
        universal_id: Uuid::parse_str(&universal_id).map_err(|e| conversion_error(1, e))?,
        section_id: row.get(2)?,
        link: row.get(3)?,
        layout: row.get(4)?,
        address: row.get(5)?,
        price: row.get(6)?,
        floor: row.get(7)?,
        shape: row.get(8)?,
        age: row.get(9)?,
        area: row.get(10)?,
        main_area: row.get(11)?,
        raw: row.get(12)?,
        others: serde_json::from_str(&others).map_err(|e| conversion_error(13, e))?,
        created_at: row.get(14)?,
        updated_at: row.get(15)?,
        deleted_at: row.get(16)?,
    })
}

impl Storage for SqliteStorage {
    // ===== Cities and Sections =====

    fn upsert_city(&mut self, name: &str) -> StorageResult<i64> {
        if let Some(city) = self.get_city(name)? {
            return Ok(city.id);
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO city (name, created_at) VALUES (?1, ?2)",
            params![name, now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_city(&self, name: &str) -> StorageResult<Option<CityRecord>> {
        let city = self
            .conn
            .query_row(
                "SELECT id, name, created_at, deleted_at FROM city
                 WHERE name = ?1 AND deleted_at IS NULL",
                params![name],
                |row| {
                    Ok(CityRecord {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: row.get(2)?,
                        deleted_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(city)
    }

    fn upsert_section(&mut self, city_id: i64, name: &str) -> StorageResult<i64> {
        if let Some(section) = self.get_section(city_id, name)? {
            return Ok(section.id);
        }

        if !self.city_exists(city_id)? {
            return Err(StorageError::CityNotFound(city_id));
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO section (city_id, name, created_at) VALUES (?1, ?2, ?3)",
            params![city_id, name, now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_section(&self, city_id: i64, name: &str) -> StorageResult<Option<SectionRecord>> {
        let section = self
            .conn
            .query_row(
                "SELECT id, city_id, name, created_at, deleted_at FROM section
                 WHERE city_id = ?1 AND name = ?2 AND deleted_at IS NULL",
                params![city_id, name],
                |row| {
                    Ok(SectionRecord {
                        id: row.get(0)?,
                        city_id: row.get(1)?,
                        name: row.get(2)?,
                        created_at: row.get(3)?,
                        deleted_at: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(section)
    }

    // ===== Listings =====

    fn upsert_hourse(
        &mut self,
        section_id: i64,
        listing: &ListingRecord,
    ) -> StorageResult<HourseRecord> {
        if !self.section_exists(section_id)? {
            return Err(StorageError::SectionNotFound(section_id));
        }

        let universal_id = listing_identity(listing);
        let others = serde_json::to_string(&listing.notes)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO hourse (universal_id, section_id, link, layout, address, price, floor,
             shape, age, area, main_area, others, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)
             ON CONFLICT(universal_id) DO UPDATE SET
                section_id = excluded.section_id,
                link = excluded.link,
                price = excluded.price,
                age = excluded.age,
                others = excluded.others,
                updated_at = excluded.updated_at,
                deleted_at = NULL",
            params![
                universal_id.to_string(),
                section_id,
                listing.link,
                non_empty(&listing.layout),
                non_empty(&listing.address),
                listing.price,
                listing.floor,
                listing.shape,
                listing.age,
                listing.area,
                non_empty(&listing.main_area),
                others,
                now
            ],
        )?;

        self.get_hourse(&universal_id)?.ok_or_else(|| {
            StorageError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    fn get_hourse(&self, universal_id: &Uuid) -> StorageResult<Option<HourseRecord>> {
        let hourse = self
            .conn
            .query_row(
                &format!("SELECT {} FROM hourse WHERE universal_id = ?1", HOURSE_COLUMNS),
                params![universal_id.to_string()],
                hourse_from_row,
            )
            .optional()?;
        Ok(hourse)
    }

    fn list_hourses(&self, section_id: i64) -> StorageResult<Vec<HourseRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM hourse WHERE section_id = ?1 AND deleted_at IS NULL ORDER BY id",
            HOURSE_COLUMNS
        ))?;

        let hourses = stmt
            .query_map(params![section_id], hourse_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(hourses)
    }

    fn soft_delete_hourse(&mut self, universal_id: &Uuid) -> StorageResult<bool> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE hourse SET deleted_at = ?1
             WHERE universal_id = ?2 AND deleted_at IS NULL",
            params![now, universal_id.to_string()],
        )?;
        Ok(changed > 0)
    }

    // ===== Statistics =====

    fn count_cities(&self) -> StorageResult<u64> {
        self.count_live("city")
    }

    fn count_sections(&self) -> StorageResult<u64> {
        self.count_live("section")
    }

    fn count_hourses(&self) -> StorageResult<u64> {
        self.count_live("hourse")
    }
}

/// Initializes or opens a database at the given path
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(Connection)` - Successfully opened/created database
/// * `Err(rusqlite::Error)` - Failed to open database
pub fn init_database(path: &Path) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(path)?;

    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
    ",
    )?;

    initialize_schema(&conn)?;

    Ok(conn)
}
