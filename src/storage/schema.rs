//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Hourse-Harvest database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Cities searched
CREATE TABLE IF NOT EXISTS city (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    deleted_at TEXT
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_city_live_name
    ON city(name) WHERE deleted_at IS NULL;

-- Administrative sections, each owned by exactly one city
CREATE TABLE IF NOT EXISTS section (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    city_id INTEGER NOT NULL REFERENCES city(id),
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    deleted_at TEXT
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_section_live_name
    ON section(city_id, name) WHERE deleted_at IS NULL;

-- Listings, each owned by exactly one section
CREATE TABLE IF NOT EXISTS hourse (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    universal_id TEXT NOT NULL UNIQUE,
    section_id INTEGER NOT NULL REFERENCES section(id),
    link TEXT NOT NULL,
    layout TEXT,
    address TEXT,
    price INTEGER NOT NULL,
    floor TEXT NOT NULL,
    shape TEXT NOT NULL,
    age TEXT NOT NULL,
    area TEXT NOT NULL,
    main_area TEXT,
    raw TEXT,
    others TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_hourse_section ON hourse(section_id);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
