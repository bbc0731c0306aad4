//! Storage module for persisting harvested listings
//!
//! This module maps listing records onto the city → section → hourse schema:
//! - SQLite database initialization and schema management
//! - Get-or-create for cities and sections among live rows
//! - Listing upserts keyed by a stable surrogate identity
//! - Soft deletion through a nullable `deleted_at`

mod schema;
mod sqlite;
mod traits;

pub use sqlite::{init_database, SqliteStorage};
pub use traits::{Storage, StorageError, StorageResult};

use crate::parser::ListingRecord;

use url::Url;
use uuid::Uuid;

/// Namespace of the listing surrogate identities
const LISTING_NAMESPACE: Uuid = Uuid::from_u128(0x6f1d_3c2a_9b84_4e57_a0c3_52e1_7d9f_08b6);

/// Site case number carried by a detail link
///
/// The case number is the last path segment of the link that contains a
/// digit, e.g. `1234567` for `/house/1234567?kw=1`. Query strings and
/// fragments are ignored.
pub fn case_number(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;

    segment
        .chars()
        .any(|c| c.is_ascii_digit())
        .then(|| segment.to_string())
}

/// Stable identity of a listing
///
/// Keyed by the site case number when the detail link carries one, so price
/// and query-string changes between crawls map onto the same row. Items
/// without a usable link fall back to the attributes of the unit itself.
pub fn listing_identity(listing: &ListingRecord) -> Uuid {
    let key = match case_number(&listing.link) {
        Some(case) => ["case", case.as_str()].join("\u{1f}"),
        None => [
            "unit",
            listing.city.as_str(),
            listing.section.as_str(),
            listing.address.as_str(),
            listing.shape.as_str(),
            listing.floor.as_str(),
            listing.main_area.as_str(),
            listing.area.as_str(),
            listing.layout.as_str(),
        ]
        .join("\u{1f}"),
    };

    Uuid::new_v5(&LISTING_NAMESPACE, key.as_bytes())
}

/// Represents a city in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityRecord {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub deleted_at: Option<String>,
}

/// Represents an administrative section of a city
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRecord {
    pub id: i64,
    pub city_id: i64,
    pub name: String,
    pub created_at: String,
    pub deleted_at: Option<String>,
}

/// Represents a stored listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourseRecord {
    pub id: i64,
    pub universal_id: Uuid,
    pub section_id: i64,
    pub link: String,
    pub layout: Option<String>,
    pub address: Option<String>,
    pub price: i64,
    pub floor: String,
    pub shape: String,
    pub age: String,
    pub area: String,
    pub main_area: Option<String>,

    /// Raw page snapshot, filled by a separate serialization step
    pub raw: Option<String>,

    pub others: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

impl HourseRecord {
    /// Returns true unless the listing has been soft-deleted
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> ListingRecord {
        ListingRecord {
            city: "台北市".to_string(),
            section: "大安區".to_string(),
            address: "仁愛路四段".to_string(),
            link: "https://buy.yungching.com.tw/house/1".to_string(),
            price: 1680,
            shape: "電梯大樓".to_string(),
            age: "25.1年".to_string(),
            floor: "5樓".to_string(),
            main_area: "28.5坪".to_string(),
            area: "40.1坪".to_string(),
            layout: "3房2廳".to_string(),
            notes: vec![],
        }
    }

    #[test]
    fn test_identity_is_stable() {
        assert_eq!(listing_identity(&listing()), listing_identity(&listing()));
    }

    #[test]
    fn test_case_number_from_link() {
        assert_eq!(
            case_number("https://buy.yungching.com.tw/house/1234567?kw=1").as_deref(),
            Some("1234567")
        );
        assert_eq!(
            case_number("https://buy.yungching.com.tw/house/1234567/").as_deref(),
            Some("1234567")
        );
        assert_eq!(case_number("https://buy.yungching.com.tw/house/"), None);
        assert_eq!(case_number("https://buy.yungching.com.tw/"), None);
        assert_eq!(case_number(""), None);
    }

    #[test]
    fn test_identity_follows_case_number() {
        let mut recrawled = listing();
        recrawled.link = "https://buy.yungching.com.tw/house/1?ref=list".to_string();
        recrawled.price = 1500;
        recrawled.age = "26.0年".to_string();
        recrawled.notes = vec!["降價".to_string()];

        assert_eq!(listing_identity(&listing()), listing_identity(&recrawled));
    }

    #[test]
    fn test_identity_separates_cases_on_same_street() {
        let mut neighbour = listing();
        neighbour.link = "https://buy.yungching.com.tw/house/2".to_string();
        assert_ne!(listing_identity(&listing()), listing_identity(&neighbour));
    }

    #[test]
    fn test_identity_without_link_tracks_unit_fields() {
        let mut unlinked = listing();
        unlinked.link = String::new();

        let mut repriced = unlinked.clone();
        repriced.price = 1500;
        assert_eq!(listing_identity(&unlinked), listing_identity(&repriced));

        let mut other = unlinked.clone();
        other.floor = "6樓".to_string();
        assert_ne!(listing_identity(&unlinked), listing_identity(&other));
    }
}
