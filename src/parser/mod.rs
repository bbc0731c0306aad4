//! Listing parsers for search-result pages
//!
//! This module turns the item fragments of a results page into listing records:
//! - Link resolution against the site origin
//! - Price extraction
//! - Address splitting into section and remainder
//! - Fixed-position detail fields and free-text notes
//!
//! Each source site is one `ListingParser` implementation. The crawl loop only
//! ever talks to a parser through the trait.

mod fields;
mod link;
mod price;
mod yungching;

pub use fields::{clean_field, normalize_floor, split_address, DetailFields, SECTION_BOUNDARIES};
pub use link::resolve_link;
pub use price::parse_price;
pub use yungching::{YungChing, YungChingSelectors, SITE_ORIGIN};

use crate::dom::{DomElement, RowCounter};
use crate::state::Pagination;
use crate::{DomError, ExtractResult};
use tokio_util::sync::CancellationToken;

/// One listing extracted from a results page
///
/// Built fresh for every item on every pass and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRecord {
    /// City the search was run for
    pub city: String,

    /// Administrative section, e.g. "大安區"
    pub section: String,

    /// Address with the city and section removed
    pub address: String,

    /// Absolute detail-page URL, empty when the item has no link
    pub link: String,

    pub price: i64,
    pub shape: String,
    pub age: String,

    /// Upper floor when the listing spans a range
    pub floor: String,

    pub main_area: String,
    pub area: String,
    pub layout: String,

    /// Non-blank free-text notes in position order
    pub notes: Vec<String>,
}

/// Per-site extraction capability driven by the crawl loop
pub trait ListingParser<E: DomElement> {
    /// Short name of the source site
    fn name(&self) -> &str;

    /// City this parser searches
    fn city(&self) -> &str;

    /// Fresh pagination state sized for this site
    fn new_pagination(&self) -> Pagination;

    /// Request URL for the page `pagination` is on
    fn page_url(&self, pagination: &Pagination) -> String;

    /// Selector matching one listing item fragment
    fn item_selector(&self) -> String;

    /// Selector handed to the row-count lookup
    fn total_selector(&self) -> String;

    /// Builds a listing record from one item fragment
    ///
    /// Any failure discards the whole item.
    fn extract(&self, item: &E) -> ExtractResult<ListingRecord>;

    /// Resolves the total page count once per pagination state
    fn set_total_row(
        &self,
        pagination: &mut Pagination,
        cancel: &CancellationToken,
        counter: &mut dyn RowCounter,
    ) -> Result<(), DomError> {
        pagination.set_total_row(cancel, &self.total_selector(), counter)
    }
}
