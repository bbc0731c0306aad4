//! DOM-query capability consumed by the listing parsers
//!
//! The parsers never touch a concrete browser or HTML engine. They only see
//! elements through `DomElement`, and the one-time total-row lookup through
//! `RowCounter`. `HtmlFragment` adapts `scraper` so saved result pages can be
//! processed offline.

mod html;

pub use html::{DocumentRowCounter, HtmlFragment};

use crate::DomError;
use tokio_util::sync::CancellationToken;

/// Query operations on one element of a page
///
/// All operations are fallible. A missing element or attribute is reported as
/// `Ok(None)` and is never an error by itself.
pub trait DomElement: Sized {
    /// Returns the first descendant matching `selector`
    fn query_selector(&self, selector: &str) -> Result<Option<Self>, DomError>;

    /// Returns every descendant matching `selector`, in document order
    fn query_selector_all(&self, selector: &str) -> Result<Vec<Self>, DomError>;

    /// Reads an attribute of this element
    fn get_attribute(&self, name: &str) -> Result<Option<String>, DomError>;

    /// Returns the concatenated text of this element and its descendants
    fn text_content(&self) -> Result<String, DomError>;
}

/// Lookup of the total number of result rows for a search
///
/// Called at most once per pagination state. The cancellation token is the
/// only cancellation point the extraction core offers.
pub trait RowCounter {
    fn fetch_row_count(
        &mut self,
        cancel: &CancellationToken,
        selector: &str,
    ) -> Result<u64, DomError>;
}

impl<F> RowCounter for F
where
    F: FnMut(&CancellationToken, &str) -> Result<u64, DomError>,
{
    fn fetch_row_count(
        &mut self,
        cancel: &CancellationToken,
        selector: &str,
    ) -> Result<u64, DomError> {
        self(cancel, selector)
    }
}

/// Reads the first number in `text`, skipping thousands separators
///
/// Only the first run of digits and commas counts, so a fractional part or any
/// later number is ignored: `"1,288.5 萬 (車位 2.5 萬)"` yields 1288.
pub(crate) fn leading_number(text: &str) -> Option<u64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(char::is_ascii_digit)
        .collect();

    digits.parse().ok()
}
