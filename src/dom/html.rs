//! `scraper`-backed implementation of the DOM capability

use crate::dom::{leading_number, DomElement, RowCounter};
use crate::DomError;
use scraper::{ElementRef, Html, Selector};
use tokio_util::sync::CancellationToken;

/// An element of a parsed HTML document
#[derive(Debug, Clone, Copy)]
pub struct HtmlFragment<'a> {
    element: ElementRef<'a>,
}

impl<'a> HtmlFragment<'a> {
    /// Wraps an element reference
    pub fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// Returns the root element of a parsed document
    pub fn root(document: &'a Html) -> Self {
        Self::new(document.root_element())
    }
}

/// Parses a selector string, mapping parse failures into `DomError`
fn parse_selector(selector: &str) -> Result<Selector, DomError> {
    Selector::parse(selector).map_err(|e| DomError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

impl<'a> DomElement for HtmlFragment<'a> {
    fn query_selector(&self, selector: &str) -> Result<Option<Self>, DomError> {
        let parsed = parse_selector(selector)?;
        Ok(self.element.select(&parsed).next().map(Self::new))
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<Self>, DomError> {
        let parsed = parse_selector(selector)?;
        Ok(self.element.select(&parsed).map(Self::new).collect())
    }

    fn get_attribute(&self, name: &str) -> Result<Option<String>, DomError> {
        Ok(self.element.value().attr(name).map(str::to_string))
    }

    fn text_content(&self) -> Result<String, DomError> {
        Ok(self.element.text().collect())
    }
}

/// Reads the total row count from a results page
///
/// The count is the first number in the text of the first element matching
/// the lookup selector, e.g. `"共 1,234 筆 (第1頁)"` yields 1234.
pub struct DocumentRowCounter<'a> {
    root: HtmlFragment<'a>,
}

impl<'a> DocumentRowCounter<'a> {
    pub fn new(document: &'a Html) -> Self {
        Self {
            root: HtmlFragment::root(document),
        }
    }
}

impl<'a> RowCounter for DocumentRowCounter<'a> {
    fn fetch_row_count(
        &mut self,
        cancel: &CancellationToken,
        selector: &str,
    ) -> Result<u64, DomError> {
        if cancel.is_cancelled() {
            return Err(DomError::Cancelled {
                selector: selector.to_string(),
            });
        }

        let element = self
            .root
            .query_selector(selector)?
            .ok_or_else(|| DomError::Query {
                selector: selector.to_string(),
                message: "row-count element not found".to_string(),
            })?;

        let text = element.text_content()?;
        leading_number(&text).ok_or_else(|| DomError::Query {
            selector: selector.to_string(),
            message: format!("no row count in '{}'", text.trim()),
        })
    }
}
