//! Page-level harvest loop
//!
//! This module wires a listing parser to the store:
//! - Locating item fragments on a results page
//! - Extracting each item, skipping the ones that fail
//! - Persisting successful records under city and section
//! - Driving pagination across consecutive results pages
//!
//! A failed item only discards that item; the rest of the page is still
//! harvested. Collaborator and storage errors abort the page.

use crate::dom::{DocumentRowCounter, DomElement, HtmlFragment};
use crate::parser::ListingParser;
use crate::storage::Storage;
use crate::HarvestError;
use scraper::Html;
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;

/// Outcome of harvesting one results page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSummary {
    /// Request URL of the page
    pub url: String,

    /// Item fragments found on the page
    pub items: usize,

    /// Items turned into records and stored
    pub stored: usize,

    /// Items discarded because extraction failed
    pub skipped: usize,

    /// Items that mapped onto a row already stored from this page
    pub duplicates: usize,
}

/// Outcome of harvesting the pages of one city
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    pub city: String,

    /// Total page count reported by the site, 0 if never resolved
    pub total_pages: u32,

    pub pages: Vec<PageSummary>,
}

impl HarvestSummary {
    pub fn stored(&self) -> usize {
        self.pages.iter().map(|page| page.stored).sum()
    }

    pub fn skipped(&self) -> usize {
        self.pages.iter().map(|page| page.skipped).sum()
    }

    pub fn duplicates(&self) -> usize {
        self.pages.iter().map(|page| page.duplicates).sum()
    }
}

/// Harvests every listing item below `page` into `storage`
///
/// # Errors
///
/// Fails if the item query itself fails or a record cannot be stored. Items
/// whose extraction fails are logged and counted as skipped. An item whose
/// identity collides with one stored earlier on the same page overwrites that
/// row and is counted as a duplicate, so `stored` matches the rows written.
pub fn harvest_page<E, P, S>(
    parser: &P,
    url: &str,
    page: &E,
    storage: &mut S,
) -> Result<PageSummary, HarvestError>
where
    E: DomElement,
    P: ListingParser<E> + ?Sized,
    S: Storage + ?Sized,
{
    let items = page.query_selector_all(&parser.item_selector())?;
    let mut summary = PageSummary {
        url: url.to_string(),
        items: items.len(),
        ..PageSummary::default()
    };

    let mut seen = HashSet::new();
    for (idx, item) in items.iter().enumerate() {
        match parser.extract(item) {
            Ok(record) => {
                let stored = storage.store_listing(&record)?;
                if !seen.insert(stored.universal_id) {
                    tracing::warn!(
                        "Item {} on {} collides with listing {} ({})",
                        idx,
                        url,
                        stored.universal_id,
                        record.link
                    );
                    summary.duplicates += 1;
                    continue;
                }

                tracing::debug!(
                    "Stored {} {}{} as {}",
                    record.city,
                    record.section,
                    record.address,
                    stored.universal_id
                );
                summary.stored += 1;
            }
            Err(e) => {
                tracing::warn!("Skipping item {} on {}: {}", idx, url, e);
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}

/// Harvests consecutive results pages of one city, starting at page 1
///
/// The total page count is resolved from the first page. Harvesting stops once
/// the last page has been processed or the documents run out.
pub fn harvest_documents<P, S>(
    parser: &P,
    documents: &[Html],
    storage: &mut S,
    cancel: &CancellationToken,
) -> Result<HarvestSummary, HarvestError>
where
    P: for<'a> ListingParser<HtmlFragment<'a>>,
    S: Storage + ?Sized,
{
    let mut pagination = parser.new_pagination();
    let mut summary = HarvestSummary {
        city: parser.city().to_string(),
        ..HarvestSummary::default()
    };

    for document in documents {
        let url = parser.page_url(&pagination);
        parser.set_total_row(
            &mut pagination,
            cancel,
            &mut DocumentRowCounter::new(document),
        )?;

        let page = harvest_page(parser, &url, &HtmlFragment::root(document), storage)?;
        tracing::info!(
            "{} page {}/{} of {}: {} stored, {} skipped, {} duplicates",
            parser.name(),
            pagination.current_page(),
            pagination.total_pages(),
            summary.city,
            page.stored,
            page.skipped,
            page.duplicates
        );
        summary.pages.push(page);

        if !pagination.has_next() {
            break;
        }
        pagination.advance();
    }

    summary.total_pages = pagination.total_pages();
    Ok(summary)
}
