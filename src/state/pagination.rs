//! Pagination state for one listing parser
//!
//! The state is created once per parser instance and driven by exactly one
//! crawl loop through `&mut`. The total page count moves from unknown (0) to
//! known exactly once.
use crate::dom::RowCounter;
use crate::DomError;
use tokio_util::sync::CancellationToken;

/// Current page, total page count, and page size of a paginated search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    current_page: u32,
    total_pages: u32,
    page_size: u32,
}

impl Pagination {
    /// Creates a pagination state positioned on page 1 with an unknown total
    ///
    /// A zero page size is treated as one.
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            page_size: page_size.max(1),
        }
    }

    /// The 1-based page the crawl loop is currently on
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Total page count, 0 while unknown
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns true if the total page count has been resolved
    pub fn is_total_known(&self) -> bool {
        self.total_pages != 0
    }

    /// Returns true while more pages remain to be crawled
    ///
    /// Always true while the total is unknown, so the crawl loop must resolve
    /// the row count of at least one page before relying on this.
    pub fn has_next(&self) -> bool {
        self.total_pages == 0 || self.current_page < self.total_pages
    }

    /// Moves to the next page
    ///
    /// There is no upper-bound check; stop calling once `has_next` is false.
    pub fn advance(&mut self) {
        self.current_page += 1;
    }

    /// Resolves the total page count from the row-count lookup
    ///
    /// Does nothing once the total is known. Otherwise the lookup is invoked
    /// with `selector` and the total becomes `ceil(rows / page_size)`.
    ///
    /// # Errors
    ///
    /// * `DomError::Cancelled` - `cancel` was triggered before the lookup
    /// * Any error returned by the lookup itself, unchanged
    pub fn set_total_row(
        &mut self,
        cancel: &CancellationToken,
        selector: &str,
        counter: &mut dyn RowCounter,
    ) -> Result<(), DomError> {
        if self.is_total_known() {
            return Ok(());
        }

        if cancel.is_cancelled() {
            return Err(DomError::Cancelled {
                selector: selector.to_string(),
            });
        }

        let rows = counter.fetch_row_count(cancel, selector)?;
        self.total_pages = Self::pages_for(rows, self.page_size);

        tracing::debug!(
            "Resolved {} rows into {} pages of {}",
            rows,
            self.total_pages,
            self.page_size
        );

        Ok(())
    }

    /// Number of pages needed for `rows` rows
    fn pages_for(rows: u64, page_size: u32) -> u32 {
        let page_size = u64::from(page_size);
        let extra = u64::from(rows % page_size != 0);
        u32::try_from(rows / page_size + extra).unwrap_or(u32::MAX)
    }
}
