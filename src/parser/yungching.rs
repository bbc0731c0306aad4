//! Parser for the buy.yungching.com.tw search results
//!
//! Results pages look like
//! `https://buy.yungching.com.tw/region/台北市-_c/1000-3000_price/_rm/?pg=2`,
//! thirty listings per page.

use crate::config::SearchConfig;
use crate::dom::DomElement;
use crate::parser::fields::{split_address, DetailFields};
use crate::parser::link::resolve_link;
use crate::parser::price::parse_price;
use crate::parser::{ListingParser, ListingRecord};
use crate::selector::QuerySelector;
use crate::state::Pagination;
use crate::{ExtractError, ExtractResult};
use url::Url;

/// Origin every relative listing link resolves against
pub const SITE_ORIGIN: &str = "https://buy.yungching.com.tw";

const DEFAULT_PAGE_SIZE: u32 = 30;
const DEFAULT_MIN_PRICE: u32 = 500;
const DEFAULT_MAX_PRICE: u32 = 3000;

/// Direct children of the detail list
const DETAIL_ITEM_SELECTOR: &str = ":scope > li";

/// Element descriptors for the site's result markup
#[derive(Debug, Clone)]
pub struct YungChingSelectors {
    pub list_item: QuerySelector,
    pub link: QuerySelector,
    pub total: QuerySelector,
    pub address: QuerySelector,
    pub detail: QuerySelector,
    pub price: QuerySelector,
}

impl Default for YungChingSelectors {
    fn default() -> Self {
        Self {
            list_item: QuerySelector::new("li").with_classes(&["m-list-item"]),
            link: QuerySelector::new("a").with_classes(&["item-img", "ga_click_trace"]),
            total: QuerySelector::new("a")
                .with_classes(&["list-filter", "is-first", "active", "ng-isolate-scope"])
                .with_descendants(&["span"]),
            address: QuerySelector::new("div")
                .with_classes(&["item-description"])
                .with_descendants(&["span"]),
            detail: QuerySelector::new("ul").with_classes(&["item-info-detail"]),
            price: QuerySelector::new("span").with_classes(&["price-num"]),
        }
    }
}

/// Listing parser for one city on buy.yungching.com.tw
#[derive(Debug, Clone)]
pub struct YungChing {
    city: String,
    min_price: u32,
    max_price: u32,
    page_size: u32,
    base_url: Url,
    selectors: YungChingSelectors,
}

impl YungChing {
    /// Creates a parser for `city` with the site's default price window
    pub fn new(city: &str) -> Self {
        let base_url = Url::parse(SITE_ORIGIN).expect("SITE_ORIGIN is a valid URL");
        Self::with_base_url(city, base_url)
    }

    /// Creates a parser for `city` against a different origin
    pub fn with_base_url(city: &str, base_url: Url) -> Self {
        Self {
            city: city.to_string(),
            min_price: DEFAULT_MIN_PRICE,
            max_price: DEFAULT_MAX_PRICE,
            page_size: DEFAULT_PAGE_SIZE,
            base_url,
            selectors: YungChingSelectors::default(),
        }
    }

    /// Creates a parser for `city` from the search settings
    pub fn from_config(city: &str, base_url: Url, search: &SearchConfig) -> Self {
        Self {
            min_price: search.min_price,
            max_price: search.max_price,
            page_size: search.page_size,
            ..Self::with_base_url(city, base_url)
        }
    }

    pub fn selectors(&self) -> &YungChingSelectors {
        &self.selectors
    }

    /// Reads the address element and splits it into section and remainder
    fn address<E: DomElement>(&self, item: &E) -> ExtractResult<(String, String)> {
        let selector = self.selectors.address.build();
        let element = item
            .query_selector(&selector)?
            .ok_or(ExtractError::MissingElement {
                field: "address",
                selector,
            })?;

        split_address(&element.text_content()?, &self.city)
    }

    /// Reads the nine-slot detail list
    fn details<E: DomElement>(&self, item: &E) -> ExtractResult<DetailFields> {
        let selector = self.selectors.detail.build();
        let list = item
            .query_selector(&selector)?
            .ok_or_else(|| ExtractError::MissingElement {
                field: "detail",
                selector: selector.clone(),
            })?;

        let items = list.query_selector_all(DETAIL_ITEM_SELECTOR)?;
        DetailFields::from_items(&items, &selector)
    }
}

impl<E: DomElement> ListingParser<E> for YungChing {
    fn name(&self) -> &str {
        "yungching"
    }

    fn city(&self) -> &str {
        &self.city
    }

    fn new_pagination(&self) -> Pagination {
        Pagination::new(self.page_size)
    }

    fn page_url(&self, pagination: &Pagination) -> String {
        format!(
            "{}/region/{}-_c/{}-{}_price/_rm/?pg={}",
            self.base_url.as_str().trim_end_matches('/'),
            self.city,
            self.min_price,
            self.max_price,
            pagination.current_page()
        )
    }

    fn item_selector(&self) -> String {
        self.selectors.list_item.build()
    }

    fn total_selector(&self) -> String {
        self.selectors.total.build()
    }

    fn extract(&self, item: &E) -> ExtractResult<ListingRecord> {
        let link = resolve_link(item, &self.selectors.link.build(), &self.base_url)?;
        let price = parse_price(item, &self.selectors.price.build())?;
        let (section, address) = self.address(item)?;
        let details = self.details(item)?;

        Ok(ListingRecord {
            city: self.city.clone(),
            section,
            address,
            link,
            price,
            shape: details.shape,
            age: details.age,
            floor: details.floor,
            main_area: details.main_area,
            area: details.area,
            layout: details.layout,
            notes: details.notes,
        })
    }
}
