//! Integration tests for the harvest pipeline
//!
//! These tests build saved-page style HTML documents and run them through the
//! public parser, pagination, and storage API end-to-end.

use hourse_harvest::dom::{DocumentRowCounter, DomElement, HtmlFragment};
use hourse_harvest::harvest::{harvest_documents, harvest_page};
use hourse_harvest::parser::{ListingParser, YungChing};
use hourse_harvest::storage::{listing_identity, SqliteStorage, Storage};
use hourse_harvest::{DomError, ExtractError};
use scraper::Html;
use tokio_util::sync::CancellationToken;

const FULL_DETAILS: [&str; 9] = [
    "電梯大樓",
    "25.1年",
    "3~5樓",
    "",
    "主 28.5 坪",
    "40.1坪",
    "3房2廳",
    "近捷運",
    "  ",
];

/// Renders one listing item the way the results page does
fn item(href: &str, price: &str, address: &str, details: &[&str]) -> String {
    let lis: String = details
        .iter()
        .map(|text| format!("<li>{}</li>", text))
        .collect();
    format!(
        r#"<li class="m-list-item">
            <a class="item-img ga_click_trace" href="{}"><img src="/p.jpg"></a>
            <div class="item-info">
                <div class="item-description"><h3>精選物件</h3><span>{}</span></div>
                <ul class="item-info-detail">{}</ul>
            </div>
            <div class="item-price"><span class="price-num">{}</span>萬</div>
        </li>"#,
        href, address, lis, price
    )
}

/// Renders a results page with the given total row count and items
fn results_page(total_rows: &str, items: &[String]) -> Html {
    Html::parse_document(&format!(
        r#"<html><body>
            <div class="list-filter-bar">
                <a class="list-filter is-first active ng-isolate-scope"><span>共 {} 筆</span></a>
                <a class="list-filter"><span>降價</span></a>
            </div>
            <ul class="l-item-list">{}</ul>
        </body></html>"#,
        total_rows,
        items.concat()
    ))
}

fn first_page() -> Html {
    results_page(
        "61",
        &[
            item("/house/1001", "1,680", "台北市大安區仁愛路四段", &FULL_DETAILS),
            item("https://ads.example/x", "990", "台北市信義區松仁路", &FULL_DETAILS),
            item("/house/1003", "2,200", "台北市中山區南京東路", &FULL_DETAILS[..8]),
            item("/house/1004", "1,250", "台北市北投區", &FULL_DETAILS),
        ],
    )
}

fn second_page() -> Html {
    results_page(
        "61",
        &[
            item("/house/2001", "3,000", "台北市文山區木柵路", &FULL_DETAILS),
            item("/house/2002", "880", "台北市萬華西園路", &FULL_DETAILS),
        ],
    )
}

#[test]
fn test_harvest_single_page() {
    let parser = YungChing::new("台北市");
    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let document = first_page();

    let summary = harvest_page(
        &parser,
        "https://buy.yungching.com.tw/region/台北市-_c/500-3000_price/_rm/?pg=1",
        &HtmlFragment::root(&document),
        &mut storage,
    )
    .unwrap();

    assert_eq!(summary.items, 4);
    assert_eq!(summary.stored, 2);
    assert_eq!(summary.skipped, 2);

    assert_eq!(storage.count_cities().unwrap(), 1);
    assert_eq!(storage.count_sections().unwrap(), 2);
    assert_eq!(storage.count_hourses().unwrap(), 2);

    let city = storage.get_city("台北市").unwrap().unwrap();
    let daan = storage.get_section(city.id, "大安區").unwrap().unwrap();
    let listings = storage.list_hourses(daan.id).unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].link, "https://buy.yungching.com.tw/house/1001");
    assert_eq!(listings[0].price, 1680);
    assert_eq!(listings[0].floor, "5樓");
    assert_eq!(listings[0].main_area.as_deref(), Some("主28.5坪"));
    assert_eq!(listings[0].others, vec!["近捷運".to_string()]);

    let beitou = storage.get_section(city.id, "北投區").unwrap().unwrap();
    let listings = storage.list_hourses(beitou.id).unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].address, None);
}

#[test]
fn test_same_street_listings_differ_by_link() {
    let parser = YungChing::new("台北市");
    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let document = results_page(
        "2",
        &[
            item("/house/1", "1,680", "台北市大安區仁愛路四段", &FULL_DETAILS),
            item("/house/2", "1,720", "台北市大安區仁愛路四段", &FULL_DETAILS),
        ],
    );

    let summary = harvest_page(&parser, "pg=1", &HtmlFragment::root(&document), &mut storage)
        .unwrap();

    assert_eq!(summary.stored, 2);
    assert_eq!(summary.duplicates, 0);
    assert_eq!(storage.count_hourses().unwrap() as usize, summary.stored);

    let city = storage.get_city("台北市").unwrap().unwrap();
    let daan = storage.get_section(city.id, "大安區").unwrap().unwrap();
    let prices: Vec<i64> = storage
        .list_hourses(daan.id)
        .unwrap()
        .iter()
        .map(|listing| listing.price)
        .collect();
    assert_eq!(prices, vec![1680, 1720]);
}

#[test]
fn test_colliding_items_counted_as_duplicates() {
    let parser = YungChing::new("台北市");
    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let document = results_page(
        "3",
        &[
            item("/house/7", "1,680", "台北市大安區仁愛路四段", &FULL_DETAILS),
            item("/house/7?ref=top", "1,650", "台北市大安區仁愛路四段", &FULL_DETAILS),
            item("/house/8", "990", "台北市大安區仁愛路四段", &FULL_DETAILS),
        ],
    );

    let summary = harvest_page(&parser, "pg=1", &HtmlFragment::root(&document), &mut storage)
        .unwrap();

    assert_eq!(summary.items, 3);
    assert_eq!(summary.stored, 2);
    assert_eq!(summary.duplicates, 1);
    assert_eq!(storage.count_hourses().unwrap() as usize, summary.stored);
}

#[test]
fn test_blank_href_stored_without_link() {
    let parser = YungChing::new("台北市");
    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let document = results_page(
        "1",
        &[item("", "1,680", "台北市大安區仁愛路四段", &FULL_DETAILS)],
    );

    let summary = harvest_page(&parser, "pg=1", &HtmlFragment::root(&document), &mut storage)
        .unwrap();
    assert_eq!(summary.stored, 1);

    let city = storage.get_city("台北市").unwrap().unwrap();
    let daan = storage.get_section(city.id, "大安區").unwrap().unwrap();
    let listings = storage.list_hourses(daan.id).unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].link, "");
}

#[test]
fn test_extraction_failures_are_named() {
    let parser = YungChing::new("台北市");
    let document = first_page();
    let root = HtmlFragment::root(&document);
    let items = root
        .query_selector_all(&ListingParser::<HtmlFragment>::item_selector(&parser))
        .unwrap();

    assert!(matches!(
        parser.extract(&items[1]),
        Err(ExtractError::MalformedLink { .. })
    ));
    assert!(matches!(
        parser.extract(&items[2]),
        Err(ExtractError::SchemaMismatch {
            expected: 9,
            found: 8,
            ..
        })
    ));
}

#[test]
fn test_harvest_documents_follows_pagination() {
    let parser = YungChing::new("台北市");
    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let documents = vec![first_page(), second_page()];

    let summary =
        harvest_documents(&parser, &documents, &mut storage, &CancellationToken::new()).unwrap();

    assert_eq!(summary.city, "台北市");
    assert_eq!(summary.total_pages, 3);
    assert_eq!(summary.pages.len(), 2);
    assert!(summary.pages[0].url.ends_with("?pg=1"));
    assert!(summary.pages[1].url.ends_with("?pg=2"));

    // "台北市萬華西園路" has no boundary glyph once the city is removed
    assert_eq!(summary.stored(), 3);
    assert_eq!(summary.skipped(), 3);
    assert_eq!(storage.count_hourses().unwrap(), 3);
}

#[test]
fn test_harvest_stops_after_last_page() {
    let parser = YungChing::new("台北市");
    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let single = results_page(
        "12",
        &[item("/house/1", "1,000", "台北市大安區仁愛路", &FULL_DETAILS)],
    );
    let documents = vec![single, second_page()];

    let summary =
        harvest_documents(&parser, &documents, &mut storage, &CancellationToken::new()).unwrap();

    assert_eq!(summary.total_pages, 1);
    assert_eq!(summary.pages.len(), 1);
    assert_eq!(storage.count_hourses().unwrap(), 1);
}

#[test]
fn test_recrawl_keeps_identity() {
    let parser = YungChing::new("台北市");
    let mut storage = SqliteStorage::new_in_memory().unwrap();

    let before = results_page(
        "1",
        &[item("/house/1", "1,680", "台北市大安區仁愛路四段", &FULL_DETAILS)],
    );
    let after = results_page(
        "1",
        &[item("/house/1?ref=2", "1,580", "台北市大安區仁愛路四段", &FULL_DETAILS)],
    );

    let cancel = CancellationToken::new();
    harvest_documents(&parser, &[before], &mut storage, &cancel).unwrap();
    harvest_documents(&parser, &[after], &mut storage, &cancel).unwrap();

    assert_eq!(storage.count_hourses().unwrap(), 1);

    let document = results_page(
        "1",
        &[item("/house/1", "1,580", "台北市大安區仁愛路四段", &FULL_DETAILS)],
    );
    let root = HtmlFragment::root(&document);
    let items = root.query_selector_all("li.m-list-item").unwrap();
    let record = parser.extract(&items[0]).unwrap();

    let stored = storage.get_hourse(&listing_identity(&record)).unwrap().unwrap();
    assert_eq!(stored.price, 1580);
    assert_eq!(stored.link, "https://buy.yungching.com.tw/house/1?ref=2");
}

#[test]
fn test_cancelled_harvest_stores_nothing() {
    let parser = YungChing::new("台北市");
    let mut storage = SqliteStorage::new_in_memory().unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = harvest_documents(&parser, &[first_page()], &mut storage, &cancel);

    assert!(matches!(
        result,
        Err(hourse_harvest::HarvestError::Dom(DomError::Cancelled { .. }))
    ));
    assert_eq!(storage.count_hourses().unwrap(), 0);
}

#[test]
fn test_document_row_counter_with_parser_selector() {
    let parser = YungChing::new("台北市");
    let document = first_page();
    let mut pagination = ListingParser::<HtmlFragment>::new_pagination(&parser);

    ListingParser::<HtmlFragment>::set_total_row(
        &parser,
        &mut pagination,
        &CancellationToken::new(),
        &mut DocumentRowCounter::new(&document),
    )
    .unwrap();

    assert_eq!(pagination.total_pages(), 3);
    assert!(pagination.has_next());
}

#[test]
fn test_on_disk_storage_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hourse.db");
    let parser = YungChing::new("台北市");

    {
        let mut storage = SqliteStorage::new(&path).unwrap();
        harvest_documents(
            &parser,
            &[first_page()],
            &mut storage,
            &CancellationToken::new(),
        )
        .unwrap();
    }

    let storage = SqliteStorage::new(&path).unwrap();
    assert_eq!(storage.count_hourses().unwrap(), 2);
}
