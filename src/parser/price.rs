use crate::dom::{leading_number, DomElement};
use crate::{ExtractError, ExtractResult};

/// Reads the integer price shown under `selector`
///
/// Only the first number of the element text counts. Thousands separators and
/// unit text are dropped and any fractional part is ignored, so
/// `"1,288.5 萬 (車位 2.5 萬)"` yields 1288.
pub fn parse_price<E: DomElement>(item: &E, selector: &str) -> ExtractResult<i64> {
    let element = item
        .query_selector(selector)?
        .ok_or_else(|| ExtractError::MissingElement {
            field: "price",
            selector: selector.to_string(),
        })?;

    let text = element.text_content()?;
    leading_number(&text)
        .and_then(|price| i64::try_from(price).ok())
        .ok_or_else(|| ExtractError::InvalidPrice {
            selector: selector.to_string(),
            text: text.trim().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HtmlFragment;
    use scraper::Html;

    fn price_of(html: &str) -> ExtractResult<i64> {
        let document = Html::parse_fragment(html);
        parse_price(&HtmlFragment::root(&document), "span.price-num")
    }

    #[test]
    fn test_plain_price() {
        assert_eq!(price_of(r#"<span class="price-num">1988</span>"#).unwrap(), 1988);
    }

    #[test]
    fn test_price_with_separator() {
        assert_eq!(
            price_of(r#"<span class="price-num"> 2,680 </span>"#).unwrap(),
            2680
        );
    }

    #[test]
    fn test_price_fraction_dropped() {
        assert_eq!(
            price_of(r#"<span class="price-num">1,288.5萬</span>"#).unwrap(),
            1288
        );
    }

    #[test]
    fn test_price_ignores_parking_note() {
        assert_eq!(
            price_of(r#"<span class="price-num">1,288 萬 (車位 2.5 萬)</span>"#).unwrap(),
            1288
        );
    }

    #[test]
    fn test_missing_price() {
        let result = price_of(r#"<span class="other">1988</span>"#);
        assert!(matches!(
            result,
            Err(ExtractError::MissingElement { field: "price", .. })
        ));
    }

    #[test]
    fn test_price_without_digits() {
        let result = price_of(r#"<span class="price-num">洽詢</span>"#);
        assert!(matches!(result, Err(ExtractError::InvalidPrice { .. })));
    }
}
