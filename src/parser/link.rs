//! Detail-page link resolution

use crate::dom::DomElement;
use crate::{ExtractError, ExtractResult};
use url::{ParseError, Url};

/// Resolves the detail-page URL of a listing item
///
/// # Link Rules
///
/// | Condition | Result |
/// |-----------|--------|
/// | No element matches `selector` | `Ok("")` |
/// | Element has no `href`, or a blank one | `Ok("")` |
/// | `href` carries a scheme | `MalformedLink` |
/// | Relative `href` | resolved against `origin` |
///
/// Listing items on the site only ever carry relative links, so an absolute one
/// means the markup changed.
pub fn resolve_link<E: DomElement>(
    item: &E,
    selector: &str,
    origin: &Url,
) -> ExtractResult<String> {
    let Some(anchor) = item.query_selector(selector)? else {
        return Ok(String::new());
    };

    let Some(href) = anchor.get_attribute("href")? else {
        tracing::debug!("Anchor '{}' has no href", selector);
        return Ok(String::new());
    };
    let href = href.trim();
    if href.is_empty() {
        tracing::debug!("Anchor '{}' has an empty href", selector);
        return Ok(String::new());
    }

    match Url::parse(href) {
        Ok(_) => Err(ExtractError::MalformedLink {
            selector: selector.to_string(),
            href: href.to_string(),
        }),
        Err(ParseError::RelativeUrlWithoutBase) => origin
            .join(href)
            .map(String::from)
            .map_err(|source| ExtractError::UnresolvableLink {
                href: href.to_string(),
                source,
            }),
        Err(source) => Err(ExtractError::UnresolvableLink {
            href: href.to_string(),
            source,
        }),
    }
}
