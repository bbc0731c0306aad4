//! Address and detail-field normalization
//!
//! These helpers are site-agnostic; the selectors that locate the elements
//! belong to each parser.

use crate::dom::DomElement;
use crate::{ExtractError, ExtractResult};

/// Glyphs ending an administrative section: township, town, city district,
/// urban district
pub const SECTION_BOUNDARIES: [char; 4] = ['鄉', '鎮', '市', '區'];

/// Splits a raw address into its section and the remaining address
///
/// The first occurrence of `city` is dropped, then the section runs up to and
/// including the first boundary glyph.
///
/// # Examples
///
/// ```
/// use hourse_harvest::parser::split_address;
///
/// let (section, rest) = split_address("台北市大安區仁愛路四段", "台北市").unwrap();
/// assert_eq!(section, "大安區");
/// assert_eq!(rest, "仁愛路四段");
/// ```
pub fn split_address(text: &str, city: &str) -> ExtractResult<(String, String)> {
    let address = text.trim().replacen(city, "", 1);

    let end = address
        .char_indices()
        .find(|(_, c)| SECTION_BOUNDARIES.contains(c))
        .map(|(idx, c)| idx + c.len_utf8())
        .ok_or_else(|| ExtractError::BoundaryNotFound {
            field: "address",
            text: text.trim().to_string(),
        })?;

    let (section, rest) = address.split_at(end);
    Ok((section.to_string(), rest.to_string()))
}

/// Trims a detail field and removes every interior space
pub fn clean_field(text: &str) -> String {
    text.trim().replace(' ', "")
}

/// Keeps the upper bound of a floor range such as `"3~5"`
pub fn normalize_floor(raw: &str) -> String {
    raw.rsplit('~').next().unwrap_or(raw).to_string()
}

/// Fixed-position fields of a listing's detail list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    pub shape: String,
    pub age: String,
    pub floor: String,
    pub main_area: String,
    pub area: String,
    pub layout: String,
    pub notes: Vec<String>,
}

impl DetailFields {
    /// Number of slots the detail list always carries
    pub const SLOTS: usize = 9;

    /// Slots holding optional free text
    const NOTE_SLOTS: [usize; 3] = [3, 7, 8];

    /// Maps the children of a detail list onto named fields
    ///
    /// # Slot Layout
    ///
    /// | Slot | Field |
    /// |------|-------|
    /// | 0 | shape |
    /// | 1 | age |
    /// | 2 | floor |
    /// | 3, 7, 8 | notes |
    /// | 4 | main area |
    /// | 5 | area |
    /// | 6 | layout |
    ///
    /// Any other number of children is a `SchemaMismatch`: the mapping is only
    /// valid for the nine-slot layout.
    pub fn from_items<E: DomElement>(items: &[E], selector: &str) -> ExtractResult<Self> {
        if items.len() != Self::SLOTS {
            return Err(ExtractError::SchemaMismatch {
                selector: selector.to_string(),
                expected: Self::SLOTS,
                found: items.len(),
            });
        }

        let field = |idx: usize| -> ExtractResult<String> {
            Ok(clean_field(&items[idx].text_content()?))
        };

        let mut notes = Vec::new();
        for idx in Self::NOTE_SLOTS {
            let text = items[idx].text_content()?;
            let text = text.trim();
            if !text.is_empty() {
                notes.push(text.to_string());
            }
        }

        Ok(Self {
            shape: field(0)?,
            age: field(1)?,
            floor: normalize_floor(&field(2)?),
            main_area: field(4)?,
            area: field(5)?,
            layout: field(6)?,
            notes,
        })
    }
}
