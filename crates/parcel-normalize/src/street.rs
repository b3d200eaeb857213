//! Street component helpers: designator standardization and house numbers.

/// Abbreviate suffix, directional and unit designators in a normalized street.
///
/// Expects the output of [`normalize_string`](crate::normalize_string). The
/// first word is never rewritten so that a street named after a designator
/// ("North Ave", "Court St") keeps its name when no house number is present.
pub fn standardize_street(normalized: &str) -> String {
    let mut out = String::with_capacity(normalized.len());
    for (idx, word) in normalized.split(' ').enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        let replacement = if idx == 0 { None } else { designator(word) };
        out.push_str(replacement.unwrap_or(word));
    }
    out
}

/// USPS-style abbreviation for a title-cased word, if it has one.
fn designator(word: &str) -> Option<&'static str> {
    let abbreviation = match word {
        "Street" => "St",
        "Avenue" | "Av" => "Ave",
        "Road" => "Rd",
        "Boulevard" => "Blvd",
        "Drive" => "Dr",
        "Lane" => "Ln",
        "Court" => "Ct",
        "Place" => "Pl",
        "Terrace" => "Ter",
        "Parkway" => "Pkwy",
        "Highway" => "Hwy",
        "Circle" => "Cir",
        "Trail" => "Trl",
        "Square" => "Sq",
        "Apartment" => "Apt",
        "Suite" => "Ste",
        "North" => "N",
        "South" => "S",
        "East" => "E",
        "West" => "W",
        "Northeast" | "Ne" => "NE",
        "Northwest" | "Nw" => "NW",
        "Southeast" | "Se" => "SE",
        "Southwest" | "Sw" => "SW",
        _ => return None,
    };
    Some(abbreviation)
}

/// Leading house number of a raw street field.
///
/// Takes the first whitespace-separated token and parses its leading ASCII
/// digit run: `"123A Main"` yields `123`. Returns `None` when the token does
/// not start with a digit, or the digits overflow `u64`.
pub fn street_number(street: &str) -> Option<u64> {
    let token = street.split_whitespace().next()?;
    let digits_end = token
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map_or(token.len(), |(idx, _)| idx);
    if digits_end == 0 {
        return None;
    }
    token[..digits_end].parse().ok()
}
