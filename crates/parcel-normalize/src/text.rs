//! Free-text canonicalization.

/// Canonicalize free text for comparison.
///
/// Punctuation is removed, whitespace runs collapse to one space, the result
/// is trimmed, and every word is title-cased.
///
/// # Examples
///
/// ```
/// use parcel_normalize::normalize_string;
///
/// assert_eq!(normalize_string("  123  MAIN st.  "), "123 Main St");
/// assert_eq!(normalize_string("o'fallon"), "Ofallon");
/// assert_eq!(normalize_string("..."), "");
/// ```
pub fn normalize_string(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        let cleaned: String = word.chars().filter(|ch| !is_punctuation(*ch)).collect();
        if cleaned.is_empty() {
            continue;
        }
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        push_title_case(&mut normalized, &cleaned);
    }
    normalized
}

/// Anything that is neither a letter, a digit, nor whitespace.
pub fn is_punctuation(ch: char) -> bool {
    !ch.is_alphanumeric() && !ch.is_whitespace()
}

fn push_title_case(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        for ch in chars {
            out.extend(ch.to_lowercase());
        }
    }
}
