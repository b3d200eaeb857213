//! Bounded string similarity over normalized addresses.

/// Upper bound of the score; only identical strings reach it.
pub const MAX_SCORE: u8 = 100;

/// Levenshtein similarity of two strings on a 0–100 scale.
///
/// Computed as `floor(100 * (max_len - distance) / max_len)` over chars, in
/// integer arithmetic, so `similarity(a, b) >= t` holds exactly when the
/// true ratio is at least `t` percent. Two empty strings score 100.
///
/// # Examples
///
/// ```
/// use parcel_core::similarity;
///
/// assert_eq!(similarity("123 Main St", "123 Main St"), 100);
/// assert_eq!(similarity("abcd", "abce"), 75);
/// assert_eq!(similarity("abc", ""), 0);
/// ```
pub fn similarity(a: &str, b: &str) -> u8 {
    if a == b {
        return MAX_SCORE;
    }
    let max_len = a.chars().count().max(b.chars().count());
    let distance = strsim::levenshtein(a, b);
    score_from_distance(distance, max_len)
}

/// Best score reachable by two strings of the given char lengths.
///
/// The edit distance is at least the length difference, so this bounds
/// [`similarity`] from above without computing the distance.
pub fn max_possible_score(left_len: usize, right_len: usize) -> u8 {
    let max_len = left_len.max(right_len);
    score_from_distance(max_len - left_len.min(right_len), max_len)
}

fn score_from_distance(distance: usize, max_len: usize) -> u8 {
    if max_len == 0 {
        return MAX_SCORE;
    }
    let matched = max_len.saturating_sub(distance);
    // matched <= max_len, so the quotient is at most 100
    ((matched * usize::from(MAX_SCORE)) / max_len) as u8
}
