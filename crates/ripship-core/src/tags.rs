//! Helpers for Shopify's comma-separated order tag string.

/// Splits a tag string on commas, trims each tag, and drops empties.
/// Order is preserved.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Returns `true` if `marker` is one of the tags in `raw`.
///
/// Shopify treats tags case-insensitively, so the comparison does too.
#[must_use]
pub fn has_tag(raw: &str, marker: &str) -> bool {
    let marker = marker.trim();
    parse_tags(raw)
        .iter()
        .any(|t| t.eq_ignore_ascii_case(marker))
}

/// Appends `marker` to the tag set in `raw`.
///
/// Returns the new tag string to write back, or `None` when the marker is
/// already present and nothing needs writing.
#[must_use]
pub fn with_tag(raw: &str, marker: &str) -> Option<String> {
    if has_tag(raw, marker) {
        return None;
    }
    let mut tags = parse_tags(raw);
    tags.push(marker.trim().to_owned());
    Some(tags.join(", "))
}
