//! Tag normalization.
//!
//! Tags are written normalized (trimmed, lowercase, deduplicated in
//! first-seen order) and stored as one comma-joined string. Reading the
//! string back only splits and trims; it never re-deduplicates.

pub const TAG_SEPARATOR: char = ',';

/// Canonicalize raw tag input.
pub fn normalize<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let tag = tag.as_ref().trim().to_lowercase();
        if tag.is_empty() || tags.contains(&tag) {
            continue;
        }
        tags.push(tag);
    }
    tags
}

/// Normalize and join for storage.
pub fn to_tag_string<I, S>(raw: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    normalize(raw).join(",")
}

/// Split a stored (or typed) tag string.
pub fn parse_tag_string(value: &str) -> Vec<String> {
    value
        .split(TAG_SEPARATOR)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_lowercases_and_dedupes() {
        let tags = normalize([" Work", "urgent ", "", "WORK", "  ", "home"]);
        assert_eq!(tags, vec!["work", "urgent", "home"]);
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize(["B", "a", " b ", "C", "a"]);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn tag_string_round_trips_normalized_tags() {
        let stored = to_tag_string(["Errand", "errand", "Shop"]);
        assert_eq!(stored, "errand,shop");
        assert_eq!(parse_tag_string(&stored), vec!["errand", "shop"]);
    }

    #[test]
    fn parse_does_not_dedupe_or_lowercase() {
        assert_eq!(
            parse_tag_string("a, A ,,a"),
            vec!["a".to_string(), "A".to_string(), "a".to_string()]
        );
    }

    #[test]
    fn parse_empty_string_yields_no_tags() {
        assert!(parse_tag_string("").is_empty());
        assert!(parse_tag_string(" , ").is_empty());
    }
}
