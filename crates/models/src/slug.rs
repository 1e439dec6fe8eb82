//! Slug derivation for service titles.
//!
//! A slug is the URL-safe form of a title: lower-cased, runs of
//! non-alphanumeric characters collapsed to single hyphens, leading and
//! trailing hyphens trimmed. Derivation is deterministic so re-saving a
//! record with an unchanged title never moves its URL.

/// Derive a slug from a title.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for ch in title.chars() {
        if ch.is_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn collapses_punctuation_runs() {
        assert_eq!(slugify("Environmental Audit Services!"), "environmental-audit-services");
        assert_eq!(slugify("  A --- B  "), "a-b");
    }

    #[test]
    fn trims_leading_and_trailing_separators() {
        assert_eq!(slugify("!!Hello, World!!"), "hello-world");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn is_deterministic() {
        let t = "Carbon Footprint (2024) Review";
        assert_eq!(slugify(t), slugify(t));
        assert_eq!(slugify(t), "carbon-footprint-2024-review");
    }
}
