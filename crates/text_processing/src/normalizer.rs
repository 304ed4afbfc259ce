//! Text normalization
//!
//! Every textual comparison in the system (intent keywords, command
//! detection, skip detection) routes through [`normalize`] so case and
//! whitespace can never cause drift between call sites.

/// Trim, lowercase, and collapse whitespace runs to single spaces
///
/// Pure and idempotent: `normalize(normalize(t)) == normalize(t)`.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whether the normalized text contains any of the given keywords
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let t = normalize(text);
    keywords.iter().any(|k| t.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  Report   a\tPothole \n"), "report a pothole");
    }

    #[test]
    fn test_normalize_idempotent() {
        for input in ["  MiXeD   Case  ", "already normal", "", "\t\n"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_contains_any() {
        assert!(contains_any("There's a POTHOLE on Main St", &["pothole"]));
        assert!(!contains_any("streetlight is out", &["pothole", "trash"]));
    }
}
