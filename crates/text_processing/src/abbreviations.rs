//! Street-type abbreviation expansion
//!
//! Expands common street-type abbreviations before an address is sent to a
//! geocoding provider. Replacement is whole-word and case-insensitive, so
//! abbreviations at string boundaries match and words merely containing an
//! abbreviation (e.g. "strand") are left alone.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static EXPANSIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("ln", "lane");
    map.insert("rd", "road");
    map.insert("st", "street");
    map.insert("dr", "drive");
    map.insert("ave", "avenue");
    map.insert("blvd", "boulevard");
    map.insert("ct", "court");
    map.insert("pl", "place");
    map.insert("pkwy", "parkway");
    map.insert("hwy", "highway");
    map
});

static ABBREV_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(ln|rd|st|dr|ave|blvd|ct|pl|pkwy|hwy)\b").unwrap()
});

/// Expand street-type abbreviations in an address string
///
/// The rest of the text (casing, punctuation) is preserved; only the matched
/// abbreviations are rewritten, in lowercase.
pub fn expand_street_abbreviations(address: &str) -> String {
    ABBREV_PATTERN
        .replace_all(address, |caps: &regex::Captures| {
            let matched = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            EXPANSIONS
                .get(matched.to_lowercase().as_str())
                .copied()
                .unwrap_or(matched)
                .to_string()
        })
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_abbreviations() {
        assert_eq!(
            expand_street_abbreviations("123 Main St"),
            "123 Main street"
        );
        assert_eq!(expand_street_abbreviations("456 Oak Ave"), "456 Oak avenue");
        assert_eq!(
            expand_street_abbreviations("9 Birch Blvd, Cary"),
            "9 Birch boulevard, Cary"
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(expand_street_abbreviations("10 Elm RD"), "10 Elm road");
        assert_eq!(expand_street_abbreviations("10 Elm rd"), "10 Elm road");
    }

    #[test]
    fn test_boundary_matches() {
        // Abbreviation at the very end of the string
        assert_eq!(expand_street_abbreviations("Page Ln"), "Page lane");
        // Followed by punctuation
        assert_eq!(
            expand_street_abbreviations("Page Ln, Morrisville"),
            "Page lane, Morrisville"
        );
    }

    #[test]
    fn test_no_partial_word_replacement() {
        assert_eq!(
            expand_street_abbreviations("The Strand Apartments"),
            "The Strand Apartments"
        );
        assert_eq!(expand_street_abbreviations("Stone Drive"), "Stone Drive");
    }

    #[test]
    fn test_multiple_abbreviations() {
        assert_eq!(
            expand_street_abbreviations("Hwy 54 at Davis Dr"),
            "highway 54 at Davis drive"
        );
    }
}
