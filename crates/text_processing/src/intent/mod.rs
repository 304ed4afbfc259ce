//! Keyword intent classification
//!
//! Maps one utterance to an [`IntentTag`] via an ordered rule list using
//! substring containment over the normalized text. Overlapping keywords
//! across rules are resolved purely by table order; that tie-break is the
//! documented behavior, not an accident, and there is deliberately no fuzzy
//! matching layered on top.

use serde::{Deserialize, Serialize};

use crate::normalizer::normalize;

/// One ordered classification rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierRule {
    /// Service key emitted when any keyword matches
    pub key: String,
    /// Keywords checked by substring containment, in order
    pub keywords: Vec<String>,
}

impl ClassifierRule {
    pub fn new(key: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            key: key.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Classification result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "tag", content = "key")]
pub enum IntentTag {
    /// A recognized service request (catalog key)
    Service(String),
    /// Show the service menu
    Menu,
    /// Re-target the agent to another city
    AdaptCity,
    /// Nothing matched
    Unknown,
}

impl IntentTag {
    pub fn service_key(&self) -> Option<&str> {
        match self {
            IntentTag::Service(key) => Some(key),
            _ => None,
        }
    }
}

/// Ordered, first-match-wins keyword classifier
pub struct IntentClassifier {
    rules: Vec<ClassifierRule>,
    adapt_trigger: String,
    greetings: Vec<String>,
}

impl IntentClassifier {
    /// Build a classifier from an ordered rule table
    ///
    /// `adapt_trigger` is checked before the table; `greetings` are matched
    /// by exact equality after it.
    pub fn new(rules: Vec<ClassifierRule>, adapt_trigger: &str, greetings: &[&str]) -> Self {
        Self {
            rules,
            adapt_trigger: normalize(adapt_trigger),
            greetings: greetings.iter().map(|g| normalize(g)).collect(),
        }
    }

    /// Classify one raw utterance; total, never fails
    pub fn classify(&self, raw: &str) -> IntentTag {
        let text = normalize(raw);

        if text.contains(&self.adapt_trigger) {
            return IntentTag::AdaptCity;
        }

        for rule in &self.rules {
            if rule.keywords.iter().any(|k| text.contains(k.as_str())) {
                tracing::debug!(intent = %rule.key, "keyword match");
                return IntentTag::Service(rule.key.clone());
            }
        }

        if self.greetings.iter().any(|g| *g == text) {
            return IntentTag::Menu;
        }

        IntentTag::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new(
            vec![
                ClassifierRule::new("pothole", &["pothole", "road hole", "asphalt"]),
                ClassifierRule::new("trash_schedule", &["trash", "garbage", "pickup"]),
                ClassifierRule::new("noise_complaint", &["noise", "loud", "party"]),
            ],
            "adapt this to my city",
            &["help", "menu", "hi", "hello", "start"],
        )
    }

    #[test]
    fn test_keyword_match_per_intent() {
        let c = classifier();
        assert_eq!(
            c.classify("Report a pothole please"),
            IntentTag::Service("pothole".to_string())
        );
        assert_eq!(
            c.classify("when is garbage day"),
            IntentTag::Service("trash_schedule".to_string())
        );
        assert_eq!(
            c.classify("my neighbors are LOUD"),
            IntentTag::Service("noise_complaint".to_string())
        );
    }

    #[test]
    fn test_table_order_breaks_ties() {
        // Contains keywords for both pothole and trash_schedule; the earlier
        // table entry wins.
        let c = classifier();
        assert_eq!(
            c.classify("asphalt truck missed trash pickup"),
            IntentTag::Service("pothole".to_string())
        );
    }

    #[test]
    fn test_adapt_trigger_precedes_table() {
        let c = classifier();
        assert_eq!(
            c.classify(
                "Yes please adapt this to my city's open data. \
                 My city's name is Durham in the state North Carolina."
            ),
            IntentTag::AdaptCity
        );
    }

    #[test]
    fn test_greetings_require_exact_match() {
        let c = classifier();
        assert_eq!(c.classify("  HELLO "), IntentTag::Menu);
        assert_eq!(c.classify("menu"), IntentTag::Menu);
        // A greeting embedded in a sentence is not a menu request
        assert_eq!(c.classify("hello there friend"), IntentTag::Unknown);
    }

    #[test]
    fn test_unknown_fallback() {
        let c = classifier();
        assert_eq!(c.classify("qwerty asdf"), IntentTag::Unknown);
        assert_eq!(c.classify(""), IntentTag::Unknown);
    }

    #[test]
    fn test_substring_containment_not_token_match() {
        let c = classifier();
        // "potholes" contains "pothole"
        assert_eq!(
            c.classify("so many potholes here"),
            IntentTag::Service("pothole".to_string())
        );
    }
}
