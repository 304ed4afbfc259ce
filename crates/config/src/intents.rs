//! Ordered intent keyword table and reserved control keywords
//!
//! Keyword matching is substring containment over normalized text, so
//! keywords that overlap across intents are resolved purely by table order.
//! That tie-break is deliberate; do not reorder entries without reviewing
//! the classifier tests.

/// One classification rule: any keyword hit maps to `key`
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    /// Service key emitted on match
    pub key: &'static str,
    /// Keywords checked by substring containment
    pub keywords: &'static [&'static str],
}

/// Trigger phrase for the adapt-to-my-city flow (checked before the table)
pub const ADAPT_TRIGGER: &str = "adapt this to my city";

/// Exact-match inputs that open the menu from idle
pub const GREETING_SET: &[&str] = &["help", "menu", "hi", "hello", "start"];

/// Always-honored reset commands, from any state
pub const RESET_KEYWORDS: &[&str] = &["reset", "restart", "start over"];

/// Abandons an in-progress form
pub const CANCEL_KEYWORD: &str = "cancel";

/// Shows the menu; mid-form it preserves the active request
pub const MENU_KEYWORD: &str = "menu";

/// Priority-ordered keyword table
pub fn intent_rules() -> &'static [IntentRule] {
    &[
        IntentRule {
            key: "pothole",
            keywords: &["pothole", "road hole", "asphalt", "road damage", "street crack"],
        },
        IntentRule {
            key: "trash_schedule",
            keywords: &["trash", "garbage", "recycle", "pickup", "collection", "bin"],
        },
        IntentRule {
            key: "noise_complaint",
            keywords: &["noise", "loud", "party", "music", "construction noise"],
        },
        IntentRule {
            key: "streetlight",
            keywords: &["streetlight", "light out", "lamp", "street light"],
        },
        IntentRule {
            key: "stray_animal",
            keywords: &["stray", "dog", "cat", "animal control", "lost pet"],
        },
        IntentRule {
            key: "general_info",
            keywords: &["info", "information", "hours", "phone", "contact", "permit", "parks"],
        },
    ]
}
