//! Member mention extraction from rich-text post descriptions.
//!
//! The editor embeds mentions as anchors carrying a `data-member-id`
//! attribute. Extraction is a pure text scan; whether the referenced
//! member actually exists is the storage layer's concern.

use lazy_static::lazy_static;
use regex::Regex;

use crate::common::MemberId;

lazy_static! {
    static ref MENTION_RE: Regex =
        Regex::new(r#"data-member-id="([0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12})""#)
            .expect("mention regex is valid");
}

/// Extract the set of member ids mentioned in rich text.
///
/// Returns ids deduplicated in first-appearance order. Malformed ids are
/// skipped.
pub fn extract_member_mentions(text: &str) -> Vec<MemberId> {
    let mut seen = std::collections::HashSet::new();
    let mut mentions = Vec::new();

    for capture in MENTION_RE.captures_iter(text) {
        if let Ok(id) = MemberId::parse(&capture[1]) {
            if seen.insert(id) {
                mentions.push(id);
            }
        }
    }

    mentions
}
