//! Jira issue key extraction from commit messages

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref PATTERN: Regex = Regex::new(r"[A-Z]+-[0-9]+").unwrap();
}

/// Extract the first issue key from a message (e.g., "fix: ABC-1 broken" -> "ABC-1")
///
/// Only the leftmost key is returned, even when a message mentions several.
pub fn extract_from_str(message: &str) -> Option<String> {
    PATTERN.find(message).map(|m| m.as_str().to_string())
}

/// Collect the distinct issue keys referenced by a list of commit messages
///
/// Each message contributes at most one key. Keys are returned in the order
/// they were first seen.
pub fn extract_issue_keys<S: AsRef<str>>(messages: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();

    for message in messages {
        if let Some(key) = extract_from_str(message.as_ref()) {
            if seen.insert(key.clone()) {
                keys.push(key);
            }
        }
    }

    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_str() {
        assert_eq!(
            extract_from_str("TRACK-123: Add feature"),
            Some("TRACK-123".to_string())
        );
        assert_eq!(extract_from_str("No key here"), None);
        assert_eq!(
            extract_from_str("[ABC-7] bracketed"),
            Some("ABC-7".to_string())
        );
    }

    #[test]
    fn test_extract_from_str_takes_leftmost() {
        assert_eq!(
            extract_from_str("ABC-1 and DEF-2 together"),
            Some("ABC-1".to_string())
        );
    }

    #[test]
    fn test_extract_from_str_rejects_partial_shapes() {
        assert_eq!(extract_from_str("abc-1 lowercase"), None);
        assert_eq!(extract_from_str("ABC- no number"), None);
        assert_eq!(extract_from_str("-123 no project"), None);
    }

    #[test]
    fn test_extract_from_str_ascii_digits_only() {
        assert_eq!(extract_from_str("ABC-\u{0661}"), None);
        assert_eq!(extract_from_str("fix: ABC-\u{0661}\u{0662} broken"), None);
        assert_eq!(extract_from_str("fix: ABC-\u{FF11} fullwidth"), None);
        assert_eq!(
            extract_from_str("ABC-12\u{0663} mixed"),
            Some("ABC-12".to_string())
        );
    }

    #[test]
    fn test_extract_issue_keys() {
        let messages = vec!["fix: ABC-1 broken", "chore: release"];
        assert_eq!(extract_issue_keys(&messages), vec!["ABC-1".to_string()]);
    }

    #[test]
    fn test_extract_issue_keys_deduplicates() {
        let messages = vec![
            "ABC-1 first".to_string(),
            "DEF-2 second".to_string(),
            "ABC-1 again".to_string(),
            "merge DEF-2 into ABC-3".to_string(),
        ];
        let keys = extract_issue_keys(&messages);

        assert_eq!(keys, vec!["ABC-1".to_string(), "DEF-2".to_string()]);
        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }

    #[test]
    fn test_extract_issue_keys_empty() {
        let messages: Vec<String> = vec![];
        assert!(extract_issue_keys(&messages).is_empty());
        assert!(extract_issue_keys(&["docs: readme", "ci: bump"]).is_empty());
    }
}
