//! Participant roster.
//!
//! The roster is the canonical, ordered participant list. Every iteration in
//! validation, allocation and rendering goes through it, so its order is the
//! order of every per-person output.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Splits comma-separated names, trimming each and dropping empty entries.
///
/// Only commas separate names; spaces inside a name are kept.
#[must_use]
pub fn parse_names(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ordered, case-insensitively deduplicated participant list.
///
/// The first occurrence of a name wins and keeps its original casing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Builds a roster from raw names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let names = names
            .into_iter()
            .filter_map(|name| {
                let name = name.as_ref().trim();
                if name.is_empty() || !seen.insert(name.to_lowercase()) {
                    return None;
                }
                Some(name.to_string())
            })
            .collect();

        Self { names }
    }

    /// Builds a roster from comma-separated text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::new(parse_names(text))
    }

    /// Returns true if `name` is on the roster, compared by display name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Number of participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nobody is on the roster.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates names in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// The first participant, if any.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    /// Names in roster order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl From<Vec<String>> for Roster {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

impl From<Roster> for Vec<String> {
    fn from(roster: Roster) -> Self {
        roster.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_splits_on_commas_only() {
        assert_eq!(
            parse_names(" Alice , Bob Lee,,Carol ,  "),
            vec!["Alice", "Bob Lee", "Carol"]
        );
        assert!(parse_names("").is_empty());
        assert!(parse_names(" , ,").is_empty());
    }

    #[test]
    fn test_roster_dedup_is_case_insensitive_and_first_wins() {
        let roster = Roster::new(["alice", "Bob", "ALICE", "bob", "Carol"]);
        assert_eq!(roster.names(), ["alice", "Bob", "Carol"]);
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn test_roster_trims_and_skips_blank_names() {
        let roster = Roster::new(["  Alice ", "", "   ", "Bob"]);
        assert_eq!(roster.names(), ["Alice", "Bob"]);
    }

    #[test]
    fn test_contains_matches_display_name() {
        let roster = Roster::parse("Alice, Bob");
        assert!(roster.contains("Alice"));
        assert!(!roster.contains("alice"));
        assert!(!roster.contains("Dave"));
    }

    #[test]
    fn test_iteration_order_is_first_occurrence_order() {
        let roster = Roster::parse("Carol, Alice, Bob, carol");
        let order: Vec<&str> = roster.iter().collect();
        assert_eq!(order, ["Carol", "Alice", "Bob"]);
        assert_eq!(roster.first(), Some("Carol"));
    }

    #[test]
    fn test_empty_roster() {
        let roster = Roster::default();
        assert!(roster.is_empty());
        assert_eq!(roster.first(), None);
    }

    #[test]
    fn test_serde_dedups_on_the_way_in() {
        let roster: Roster = serde_json::from_str(r#"["Alice", "alice", "Bob"]"#).unwrap();
        assert_eq!(roster.names(), ["Alice", "Bob"]);
        assert_eq!(serde_json::to_string(&roster).unwrap(), r#"["Alice","Bob"]"#);
    }
}
