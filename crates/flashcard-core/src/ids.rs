#![forbid(unsafe_code)]

//! Identifiers for boxes and groups.
//!
//! Box ids have the shape `box<N>` where `N` comes from a monotonically
//! increasing counter. Group ids are derived from the group name: lower-cased,
//! with every character outside `[a-z0-9]` stripped.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable, unique identifier of a box.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoxId(String);

impl BoxId {
    /// Prefix shared by every generated box id.
    pub const PREFIX: &'static str = "box";

    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id for the `n`-th generated box (`box1`, `box2`, ...).
    #[must_use]
    pub fn from_sequence(n: u64) -> Self {
        Self(format!("{}{n}", Self::PREFIX))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric part of the id, used to seed the id counter on import.
    ///
    /// The first `box` occurrence is removed and the leading decimal digits
    /// of the remainder are parsed. Ids without such digits count as `0`.
    ///
    /// ```
    /// # use flashcard_core::BoxId;
    /// assert_eq!(BoxId::new("box12").numeric_suffix(), 12);
    /// assert_eq!(BoxId::new("box3b").numeric_suffix(), 3);
    /// assert_eq!(BoxId::new("title").numeric_suffix(), 0);
    /// ```
    #[must_use]
    pub fn numeric_suffix(&self) -> u64 {
        let rest = self.0.replacen(Self::PREFIX, "", 1);
        let digits: String = rest
            .trim_start()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().unwrap_or(0)
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Borrow<str> for BoxId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BoxId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BoxId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier of a group, derived from its display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the id for a group name, or `None` when nothing survives.
    ///
    /// ```
    /// # use flashcard_core::GroupId;
    /// assert_eq!(GroupId::derive("My Group!"), Some(GroupId::new("mygroup")));
    /// assert_eq!(GroupId::derive("  ?! "), None);
    /// ```
    #[must_use]
    pub fn derive(name: &str) -> Option<Self> {
        let id: String = name
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            .collect();
        if id.is_empty() { None } else { Some(Self(id)) }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Borrow<str> for GroupId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for GroupId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_ids_use_prefix() {
        assert_eq!(BoxId::from_sequence(1).as_str(), "box1");
        assert_eq!(BoxId::from_sequence(42).to_string(), "box42");
    }

    #[test]
    fn numeric_suffix_edge_cases() {
        assert_eq!(BoxId::new("box0").numeric_suffix(), 0);
        assert_eq!(BoxId::new("box").numeric_suffix(), 0);
        assert_eq!(BoxId::new("boxbox9").numeric_suffix(), 0);
        assert_eq!(BoxId::new("7").numeric_suffix(), 7);
        assert_eq!(BoxId::new("box 15").numeric_suffix(), 15);
        assert_eq!(BoxId::new("a-box5").numeric_suffix(), 0);
    }

    #[test]
    fn derive_strips_everything_but_ascii_alnum() {
        assert_eq!(GroupId::derive("Capitals"), Some(GroupId::new("capitals")));
        assert_eq!(GroupId::derive("Rivers & Lakes 2"), Some(GroupId::new("riverslakes2")));
        assert_eq!(GroupId::derive("Ünïcode"), Some(GroupId::new("ncode")));
        assert_eq!(GroupId::derive(""), None);
        assert_eq!(GroupId::derive("日本"), None);
    }

    #[test]
    fn ids_borrow_as_str() {
        let mut set = std::collections::HashSet::new();
        set.insert(BoxId::new("box1"));
        assert!(set.contains("box1"));
    }
}
