//! Client-side search and mode filtering for class and session lists.
//!
//! Pure and synchronous: every call recomputes from the full collection and
//! keeps the input order.

use std::fmt;
use std::str::FromStr;

use crate::api::{OneTimeSession, RegularClass};

/// Mode tags that all mean "in person"; older records use the latter two.
const IN_PERSON_TAGS: [&str; 3] = ["in-person", "on-premise", "premise"];
const ONLINE_TAG: &str = "online";

/// Anything that can appear in a browsable list.
pub trait Listing {
    fn name(&self) -> &str;

    fn short_description(&self) -> Option<&str>;

    /// Delivery mode, or `None` when the record has no mode at all.
    fn mode(&self) -> Option<&str> {
        None
    }

    /// Whether this kind of record is subject to the mode filter.
    fn has_mode(&self) -> bool {
        false
    }
}

impl Listing for RegularClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn short_description(&self) -> Option<&str> {
        self.short_description.as_deref()
    }
}

impl Listing for OneTimeSession {
    fn name(&self) -> &str {
        &self.name
    }

    fn short_description(&self) -> Option<&str> {
        self.short_description.as_deref()
    }

    fn mode(&self) -> Option<&str> {
        self.mode.as_deref()
    }

    fn has_mode(&self) -> bool {
        true
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModeFilter {
    #[default]
    All,
    Online,
    InPerson,
}

impl ModeFilter {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Online => "online",
            Self::InPerson => "in-person",
        }
    }

    /// Whether a record with `mode` passes. Absent mode counts as in person.
    #[must_use]
    pub fn matches(self, mode: Option<&str>) -> bool {
        let mode = mode
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map_or_else(|| IN_PERSON_TAGS[0].to_owned(), str::to_lowercase);
        match self {
            Self::All => true,
            Self::Online => mode.contains(ONLINE_TAG),
            Self::InPerson => IN_PERSON_TAGS.iter().any(|tag| mode.contains(tag)),
        }
    }
}

impl fmt::Display for ModeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown mode filter '{0}' (expected 'all', 'online' or 'in-person')")]
pub struct ParseModeFilterError(String);

impl FromStr for ModeFilter {
    type Err = ParseModeFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "online" => Ok(Self::Online),
            "in-person" | "inperson" | "in_person" => Ok(Self::InPerson),
            other => Err(ParseModeFilterError(other.to_owned())),
        }
    }
}

/// Current search box and mode selector values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub search_term: String,
    pub mode: ModeFilter,
}

impl ListFilter {
    #[must_use]
    pub fn new(search_term: impl Into<String>, mode: ModeFilter) -> Self {
        Self { search_term: search_term.into(), mode }
    }

    /// Case-insensitive substring match on name or short description.
    #[must_use]
    pub fn matches_text<T: Listing + ?Sized>(&self, item: &T) -> bool {
        let needle = self.search_term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        item.name().to_lowercase().contains(&needle)
            || item
                .short_description()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }

    #[must_use]
    pub fn matches<T: Listing + ?Sized>(&self, item: &T) -> bool {
        self.matches_text(item) && (!item.has_mode() || self.mode.matches(item.mode()))
    }

    /// Items passing both predicates, in input order.
    #[must_use]
    pub fn apply<'a, T: Listing>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
