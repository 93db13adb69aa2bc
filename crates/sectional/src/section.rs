//! Section identity and the externally supplied section list.
//!
//! A [`Section`] is one collapsible region in the vertical list. The host
//! replaces the whole ordered list on every
//! [`update`](crate::ListLayout::update); order is semantically significant
//! because it defines "above" and "below" for overflow rebalancing.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Stable string identifier for a section.
///
/// Ids come from the host (e.g. a list category key) and outlive individual
/// layout updates: committed heights are remembered by id even while the id
/// is absent from the current section list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Create an id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw string key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One collapsible region in the stacked list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Stable identity, also the key for persisted heights.
    pub id: SectionId,
    /// Number of items currently in the section; drives the minimum height.
    pub count: u32,
}

impl Section {
    /// Build a section from an id and its item count.
    #[must_use]
    pub fn new(id: impl Into<SectionId>, count: u32) -> Self {
        Self {
            id: id.into(),
            count,
        }
    }

    /// Whether this section matches another by identity and item count.
    ///
    /// This is the equality `update` uses to decide whether the section list
    /// changed.
    #[must_use]
    pub fn same_shape(&self, other: &Section) -> bool {
        self.id == other.id && self.count == other.count
    }
}

impl From<(&str, u32)> for Section {
    fn from((id, count): (&str, u32)) -> Self {
        Self::new(id, count)
    }
}

/// Find the first id that appears more than once in a section list.
pub(crate) fn first_duplicate(sections: &[Section]) -> Option<&SectionId> {
    let mut seen = FxHashSet::default();
    sections
        .iter()
        .find(|section| !seen.insert(&section.id))
        .map(|section| &section.id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_from_str_and_string_agree() {
        assert_eq!(SectionId::from("rooms"), SectionId::new("rooms".to_string()));
        assert_eq!(SectionId::from("rooms").as_str(), "rooms");
    }

    #[test]
    fn id_display_is_raw_key() {
        assert_eq!(format!("{}", SectionId::new("people")), "people");
    }

    #[test]
    fn same_shape_compares_id_and_count() {
        let a = Section::new("a", 3);
        assert!(a.same_shape(&Section::new("a", 3)));
        assert!(!a.same_shape(&Section::new("a", 4)));
        assert!(!a.same_shape(&Section::new("b", 3)));
    }

    #[test]
    fn tuple_conversion() {
        let section: Section = ("favourites", 7).into();
        assert_eq!(section.id.as_str(), "favourites");
        assert_eq!(section.count, 7);
    }

    #[test]
    fn first_duplicate_none_for_unique() {
        let sections = [Section::new("a", 1), Section::new("b", 2)];
        assert!(first_duplicate(&sections).is_none());
    }

    #[test]
    fn first_duplicate_finds_repeat() {
        let sections = [
            Section::new("a", 1),
            Section::new("b", 2),
            Section::new("a", 9),
        ];
        assert_eq!(first_duplicate(&sections).unwrap().as_str(), "a");
    }

    #[test]
    fn serde_id_is_transparent() {
        let json = serde_json::to_string(&SectionId::new("rooms")).unwrap();
        assert_eq!(json, "\"rooms\"");
    }
}
