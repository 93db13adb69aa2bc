//! Persisted layout baseline with versioning.
//!
//! A [`LayoutSnapshot`] captures the committed heights and collapsed state
//! so a host can store them (settings file, local storage) and restore the
//! list at its previous sizes.
//!
//! # Schema Versioning Policy
//!
//! - Snapshots carry their schema version; loaders reject unknown versions
//!   with an actionable error instead of guessing.
//! - Breaking field or semantic changes must bump
//!   [`LAYOUT_SNAPSHOT_SCHEMA_VERSION`].
//! - Maps are `BTreeMap` so serialization order is deterministic.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::SizingConfig;
use crate::layout::ListLayout;
use crate::section::SectionId;

/// Current snapshot schema version.
pub const LAYOUT_SNAPSHOT_SCHEMA_VERSION: u16 = 1;

/// Serializable committed baseline of a [`ListLayout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    /// Schema version for migration detection.
    #[serde(default = "default_schema_version")]
    pub schema_version: u16,
    /// Committed height per section id, including ids not currently listed.
    #[serde(default)]
    pub heights: BTreeMap<SectionId, f64>,
    /// Collapsed flag per section id.
    #[serde(default)]
    pub collapsed: BTreeMap<SectionId, bool>,
}

fn default_schema_version() -> u16 {
    LAYOUT_SNAPSHOT_SCHEMA_VERSION
}

impl Default for LayoutSnapshot {
    fn default() -> Self {
        Self {
            schema_version: LAYOUT_SNAPSHOT_SCHEMA_VERSION,
            heights: BTreeMap::new(),
            collapsed: BTreeMap::new(),
        }
    }
}

impl LayoutSnapshot {
    /// Validate the schema version and the stored heights.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.schema_version != LAYOUT_SNAPSHOT_SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.schema_version,
                expected: LAYOUT_SNAPSHOT_SCHEMA_VERSION,
            });
        }
        for (id, height) in &self.heights {
            if !height.is_finite() || *height < 0.0 {
                return Err(SnapshotError::InvalidHeight {
                    id: id.clone(),
                    height: *height,
                });
            }
        }
        Ok(())
    }
}

/// Errors from snapshot validation.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotError {
    /// Schema version is not supported by this build.
    UnsupportedVersion { found: u16, expected: u16 },
    /// A stored height is non-finite or negative.
    InvalidHeight { id: SectionId, height: f64 },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, expected } => {
                write!(
                    f,
                    "unsupported snapshot schema version {found} (expected {expected})"
                )
            }
            Self::InvalidHeight { id, height } => {
                write!(f, "snapshot height {height} for section {id:?} is invalid")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

// ---------------------------------------------------------------------------
// ListLayout integration
// ---------------------------------------------------------------------------

impl ListLayout {
    /// Export the committed baseline for persistence.
    #[must_use]
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            schema_version: LAYOUT_SNAPSHOT_SCHEMA_VERSION,
            heights: self
                .persisted_heights()
                .iter()
                .map(|(id, height)| (id.clone(), *height))
                .collect(),
            collapsed: self
                .collapsed_state()
                .iter()
                .map(|(id, collapsed)| (id.clone(), *collapsed))
                .collect(),
        }
    }

    /// Build a layout from a validated snapshot.
    pub fn from_snapshot(
        config: SizingConfig,
        apply_height: impl FnMut(&SectionId, f64) + 'static,
        snapshot: &LayoutSnapshot,
    ) -> Result<Self, SnapshotError> {
        snapshot.validate()?;
        Ok(Self::new(
            config,
            apply_height,
            snapshot
                .heights
                .iter()
                .map(|(id, height)| (id.clone(), *height)),
            snapshot
                .collapsed
                .iter()
                .map(|(id, collapsed)| (id.clone(), *collapsed)),
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::Section;

    fn populated_layout() -> ListLayout {
        let mut layout = ListLayout::with_defaults(|_, _| {});
        layout
            .update(&[Section::new("a", 3), Section::new("b", 5)], 400.0)
            .unwrap();
        layout.collapse_section(&"a".into()).unwrap();
        layout
    }

    #[test]
    fn snapshot_captures_heights_and_collapsed() {
        let snapshot = populated_layout().snapshot();
        assert_eq!(snapshot.schema_version, 1);
        assert_eq!(snapshot.heights[&SectionId::new("a")], 36.0);
        assert_eq!(snapshot.heights[&SectionId::new("b")], 364.0);
        assert!(snapshot.collapsed[&SectionId::new("a")]);
    }

    #[test]
    fn json_roundtrip() {
        let snapshot = populated_layout().snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: LayoutSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, back);
    }

    #[test]
    fn missing_version_defaults_to_current() {
        let json = r#"{"heights": {"a": 36.0}, "collapsed": {"a": true}}"#;
        let snapshot: LayoutSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.schema_version, LAYOUT_SNAPSHOT_SCHEMA_VERSION);
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn restore_resumes_previous_sizes() {
        let snapshot = populated_layout().snapshot();
        let mut restored =
            ListLayout::from_snapshot(SizingConfig::default(), |_, _| {}, &snapshot).unwrap();
        restored
            .update(&[Section::new("a", 3), Section::new("b", 5)], 400.0)
            .unwrap();
        assert!(restored.is_collapsed(&"a".into()));
        assert_eq!(restored.height_of(&"a".into()), Some(36.0));
        assert_eq!(restored.height_of(&"b".into()), Some(364.0));
    }

    #[test]
    fn validate_rejects_unknown_version() {
        let snapshot = LayoutSnapshot {
            schema_version: 99,
            ..LayoutSnapshot::default()
        };
        let err = snapshot.validate().unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::UnsupportedVersion {
                found: 99,
                expected: 1
            }
        ));
    }

    #[test]
    fn validate_rejects_non_finite_height() {
        let mut snapshot = LayoutSnapshot::default();
        snapshot.heights.insert(SectionId::new("a"), f64::NAN);
        let err = snapshot.validate().unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidHeight { .. }));
    }

    #[test]
    fn validate_rejects_negative_height() {
        let mut snapshot = LayoutSnapshot::default();
        snapshot.heights.insert(SectionId::new("a"), -5.0);
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn error_display_mentions_version() {
        let err = SnapshotError::UnsupportedVersion {
            found: 2,
            expected: 1,
        };
        let msg = format!("{err}");
        assert!(msg.contains('2'));
        assert!(msg.contains('1'));
    }
}
