//! Sizing metrics and derived per-section bounds.
//!
//! [`SizingConfig`] names the pixel constants that the layout algorithm
//! depends on and answers the pure sizing queries: how tall is a section
//! with `n` items, and what are the legal bounds for a section given its
//! item count and collapsed state.
//!
//! # Invariants
//!
//! 1. `section_height(0)` is the bare header height.
//! 2. `min_height(..) <= max_height(..)` for every valid configuration.
//! 3. A collapsed section's min and max are both `section_height(0)`.
//!
//! # Failure Modes
//!
//! [`SizingConfig::validate`] rejects non-finite or negative metrics and a
//! non-positive tolerance; the queries themselves are infallible.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Pixel metrics driving section bounds and handle spacing.
///
/// All fields are in the same unit as the available height passed to
/// [`ListLayout`](crate::ListLayout) (logical pixels in the original host).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingConfig {
    /// Height of a section header, present even when the section is empty.
    pub header_height: f64,
    /// Padding between the header and the first item.
    pub item_padding: f64,
    /// Height of one item row.
    pub item_height: f64,
    /// Height of the drag handle rendered between two expanded sections.
    pub handle_height: f64,
    /// Upper bound for an expanded section, effectively "unbounded".
    pub max_expanded_height: f64,
    /// Residual below which overflow distribution stops.
    pub tolerance: f64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            header_height: 36.0,
            item_padding: 4.0,
            item_height: 34.0,
            handle_height: 1.0,
            max_expanded_height: 100_000.0,
            tolerance: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl SizingConfig {
    /// Override the header height.
    #[must_use]
    pub fn with_header_height(mut self, height: f64) -> Self {
        self.header_height = height;
        self
    }

    /// Override the per-item row height.
    #[must_use]
    pub fn with_item_height(mut self, height: f64) -> Self {
        self.item_height = height;
        self
    }

    /// Override the handle height subtracted per expanded gap.
    #[must_use]
    pub fn with_handle_height(mut self, height: f64) -> Self {
        self.handle_height = height;
        self
    }

    /// Validate the metrics.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let metrics = [
            ("header_height", self.header_height),
            ("item_padding", self.item_padding),
            ("item_height", self.item_height),
            ("handle_height", self.handle_height),
            ("max_expanded_height", self.max_expanded_height),
        ];
        for (field, value) in metrics {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidConfig { field });
            }
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(LayoutError::InvalidConfig { field: "tolerance" });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sizing queries
// ---------------------------------------------------------------------------

impl SizingConfig {
    /// Height of a section showing `items` item rows.
    ///
    /// An empty section is just its header; a non-empty one adds the item
    /// padding once plus one row height per item.
    #[must_use]
    pub fn section_height(&self, items: u32) -> f64 {
        if items == 0 {
            self.header_height
        } else {
            self.header_height + self.item_padding + f64::from(items) * self.item_height
        }
    }

    /// Minimum height for a section with `count` items.
    ///
    /// Collapsed sections bottom out at the bare header; expanded sections
    /// are floored at a single visible item (or the header if empty).
    #[must_use]
    pub fn min_height(&self, count: u32, collapsed: bool) -> f64 {
        let floor_items = if collapsed { 0 } else { 1 };
        self.section_height(count.min(floor_items))
    }

    /// Maximum height for a section.
    #[must_use]
    pub fn max_height(&self, collapsed: bool) -> f64 {
        if collapsed {
            self.section_height(0)
        } else {
            self.max_expanded_height
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_match_observed_host() {
        let config = SizingConfig::default();
        assert_eq!(config.header_height, 36.0);
        assert_eq!(config.item_padding, 4.0);
        assert_eq!(config.item_height, 34.0);
        assert_eq!(config.handle_height, 1.0);
    }

    #[test]
    fn empty_section_is_header_only() {
        let config = SizingConfig::default();
        assert_eq!(config.section_height(0), 36.0);
    }

    #[test]
    fn section_height_adds_padding_once() {
        let config = SizingConfig::default();
        assert_eq!(config.section_height(1), 36.0 + 4.0 + 34.0);
        assert_eq!(config.section_height(3), 36.0 + 4.0 + 3.0 * 34.0);
    }

    #[test]
    fn collapsed_min_and_max_pin_to_header() {
        let config = SizingConfig::default();
        assert_eq!(config.min_height(5, true), 36.0);
        assert_eq!(config.max_height(true), 36.0);
    }

    #[test]
    fn expanded_min_floors_at_one_item() {
        let config = SizingConfig::default();
        assert_eq!(config.min_height(5, false), 74.0);
        // An empty expanded section only needs its header.
        assert_eq!(config.min_height(0, false), 36.0);
    }

    #[test]
    fn expanded_max_is_the_cap() {
        let config = SizingConfig::default();
        assert_eq!(config.max_height(false), 100_000.0);
    }

    #[test]
    fn min_never_exceeds_max() {
        let config = SizingConfig::default();
        for count in [0, 1, 2, 50] {
            for collapsed in [false, true] {
                assert!(config.min_height(count, collapsed) <= config.max_height(collapsed));
            }
        }
    }

    #[test]
    fn builders_override_fields() {
        let config = SizingConfig::default()
            .with_header_height(20.0)
            .with_item_height(10.0)
            .with_handle_height(2.0);
        assert_eq!(config.section_height(0), 20.0);
        assert_eq!(config.section_height(2), 20.0 + 4.0 + 20.0);
        assert_eq!(config.handle_height, 2.0);
    }

    #[test]
    fn validate_default_ok() {
        assert!(SizingConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_finite_metric() {
        let config = SizingConfig {
            item_height: f64::NAN,
            ..SizingConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidConfig {
                field: "item_height"
            }
        ));
    }

    #[test]
    fn validate_rejects_negative_metric() {
        let config = SizingConfig {
            header_height: -1.0,
            ..SizingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_tolerance() {
        let config = SizingConfig {
            tolerance: 0.0,
            ..SizingConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidConfig { field: "tolerance" }
        ));
    }

    #[test]
    fn serde_roundtrip() {
        let config = SizingConfig::default().with_handle_height(0.0);
        let json = serde_json::to_string(&config).unwrap();
        let back: SizingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
