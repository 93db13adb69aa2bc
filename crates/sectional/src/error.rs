//! Error taxonomy for layout operations.

use std::fmt;

use crate::section::SectionId;

/// Errors from layout operations and configuration validation.
///
/// Unsatisfiable layouts are deliberately not represented here: a drag that
/// exceeds the available slack is clamped, and the clamped offset is reported
/// through [`Handle::applied_offset`](crate::Handle::applied_offset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The id is not present in the current section list.
    UnknownSection { id: SectionId },
    /// The supplied section list contains the same id more than once.
    DuplicateSection { id: SectionId },
    /// A sizing metric is non-finite, negative, or otherwise unusable.
    InvalidConfig { field: &'static str },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSection { id } => {
                write!(f, "section {id:?} is not in the current section list")
            }
            Self::DuplicateSection { id } => {
                write!(f, "section list contains duplicate id {id:?}")
            }
            Self::InvalidConfig { field } => {
                write!(f, "sizing config field {field} is invalid")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
