#![forbid(unsafe_code)]

//! Constrained height distribution for collapsible stacked sections.
//!
//! A vertical list is divided into sections (think room-list categories)
//! that must always fill the available height exactly. Each section has a
//! minimum height derived from its item count, collapsed sections pin to
//! their header, and the boundaries between sections can be dragged. The
//! [`ListLayout`] engine redistributes space whenever anything changes
//! (container resize, section add/remove, collapse/expand, or a drag) by
//! propagating the "overflow" a section cannot absorb to its neighbors.
//!
//! The library is push-based: it owns no view state and reports every
//! height through a caller-supplied callback.
//!
//! # Usage
//!
//! ```
//! use sectional::{ListLayout, Section};
//!
//! let mut layout = ListLayout::with_defaults(|id, height| {
//!     // push the height into the host view, e.g. set a CSS property
//!     let _ = (id, height);
//! });
//!
//! let sections = [Section::new("rooms", 3), Section::new("people", 5)];
//! layout.update(&sections, 400.0)?;
//! assert_eq!(layout.height_of(&"rooms".into()), Some(199.5));
//!
//! // Drag the boundary below "rooms" until it is 250 tall, then commit.
//! layout.open_handle(&"rooms".into())?.set_height(250.0).finish();
//! assert_eq!(layout.height_of(&"people".into()), Some(149.0));
//!
//! // Collapse "rooms": it pins to its header and "people" absorbs the rest.
//! layout.collapse_section(&"rooms".into())?;
//! assert_eq!(layout.height_of(&"rooms".into()), Some(36.0));
//! # Ok::<(), sectional::LayoutError>(())
//! ```
//!
//! # Invariants
//!
//! 1. After any whole-list operation the committed heights sum to the
//!    available height minus one handle per expanded gap (clamped into what
//!    the per-section bounds allow, within the configured tolerance).
//! 2. Every committed height stays within its section's `[min, max]`.
//! 3. Drags that exceed the available slack are rubber-banded, never errors.
//! 4. Abandoning a drag without `finish()` leaves the baseline untouched.

pub mod config;
pub mod distributor;
pub mod error;
pub mod handle;
pub mod layout;
pub mod section;
pub mod snapshot;

pub use config::SizingConfig;
pub use distributor::{ResizeItem, SectionDistributor, SizeDistributor};
pub use error::LayoutError;
pub use handle::Handle;
pub use layout::{ApplyHeight, ListLayout};
pub use section::{Section, SectionId};
pub use snapshot::{LAYOUT_SNAPSHOT_SCHEMA_VERSION, LayoutSnapshot, SnapshotError};
