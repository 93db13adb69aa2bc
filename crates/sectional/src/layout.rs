//! Committed-height ownership and the overflow redistribution engine.
//!
//! [`ListLayout`] owns the ordered section list, the committed height
//! assignment, the collapsed-state map, and the available height. Every
//! structural change (container resize, section-list replacement,
//! collapse/expand, drag commit) funnels into the same redistribution
//! machinery and ends by pushing a height to the host for every section
//! through the apply-height callback.
//!
//! # Invariants
//!
//! 1. After any whole-list operation, the committed heights sum to the
//!    content target (available height minus one handle per expanded gap),
//!    clamped into `[Σ min, Σ max]`, within the configured tolerance.
//! 2. Every committed height lies within its section's `[min, max]` bounds.
//! 3. Drag relayouts mutate only the working heights; the committed baseline
//!    changes when a handle is finished or a whole-list operation runs.
//!
//! # Failure Modes
//!
//! Unknown section ids and duplicate ids in `update` are rejected with
//! [`LayoutError`]. Non-finite height inputs are ignored for the height
//! dimension. Unsatisfiable drags are clamped, never errors.

use std::fmt;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::config::SizingConfig;
use crate::error::LayoutError;
use crate::handle::Handle;
use crate::section::{self, Section, SectionId};

/// Host callback receiving the height for one section.
///
/// Invoked for every section (even unchanged ones) after each successful
/// layout operation, in section order.
pub type ApplyHeight = Box<dyn FnMut(&SectionId, f64)>;

/// Owns section heights and redistributes space under constraints.
///
/// Long-lived for the life of the host list view. The host must call
/// [`update`](Self::update) whenever the ordered section list or the
/// container size changes, and route drag gestures through
/// [`open_handle`](Self::open_handle).
pub struct ListLayout {
    config: SizingConfig,
    apply_height: ApplyHeight,
    sections: Vec<Section>,
    collapsed: FxHashMap<SectionId, bool>,
    /// Last committed height per id, kept across section-set changes so a
    /// removed-and-readded section reappears at its old size.
    persisted: FxHashMap<SectionId, f64>,
    /// Committed heights by current section index.
    committed: Vec<f64>,
    /// Scratch heights for the relayout in progress.
    working: Vec<f64>,
    available_height: f64,
}

impl fmt::Debug for ListLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListLayout")
            .field("config", &self.config)
            .field("sections", &self.sections)
            .field("committed", &self.committed)
            .field("available_height", &self.available_height)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl ListLayout {
    /// Create a layout from a callback and previously persisted state.
    ///
    /// `initial_heights` and `initial_collapsed` restore a committed baseline
    /// (e.g. from a stored [`LayoutSnapshot`](crate::LayoutSnapshot));
    /// sections without an entry are seeded on the first
    /// [`update`](Self::update).
    pub fn new(
        config: SizingConfig,
        apply_height: impl FnMut(&SectionId, f64) + 'static,
        initial_heights: impl IntoIterator<Item = (SectionId, f64)>,
        initial_collapsed: impl IntoIterator<Item = (SectionId, bool)>,
    ) -> Self {
        Self {
            config,
            apply_height: Box::new(apply_height),
            sections: Vec::new(),
            collapsed: initial_collapsed.into_iter().collect(),
            persisted: initial_heights.into_iter().collect(),
            committed: Vec::new(),
            working: Vec::new(),
            available_height: 0.0,
        }
    }

    /// Create a layout with default metrics and no persisted state.
    pub fn with_defaults(apply_height: impl FnMut(&SectionId, f64) + 'static) -> Self {
        Self::new(SizingConfig::default(), apply_height, [], [])
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

impl ListLayout {
    /// Replace the total space and redistribute.
    ///
    /// Non-finite heights are ignored. Redistribution runs even when the
    /// value is unchanged, re-clamping any section whose bounds moved.
    pub fn set_available_height(&mut self, height: f64) {
        if !height.is_finite() {
            return;
        }
        self.available_height = height;
        self.apply_new_size();
    }

    /// Adopt a new ordered section list and container size.
    ///
    /// Idempotent: if neither the list (compared by id and count, in order)
    /// nor the finite height changed, nothing happens. A non-finite height
    /// leaves the stored height alone while still applying list changes.
    /// Sections seen for the first time are seeded to an even share of the
    /// content target, clamped into their bounds.
    pub fn update(&mut self, sections: &[Section], available_height: f64) -> Result<(), LayoutError> {
        if let Some(id) = section::first_duplicate(sections) {
            return Err(LayoutError::DuplicateSection { id: id.clone() });
        }
        let height_changed =
            available_height.is_finite() && available_height != self.available_height;
        let sections_changed = sections.len() != self.sections.len()
            || sections
                .iter()
                .zip(self.sections.iter())
                .any(|(new, old)| !new.same_shape(old));
        if !height_changed && !sections_changed {
            return Ok(());
        }
        if height_changed {
            self.available_height = available_height;
        }
        self.sections = sections.to_vec();
        self.seed_missing_heights();
        debug!(
            sections = self.sections.len(),
            available = self.available_height,
            "adopted section list"
        );
        self.apply_new_size();
        Ok(())
    }

    /// Collapse a section to its header and redistribute the freed space.
    pub fn collapse_section(&mut self, id: &SectionId) -> Result<(), LayoutError> {
        self.index_of(id)?;
        self.collapsed.insert(id.clone(), true);
        debug!(section = %id, "collapse");
        self.apply_new_size();
        Ok(())
    }

    /// Expand a section and drag it to `height` in one atomic commit.
    ///
    /// A non-finite `height` expands without the follow-up drag.
    pub fn expand_section(&mut self, id: &SectionId, height: f64) -> Result<(), LayoutError> {
        self.index_of(id)?;
        self.collapsed.insert(id.clone(), false);
        debug!(section = %id, height, "expand");
        self.apply_new_size();
        if height.is_finite() {
            let mut handle = self.open_handle(id)?;
            handle.set_height(height);
            handle.finish();
        }
        Ok(())
    }

    /// Open a drag handle anchored at the section's current index.
    ///
    /// The handle's drag origin is the section's committed height. Unknown
    /// ids are rejected.
    pub fn open_handle(&mut self, id: &SectionId) -> Result<Handle<'_>, LayoutError> {
        let anchor = self.index_of(id)?;
        let origin = self.committed[anchor];
        // Discard scratch state from any abandoned drag so an immediate
        // finish() commits the current baseline, not stale working heights.
        self.working.clone_from(&self.committed);
        Ok(Handle::new(self, anchor, origin))
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl ListLayout {
    /// The sizing configuration in use.
    #[must_use]
    pub fn config(&self) -> &SizingConfig {
        &self.config
    }

    /// The container height last supplied by the host.
    #[must_use]
    pub fn available_height(&self) -> f64 {
        self.available_height
    }

    /// Number of sections in the current list.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Whether the section is currently collapsed.
    #[must_use]
    pub fn is_collapsed(&self, id: &SectionId) -> bool {
        self.collapsed.get(id).copied().unwrap_or(false)
    }

    /// Committed height of a section in the current list.
    #[must_use]
    pub fn height_of(&self, id: &SectionId) -> Option<f64> {
        let index = self.sections.iter().position(|section| &section.id == id)?;
        self.committed.get(index).copied()
    }

    /// Iterator over `(id, committed height)` in section order.
    pub fn heights(&self) -> impl Iterator<Item = (&SectionId, f64)> + '_ {
        self.sections
            .iter()
            .zip(self.committed.iter())
            .map(|(section, height)| (&section.id, *height))
    }

    /// The `[min, max]` height bounds for a section in the current list.
    pub fn bounds_of(&self, id: &SectionId) -> Result<(f64, f64), LayoutError> {
        let index = self.index_of(id)?;
        Ok((self.min_height_at(index), self.max_height_at(index)))
    }
}

// ---------------------------------------------------------------------------
// Redistribution engine
// ---------------------------------------------------------------------------

impl ListLayout {
    fn index_of(&self, id: &SectionId) -> Result<usize, LayoutError> {
        self.sections
            .iter()
            .position(|section| &section.id == id)
            .ok_or_else(|| LayoutError::UnknownSection { id: id.clone() })
    }

    fn min_height_at(&self, index: usize) -> f64 {
        let section = &self.sections[index];
        self.config
            .min_height(section.count, self.is_collapsed(&section.id))
    }

    fn max_height_at(&self, index: usize) -> f64 {
        let section = &self.sections[index];
        self.config.max_height(self.is_collapsed(&section.id))
    }

    /// Content target: available height minus one handle per expanded gap.
    fn content_height(&self) -> f64 {
        let expanded = self
            .sections
            .iter()
            .filter(|section| !self.is_collapsed(&section.id))
            .count();
        let gaps = expanded.saturating_sub(1) as f64;
        self.available_height - gaps * self.config.handle_height
    }

    /// Seed committed heights for the current list, inventing an even share
    /// for ids never seen before.
    fn seed_missing_heights(&mut self) {
        let count = self.sections.len();
        let fallback = if count == 0 {
            0.0
        } else {
            self.content_height() / count as f64
        };
        let mut committed = Vec::with_capacity(count);
        for index in 0..count {
            let height = match self.persisted.get(&self.sections[index].id) {
                Some(height) => *height,
                None => fallback.clamp(self.min_height_at(index), self.max_height_at(index)),
            };
            committed.push(height);
        }
        let Self {
            persisted,
            sections,
            ..
        } = self;
        for (section, height) in sections.iter().zip(committed.iter()) {
            persisted.entry(section.id.clone()).or_insert(*height);
        }
        self.committed = committed;
    }

    /// Whole-list redistribution: spread the delta between the content
    /// target and the committed sum across all sections as one blended
    /// overflow, then apply and commit.
    fn apply_new_size(&mut self) {
        let target = self.content_height();
        let current: f64 = self.committed.iter().sum();
        let offset = target - current;
        self.working.clone_from(&self.committed);
        let candidates: Vec<usize> = (0..self.sections.len()).collect();
        let residual = self.distribute(-offset, &candidates, true);
        trace!(content_target = target, offset, residual, "whole-list relayout");
        self.apply_heights();
        self.commit_heights();
    }

    /// Apply `offset` at the boundary below `anchor` against the committed
    /// baseline, updating the working heights and notifying the host.
    ///
    /// The anchor and the sections above it absorb the offset as growth
    /// (anchor first, then nearest-first sequentially); the sections below
    /// give it up as shrinkage. Whenever either side leaves a residual
    /// beyond tolerance, the offset is corrected by that leftover and the
    /// solve reruns from the committed baseline, so a drag neither side can
    /// satisfy collapses to zero movement instead of losing height. Returns
    /// the offset actually applied.
    pub(crate) fn relayout_at(&mut self, anchor: usize, mut offset: f64) -> f64 {
        let tolerance = self.config.tolerance;
        // Correcting one side can expose a residual on the other and once
        // more at the anchor's own clamp, so bound the reruns.
        let mut corrections = 3;
        loop {
            self.working.clone_from(&self.committed);
            let min = self.min_height_at(anchor);
            let max = self.max_height_at(anchor);
            let before = self.working[anchor];
            let granted = (before + offset).clamp(min, max);
            self.working[anchor] = granted;
            let excess = offset - (granted - before);

            let above: Vec<usize> = (0..anchor).rev().collect();
            let below: Vec<usize> = (anchor + 1..self.sections.len()).collect();
            let overflow_above = if excess.abs() > tolerance {
                self.distribute(-excess, &above, false)
            } else {
                -excess
            };
            let overflow_below = if offset.abs() > tolerance {
                self.distribute(offset, &below, false)
            } else {
                offset
            };
            trace!(
                anchor,
                offset,
                overflow_above,
                overflow_below,
                "anchored relayout"
            );

            if corrections == 0 {
                break;
            }
            corrections -= 1;
            if overflow_above.abs() > tolerance {
                offset += overflow_above;
            } else if overflow_below.abs() > tolerance {
                offset -= overflow_below;
            } else {
                break;
            }
        }
        self.apply_heights();
        offset
    }

    /// Distribute `overflow` over the candidate sections, one pass at a
    /// time over a worklist of unclamped indices.
    ///
    /// Positive overflow shrinks candidates, negative grows them. Blend mode
    /// splits the residual evenly per pass; sequential mode pours it into
    /// the nearest candidate first. The first pass always runs so that
    /// sections whose bounds moved get re-clamped even when the net delta is
    /// under tolerance. Returns the unabsorbed residual.
    fn distribute(&mut self, mut overflow: f64, candidates: &[usize], blend: bool) -> f64 {
        if candidates.is_empty() {
            return overflow;
        }
        let tolerance = self.config.tolerance;
        let mut worklist = candidates.to_vec();
        loop {
            let mut unclamped = Vec::with_capacity(worklist.len());
            let mut share = if blend {
                overflow / worklist.len() as f64
            } else {
                overflow
            };
            for &index in &worklist {
                let min = self.min_height_at(index);
                let max = self.max_height_at(index);
                let requested = self.working[index] - share;
                let granted = requested.clamp(min, max);
                if (min..=max).contains(&requested) {
                    unclamped.push(index);
                }
                overflow -= self.working[index] - granted;
                self.working[index] = granted;
                if !blend {
                    share = overflow;
                    if overflow.abs() < tolerance {
                        break;
                    }
                }
            }
            worklist = unclamped;
            if overflow.abs() <= tolerance || worklist.is_empty() {
                break;
            }
        }
        overflow
    }

    /// Push the working height of every section to the host, in order.
    fn apply_heights(&mut self) {
        let Self {
            apply_height,
            sections,
            working,
            ..
        } = self;
        for (section, height) in sections.iter().zip(working.iter()) {
            apply_height(&section.id, *height);
        }
    }

    /// Adopt the working heights as the new committed baseline.
    pub(crate) fn commit_heights(&mut self) {
        self.committed.clone_from(&self.working);
        let Self {
            persisted,
            sections,
            committed,
            ..
        } = self;
        for (section, height) in sections.iter().zip(committed.iter()) {
            persisted.insert(section.id.clone(), *height);
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot access
// ---------------------------------------------------------------------------

impl ListLayout {
    pub(crate) fn persisted_heights(&self) -> &FxHashMap<SectionId, f64> {
        &self.persisted
    }

    pub(crate) fn collapsed_state(&self) -> &FxHashMap<SectionId, bool> {
        &self.collapsed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
