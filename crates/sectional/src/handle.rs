//! Transient drag cursor for one section boundary.

use tracing::debug;

use crate::layout::ListLayout;

/// A drag gesture in progress on one section boundary.
///
/// Created by [`ListLayout::open_handle`] and discarded when the gesture
/// ends. Every [`set_height`](Self::set_height) re-anchors from the height
/// the section had when the handle was opened, so repeated calls with the
/// same absolute target do not drift. Dropping the handle without
/// [`finish`](Self::finish) abandons the drag and leaves the committed
/// baseline untouched.
///
/// The handle borrows the layout mutably for its whole lifetime, so two
/// drags cannot overlap.
#[derive(Debug)]
pub struct Handle<'a> {
    layout: &'a mut ListLayout,
    anchor: usize,
    origin: f64,
    applied_offset: f64,
}

impl<'a> Handle<'a> {
    pub(crate) fn new(layout: &'a mut ListLayout, anchor: usize, origin: f64) -> Self {
        Self {
            layout,
            anchor,
            origin,
            applied_offset: 0.0,
        }
    }

    /// Drag the boundary so the anchored section reaches `height`.
    ///
    /// The requested offset is `height - origin`; the layout clamps it to
    /// whatever the neighboring sections can actually absorb. Non-finite
    /// targets are ignored. Chainable.
    pub fn set_height(&mut self, height: f64) -> &mut Self {
        if height.is_finite() {
            let offset = height - self.origin;
            self.applied_offset = self.layout.relayout_at(self.anchor, offset);
        }
        self
    }

    /// The offset the layout actually applied on the last
    /// [`set_height`](Self::set_height).
    ///
    /// When this stops following the requested offset the drag has hit the
    /// rubber-band limit and the cursor cannot be followed further.
    #[must_use]
    pub fn applied_offset(&self) -> f64 {
        self.applied_offset
    }

    /// Height of the anchored section when the handle was opened.
    #[must_use]
    pub fn origin(&self) -> f64 {
        self.origin
    }

    /// Commit the in-progress heights as the new persisted baseline.
    pub fn finish(&mut self) -> &mut Self {
        debug!(
            anchor = self.anchor,
            applied = self.applied_offset,
            "drag committed"
        );
        self.layout.commit_heights();
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
