//! Adapter between the layout engine and a host drag-resize framework.
//!
//! Host frameworks typically model a drag as "an item was grabbed, a stream
//! of absolute sizes arrives, then the gesture ends". [`SectionDistributor`]
//! translates that protocol onto [`Handle`](crate::Handle): construction
//! opens the handle, `resize` forwards absolute heights, `finish` commits.

use crate::error::LayoutError;
use crate::handle::Handle;
use crate::layout::ListLayout;
use crate::section::SectionId;

/// A resizable item in the host framework's sense.
///
/// The only thing the layout needs from the host item is a stable section
/// id to bind the drag to.
pub trait ResizeItem {
    /// The section this item resizes.
    fn section_id(&self) -> &SectionId;
}

impl ResizeItem for SectionId {
    fn section_id(&self) -> &SectionId {
        self
    }
}

/// The host-facing resize contract: absolute sizes during the gesture, one
/// end-of-gesture call.
pub trait SizeDistributor {
    /// A drag event delivered an absolute target size.
    fn resize(&mut self, height: f64);
    /// The drag gesture ended; commit the result.
    fn finish(&mut self);
}

/// Binds one host item to a [`Handle`] for the duration of a drag gesture.
#[derive(Debug)]
pub struct SectionDistributor<'a> {
    handle: Handle<'a>,
}

impl<'a> SectionDistributor<'a> {
    /// Open a handle for the item's section.
    ///
    /// Fails if the item's id is not in the layout's current section list.
    pub fn new(layout: &'a mut ListLayout, item: &impl ResizeItem) -> Result<Self, LayoutError> {
        let handle = layout.open_handle(item.section_id())?;
        Ok(Self { handle })
    }

    /// The offset the layout applied on the last resize, for rubber-band
    /// detection by the host cursor.
    #[must_use]
    pub fn applied_offset(&self) -> f64 {
        self.handle.applied_offset()
    }
}

impl SizeDistributor for SectionDistributor<'_> {
    fn resize(&mut self, height: f64) {
        self.handle.set_height(height);
    }

    fn finish(&mut self) {
        self.handle.finish();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::Section;

    struct HostItem {
        id: SectionId,
    }

    impl ResizeItem for HostItem {
        fn section_id(&self) -> &SectionId {
            &self.id
        }
    }

    fn ready_layout() -> ListLayout {
        let mut layout = ListLayout::with_defaults(|_, _| {});
        layout
            .update(&[Section::new("a", 3), Section::new("b", 5)], 400.0)
            .unwrap();
        layout
    }

    #[test]
    fn resize_and_finish_delegate_to_handle() {
        let mut layout = ready_layout();
        let item = HostItem { id: "a".into() };
        {
            let mut distributor = SectionDistributor::new(&mut layout, &item).unwrap();
            distributor.resize(260.0);
            distributor.finish();
        }
        assert_eq!(layout.height_of(&"a".into()), Some(260.0));
        assert_eq!(layout.height_of(&"b".into()), Some(139.0));
    }

    #[test]
    fn unknown_item_is_rejected_at_construction() {
        let mut layout = ready_layout();
        let item = HostItem { id: "ghost".into() };
        let err = SectionDistributor::new(&mut layout, &item).unwrap_err();
        assert!(matches!(err, LayoutError::UnknownSection { .. }));
    }

    #[test]
    fn dropping_without_finish_abandons_the_drag() {
        let mut layout = ready_layout();
        let item = HostItem { id: "a".into() };
        {
            let mut distributor = SectionDistributor::new(&mut layout, &item).unwrap();
            distributor.resize(300.0);
        }
        assert_eq!(layout.height_of(&"a".into()), Some(199.5));
    }

    #[test]
    fn section_id_is_its_own_resize_item() {
        let mut layout = ready_layout();
        let id = SectionId::new("b");
        assert!(SectionDistributor::new(&mut layout, &id).is_ok());
    }

    #[test]
    fn applied_offset_reports_rubber_band() {
        let mut layout = ready_layout();
        let item = HostItem { id: "a".into() };
        let mut distributor = SectionDistributor::new(&mut layout, &item).unwrap();
        distributor.resize(10.0);
        // "a" floors at 74, so only -125.5 of the requested -189.5 applies.
        assert_eq!(distributor.applied_offset(), -125.5);
    }
}
