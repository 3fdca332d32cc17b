#![forbid(unsafe_code)]

//! Floating overlays.
//!
//! A [`Float`] positions a tree node above the base layout, either at fixed
//! offsets from its container's edges or attached to another node's resolved
//! rectangle. Floats resolve after the base tree and may overhang their
//! container; they are clamped to the screen, never flipped, so a dropdown
//! stays below its bar and submenu cascades stay to the right.

use crate::tree::NodeId;
use trellis_core::geometry::Rect;

/// Where a float sits relative to its anchor node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Directly below the anchor, left edges aligned.
    Below,
    /// Directly above the anchor, left edges aligned.
    Above,
    /// To the right of the anchor, top edges aligned.
    RightOf,
    /// To the left of the anchor, top edges aligned.
    LeftOf,
}

/// How a float's rectangle is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Offsets from the container's edges. `None` edges leave the content's
    /// preferred size to decide; when both edges of an axis are unset the
    /// float centers on that axis. Offsets may be negative, letting shadows
    /// hang outside the container.
    Absolute {
        left: Option<i16>,
        top: Option<i16>,
        right: Option<i16>,
        bottom: Option<i16>,
    },
    /// Positioned relative to another node's rectangle from the same
    /// resolution pass. The anchor node must resolve before this float.
    Attached {
        node: NodeId,
        placement: Placement,
        dx: i16,
        dy: i16,
    },
}

impl Anchor {
    /// Centered on both axes.
    #[must_use]
    pub const fn centered() -> Self {
        Self::Absolute {
            left: None,
            top: None,
            right: None,
            bottom: None,
        }
    }

    /// Attached to `node` with the given placement and no extra offset.
    #[must_use]
    pub const fn attached(node: NodeId, placement: Placement) -> Self {
        Self::Attached {
            node,
            placement,
            dx: 0,
            dy: 0,
        }
    }
}

/// An overlay entry of a float container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Float {
    /// The node painted inside the float.
    pub content: NodeId,
    /// How the float's rectangle is derived.
    pub anchor: Anchor,
    /// Size overrides; `None` falls back to edge offsets, then to the
    /// content's preferred size.
    pub width: Option<u16>,
    pub height: Option<u16>,
    /// Transparent floats only paint non-blank cells; opaque floats
    /// overwrite everything beneath their rectangle.
    pub transparent: bool,
    /// Hidden floats are skipped during resolution and painting.
    pub hidden: bool,
}

impl Float {
    /// A visible, opaque float.
    #[must_use]
    pub const fn new(content: NodeId, anchor: Anchor) -> Self {
        Self {
            content,
            anchor,
            width: None,
            height: None,
            transparent: false,
            hidden: false,
        }
    }

    /// Fix the float's width.
    #[must_use]
    pub const fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Fix the float's height.
    #[must_use]
    pub const fn height(mut self, height: u16) -> Self {
        self.height = Some(height);
        self
    }

    /// Only paint non-blank cells.
    #[must_use]
    pub const fn transparent(mut self) -> Self {
        self.transparent = true;
        self
    }

    /// Set visibility.
    #[must_use]
    pub const fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// Compute an absolute float's rectangle from its container's bounds.
///
/// `pref` is the content's preferred size, used for any axis without both
/// edges set and no explicit override.
pub(crate) fn resolve_absolute(
    container: Rect,
    left: Option<i16>,
    top: Option<i16>,
    right: Option<i16>,
    bottom: Option<i16>,
    override_w: Option<u16>,
    override_h: Option<u16>,
    pref: (u16, u16),
) -> (i32, i32, i32, i32) {
    let (w, x) = resolve_axis(
        i32::from(container.x),
        i32::from(container.width),
        left,
        right,
        override_w,
        pref.0,
    );
    let (h, y) = resolve_axis(
        i32::from(container.y),
        i32::from(container.height),
        top,
        bottom,
        override_h,
        pref.1,
    );
    (x, y, w, h)
}

fn resolve_axis(
    origin: i32,
    extent: i32,
    near: Option<i16>,
    far: Option<i16>,
    size_override: Option<u16>,
    pref: u16,
) -> (i32, i32) {
    let size = match (size_override, near, far) {
        (Some(s), _, _) => i32::from(s),
        (None, Some(n), Some(f)) => extent - i32::from(n) - i32::from(f),
        _ => i32::from(pref),
    };
    let pos = match (near, far) {
        (Some(n), _) => origin + i32::from(n),
        (None, Some(f)) => origin + extent - i32::from(f) - size,
        (None, None) => origin + (extent - size) / 2,
    };
    (size, pos)
}

/// Compute an attached float's rectangle next to `anchor`.
pub(crate) fn resolve_attached(
    anchor: Rect,
    placement: Placement,
    dx: i16,
    dy: i16,
    size: (u16, u16),
) -> (i32, i32, i32, i32) {
    let (w, h) = (i32::from(size.0), i32::from(size.1));
    let (dx, dy) = (i32::from(dx), i32::from(dy));
    let (x, y) = match placement {
        Placement::Below => (i32::from(anchor.x) + dx, i32::from(anchor.bottom()) + dy),
        Placement::Above => (i32::from(anchor.x) + dx, i32::from(anchor.y) - dy - h),
        Placement::RightOf => (i32::from(anchor.right()) + dx, i32::from(anchor.y) + dy),
        Placement::LeftOf => (i32::from(anchor.x) - dx - w, i32::from(anchor.y) + dy),
    };
    (x, y, w, h)
}

/// Clamp a possibly out-of-range rectangle into `screen`.
pub(crate) fn clamp_to_screen(x: i32, y: i32, w: i32, h: i32, screen: Rect) -> Rect {
    let w = w.clamp(0, i32::from(u16::MAX)) as u16;
    let h = h.clamp(0, i32::from(u16::MAX)) as u16;
    let x = x.clamp(0, i32::from(u16::MAX)) as u16;
    let y = y.clamp(0, i32::from(u16::MAX)) as u16;
    Rect::new(x, y, w, h).clamp_within(screen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_with_all_edges_spans_container() {
        let c = Rect::new(2, 3, 20, 10);
        let (x, y, w, h) =
            resolve_absolute(c, Some(1), Some(1), Some(1), Some(1), None, None, (0, 0));
        assert_eq!((x, y, w, h), (3, 4, 18, 8));
    }

    #[test]
    fn absolute_unset_edges_center_preferred_size() {
        let c = Rect::new(0, 0, 20, 10);
        let (x, y, w, h) = resolve_absolute(c, None, None, None, None, None, None, (6, 4));
        assert_eq!((x, y, w, h), (7, 3, 6, 4));
    }

    #[test]
    fn absolute_negative_offsets_overhang() {
        // A shadow strip one row below the container.
        let c = Rect::new(5, 5, 10, 4);
        let (x, y, w, h) =
            resolve_absolute(c, Some(1), None, Some(-1), Some(-1), None, Some(1), (0, 0));
        assert_eq!(x, 6);
        assert_eq!(w, 10); // left 1 .. right -1
        assert_eq!(h, 1);
        assert_eq!(y, 9); // container bottom
    }

    #[test]
    fn attached_below_lands_under_anchor() {
        let anchor = Rect::new(5, 0, 4, 1);
        let (x, y, w, h) = resolve_attached(anchor, Placement::Below, 0, 0, (8, 3));
        assert_eq!((x, y, w, h), (5, 1, 8, 3));
    }

    #[test]
    fn attached_right_of_cascades() {
        let anchor = Rect::new(5, 1, 10, 6);
        let (x, y, _, _) = resolve_attached(anchor, Placement::RightOf, 0, 2, (8, 3));
        assert_eq!((x, y), (15, 3));
    }

    #[test]
    fn clamp_pulls_overflow_back_on_screen() {
        let screen = Rect::new(0, 0, 80, 24);
        let rect = clamp_to_screen(78, 22, 10, 5, screen);
        assert_eq!(rect, Rect::new(70, 19, 10, 5));
    }

    #[test]
    fn clamp_floors_negative_positions() {
        let screen = Rect::new(0, 0, 80, 24);
        let rect = clamp_to_screen(-3, -2, 10, 5, screen);
        assert_eq!(rect, Rect::new(0, 0, 10, 5));
    }
}
