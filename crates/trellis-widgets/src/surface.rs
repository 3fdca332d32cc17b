#![forbid(unsafe_code)]

//! The leaf extension point.
//!
//! The node set of the tree is closed (leaf, split, float container); new
//! behavior is added by implementing [`Surface`] for a new leaf kind, not by
//! adding node variants.

use trellis_core::event::KeyEvent;
use trellis_core::geometry::Rect;
use trellis_layout::Dimension;
use trellis_render::Frame;

/// Whether a key event was handled by the surface it was offered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The surface handled the event; dispatch stops.
    Consumed,
    /// The surface did not handle the event; global bindings may.
    Ignored,
}

impl EventOutcome {
    /// Whether this outcome stops further dispatch.
    #[must_use]
    pub const fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

/// An atomic rectangular drawable unit.
///
/// Surfaces report how much space they want through the dimension hints,
/// paint themselves into their assigned rectangle, and optionally take
/// keyboard focus.
pub trait Surface {
    /// Horizontal space request. Defaults to fully flexible.
    fn width_hint(&self) -> Dimension {
        Dimension::default()
    }

    /// Vertical space request. Defaults to fully flexible.
    fn height_hint(&self) -> Dimension {
        Dimension::default()
    }

    /// Whether the surface participates in tab cycling.
    fn focusable(&self) -> bool {
        false
    }

    /// Paint into `area` of `frame`. `focused` reflects the focus tracker's
    /// current leaf during this pass.
    fn render(&mut self, area: Rect, frame: &mut Frame, focused: bool);

    /// Offer a key event. Only the focused leaf is offered events, before
    /// any global binding sees them.
    fn on_key(&mut self, _key: KeyEvent) -> EventOutcome {
        EventOutcome::Ignored
    }

    /// Called when the surface gains or loses focus.
    fn on_focus_change(&mut self, _focused: bool) {}
}
