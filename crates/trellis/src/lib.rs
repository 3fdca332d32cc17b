#![forbid(unsafe_code)]

//! Trellis public facade.
//!
//! Re-exports the stable surface of the workspace crates and offers a
//! prelude for day-to-day use.

// --- Core re-exports -------------------------------------------------------

pub use trellis_core::event::{Event, KeyCode, KeyEvent, Modifiers};
pub use trellis_core::geometry::{Rect, Sides, Size};
pub use trellis_core::text::display_width;

// --- Render re-exports -----------------------------------------------------

pub use trellis_render::{Buffer, Cell, Color, Frame, Style, StyleFlags};

// --- Layout re-exports -----------------------------------------------------

pub use trellis_layout::{Dimension, Distribution, UNBOUNDED, distribute};

// --- Widget re-exports -----------------------------------------------------

pub use trellis_widgets::chrome;
pub use trellis_widgets::menu::{self, Activation, MenuItem, MenuNavigator};
pub use trellis_widgets::menubar::{self, MenuLayer};
pub use trellis_widgets::surfaces::{Button, Fill, Gauge, GaugeHandle, Label};
pub use trellis_widgets::{Anchor, Axis, EventOutcome, Float, FocusTracker, LayoutFault, NodeId,
    Placement, Surface, Tree};

// --- Runtime re-exports ----------------------------------------------------

pub use trellis_runtime::{App, AppConfig, Backend, Exiter, Handles, RepaintHandle, Requests,
    TestBackend};

#[cfg(feature = "crossterm")]
pub use trellis_runtime::CrosstermBackend;

/// Common imports for building an app.
pub mod prelude {
    pub use crate::{
        Anchor, App, AppConfig, Axis, Button, Dimension, Event, Fill, Float, FocusTracker, Frame,
        Gauge, KeyCode, KeyEvent, Label, MenuItem, NodeId, Placement, Rect, Style, Surface, Tree,
        chrome, menubar,
    };
}
