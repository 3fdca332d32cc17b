#![forbid(unsafe_code)]

//! Container tree, focus tracking, menus, and leaf surfaces.
//!
//! The [`Tree`] arena owns every node of a UI: leaf surfaces, axis splits,
//! and float containers. Each render pass resolves the tree top-down into
//! concrete rectangles, paints the base tree, then paints floats over it in
//! declaration order. [`FocusTracker`] decides which leaf receives keys;
//! the menu module turns directional input into a selection path through a
//! [`menu::MenuItem`] tree and projects it onto the float layer.

pub mod chrome;
pub mod float;
pub mod focus;
pub mod menu;
pub mod menubar;
pub mod surface;
pub mod surfaces;
pub mod tree;

pub use float::{Anchor, Float, Placement};
pub use focus::FocusTracker;
pub use surface::{EventOutcome, Surface};
pub use tree::{Axis, LayoutFault, NodeId, Tree};
