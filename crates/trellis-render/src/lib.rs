#![forbid(unsafe_code)]

//! Render kernel: styled cells, the cell-grid buffer, and frames.
//!
//! Containers and widgets paint into a [`Buffer`] through their assigned
//! rectangle; overlays are composited with [`Buffer::merge`]. A [`Frame`]
//! bundles the buffer with the logical cursor position for a render pass.
//!
//! Style here is deliberately minimal: enough to express focus and
//! selection highlighting. Theme resolution is out of scope.

pub mod buffer;
pub mod cell;
pub mod frame;

pub use buffer::Buffer;
pub use cell::{Cell, Color, Style, StyleFlags};
pub use frame::Frame;
