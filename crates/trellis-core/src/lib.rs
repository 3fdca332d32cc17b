#![forbid(unsafe_code)]

//! Core primitives for Trellis: geometry, input events, and text measurement.
//!
//! This crate has no opinion about rendering or layout policy. It defines the
//! vocabulary the rest of the workspace speaks: cell-grid rectangles, key
//! events, and display-width measurement.

pub mod event;
pub mod geometry;
pub mod text;

pub use event::{Event, KeyCode, KeyEvent, Modifiers};
pub use geometry::{Rect, Sides, Size};
pub use text::display_width;
