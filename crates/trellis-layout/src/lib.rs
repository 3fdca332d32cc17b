#![forbid(unsafe_code)]

//! Dimension constraint solver.
//!
//! A [`Dimension`] describes how much space a node wants along one axis and
//! how flexibly it yields it: a hard minimum, a hard maximum, the size it
//! prefers, and a weight for dividing surplus among siblings.
//! [`distribute`] turns a run of sibling dimensions plus the available space
//! into concrete sizes.
//!
//! This crate is a pure solver: no rendering, no tree, no I/O.

mod dimension;

pub use dimension::{Dimension, Distribution, UNBOUNDED, distribute};
