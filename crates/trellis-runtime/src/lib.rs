#![forbid(unsafe_code)]

//! The cooperative runtime loop.
//!
//! One thread runs the whole UI: poll input, dispatch to the focused leaf,
//! drain queued requests, resolve layout, paint. The single cross-thread
//! boundary is the [`RepaintHandle`]: a background worker stores its
//! progress somewhere the UI reads (say a gauge's atomic) and requests a
//! repaint; the loop picks both up at the next pass.
//!
//! The loop ends when a value is handed to the app's [`Exiter`];
//! [`App::run`] returns it.

pub mod app;
pub mod backend;
#[cfg(all(feature = "crossterm", not(target_arch = "wasm32")))]
pub mod crossterm_backend;
pub mod repaint;

pub use app::{App, AppConfig, Exiter, Handles, Request, Requests};
pub use backend::{Backend, TestBackend};
#[cfg(all(feature = "crossterm", not(target_arch = "wasm32")))]
pub use crossterm_backend::CrosstermBackend;
pub use repaint::{RepaintHandle, RepaintSignal};
