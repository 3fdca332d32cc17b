#![forbid(unsafe_code)]

//! The cross-thread repaint signal.
//!
//! Everything else in the runtime is single-threaded; this flag is the one
//! piece of state a background task may touch. Workers store their results
//! in UI-owned shared state (atomics, mutex-guarded logs) and then call
//! [`RepaintHandle::request`]; the UI loop reads the state at the next
//! scheduled pass.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The loop-side end of the repaint signal.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct RepaintSignal {
    flag: Arc<AtomicBool>,
}

impl RepaintSignal {
    /// A signal with no pending repaint.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle for requesting repaints from any thread.
    #[must_use]
    pub fn handle(&self) -> RepaintHandle {
        RepaintHandle {
            flag: self.flag.clone(),
        }
    }

    /// Consume a pending request, if any.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }

    /// Whether a repaint is pending, without consuming it.
    #[must_use]
    pub fn pending(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Requests a repaint of the UI. Cheap to clone, safe to call from any
/// thread.
#[derive(Debug, Clone)]
pub struct RepaintHandle {
    flag: Arc<AtomicBool>,
}

impl RepaintHandle {
    /// Ask the loop to repaint at its next pass. Requests coalesce.
    pub fn request(&self) {
        self.flag.store(true, Ordering::Release);
    }
}
