#![forbid(unsafe_code)]

//! The terminal seam.
//!
//! The runtime consumes the terminal through this narrow trait: report the
//! grid size, deliver one event at a time, present a finished frame. The
//! real terminal lives behind the `crossterm` feature; [`TestBackend`]
//! drives the loop from a script in tests.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;
use trellis_core::event::Event;
use trellis_core::geometry::Size;
use trellis_render::Frame;

/// A terminal the runtime can drive.
pub trait Backend {
    /// Current grid size.
    fn size(&mut self) -> io::Result<Size>;

    /// Wait up to `timeout` for the next event. `Ok(None)` on timeout.
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<Event>>;

    /// Show a finished frame (cells plus cursor).
    fn present(&mut self, frame: &Frame) -> io::Result<()>;
}

/// Scripted backend for tests.
///
/// Events are served from a queue; presented frames are kept for
/// inspection. To keep a broken script from hanging a test, polling an
/// empty queue too many times in a row is an error.
pub struct TestBackend {
    size: Size,
    events: VecDeque<Event>,
    frames: Vec<Frame>,
    idle_polls: u32,
    max_idle_polls: u32,
}

impl TestBackend {
    /// A backend with the given grid size and no scripted events.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            size: Size::new(width, height),
            events: VecDeque::new(),
            frames: Vec::new(),
            idle_polls: 0,
            max_idle_polls: 10_000,
        }
    }

    /// Append scripted events.
    #[must_use]
    pub fn with_events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.events.extend(events);
        self
    }

    /// Queue one more event.
    pub fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// The most recently presented frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Every presented frame, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

impl Backend for TestBackend {
    fn size(&mut self) -> io::Result<Size> {
        Ok(self.size)
    }

    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        match self.events.pop_front() {
            Some(event) => {
                self.idle_polls = 0;
                Ok(Some(event))
            }
            None => {
                self.idle_polls += 1;
                if self.idle_polls > self.max_idle_polls {
                    return Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        "test backend: event script exhausted without exit",
                    ));
                }
                // Yield briefly so background workers in tests make
                // progress while the loop waits.
                std::thread::sleep(timeout.min(Duration::from_millis(1)));
                Ok(None)
            }
        }
    }

    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::event::{KeyCode, KeyEvent};

    #[test]
    fn events_are_served_in_order() {
        let mut backend = TestBackend::new(10, 4)
            .with_events([Event::Key(KeyEvent::new(KeyCode::Tab)), Event::Resize {
                width: 20,
                height: 5,
            }]);
        let t = Duration::from_millis(1);
        assert_eq!(
            backend.poll_event(t).unwrap(),
            Some(Event::Key(KeyEvent::new(KeyCode::Tab)))
        );
        assert_eq!(
            backend.poll_event(t).unwrap(),
            Some(Event::Resize {
                width: 20,
                height: 5
            })
        );
        assert_eq!(backend.poll_event(t).unwrap(), None);
    }

    #[test]
    fn exhausted_script_eventually_errors() {
        let mut backend = TestBackend::new(10, 4);
        backend.max_idle_polls = 3;
        let t = Duration::from_micros(10);
        for _ in 0..3 {
            assert!(backend.poll_event(t).unwrap().is_none());
        }
        assert!(backend.poll_event(t).is_err());
    }
}
