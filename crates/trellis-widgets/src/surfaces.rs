#![forbid(unsafe_code)]

//! Basic leaf surfaces.

use crate::surface::{EventOutcome, Surface};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use trellis_core::event::{KeyCode, KeyEvent};
use trellis_core::geometry::Rect;
use trellis_core::text::display_width;
use trellis_layout::Dimension;
use trellis_render::{Frame, Style};

/// Static text. Not focusable.
pub struct Label {
    lines: Vec<String>,
    style: Style,
}

impl Label {
    /// A label showing `text` (may be multiline).
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            lines: text.lines().map(str::to_owned).collect(),
            style: Style::new(),
        }
    }

    /// Set the text style.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn longest_line(&self) -> u16 {
        self.lines
            .iter()
            .map(|l| display_width(l))
            .max()
            .unwrap_or(0)
            .min(usize::from(u16::MAX)) as u16
    }
}

impl Surface for Label {
    fn width_hint(&self) -> Dimension {
        Dimension::default().preferring(self.longest_line())
    }

    fn height_hint(&self) -> Dimension {
        Dimension::exact(self.lines.len().min(usize::from(u16::MAX)) as u16)
    }

    fn render(&mut self, area: Rect, frame: &mut Frame, _focused: bool) {
        frame.buffer.fill(area, ' ', self.style);
        for (i, line) in self.lines.iter().enumerate() {
            let Ok(dy) = u16::try_from(i) else { break };
            if dy >= area.height {
                break;
            }
            frame
                .buffer
                .draw_str(area.x, area.y + dy, line, self.style, area);
        }
    }
}

/// A clickable button rendered as `< caption >`.
pub struct Button {
    caption: String,
    width: u16,
    handler: Option<Box<dyn FnMut()>>,
    style: Style,
}

impl Button {
    /// A button with the default width of 12 cells.
    #[must_use]
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            width: 12,
            handler: None,
            style: Style::new(),
        }
    }

    /// Run `handler` when the button is activated with Enter or Space.
    #[must_use]
    pub fn on_press(mut self, handler: impl FnMut() + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Set the total width of the button.
    #[must_use]
    pub fn width(mut self, width: u16) -> Self {
        self.width = width.max(4);
        self
    }

    /// Set the resting style.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Surface for Button {
    fn width_hint(&self) -> Dimension {
        Dimension::exact(self.width)
    }

    fn height_hint(&self) -> Dimension {
        Dimension::exact(1)
    }

    fn focusable(&self) -> bool {
        true
    }

    fn render(&mut self, area: Rect, frame: &mut Frame, focused: bool) {
        let style = if focused {
            self.style.reversed()
        } else {
            self.style
        };
        let inner = usize::from(self.width.saturating_sub(4));
        let caption = trellis_core::text::truncate_to_width(&self.caption, inner);
        let pad = inner.saturating_sub(display_width(caption));
        let text = format!("< {}{} >", caption, " ".repeat(pad));
        frame.buffer.fill(area, ' ', style);
        frame.buffer.draw_str(area.x, area.y, &text, style, area);
    }

    fn on_key(&mut self, key: KeyEvent) -> EventOutcome {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(handler) = &mut self.handler {
                    handler();
                }
                EventOutcome::Consumed
            }
            _ => EventOutcome::Ignored,
        }
    }
}

/// A leaf that fills its whole area with one character.
///
/// Used for borders, rules, padding, and shadows.
pub struct Fill {
    ch: char,
    style: Style,
}

impl Fill {
    /// Fill with `ch` in the default style.
    #[must_use]
    pub fn new(ch: char) -> Self {
        Self {
            ch,
            style: Style::new(),
        }
    }

    /// Set the fill style.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Surface for Fill {
    fn render(&mut self, area: Rect, frame: &mut Frame, _focused: bool) {
        frame.buffer.fill(area, self.ch, self.style);
    }
}

/// Shared percentage a worker thread writes and a [`Gauge`] reads.
///
/// The handle only stores the value; pair it with the runtime's repaint
/// signal so the change becomes visible at the next pass.
#[derive(Debug, Clone)]
pub struct GaugeHandle {
    percent: Arc<AtomicU8>,
}

impl GaugeHandle {
    /// Store a new percentage, saturating at 100.
    pub fn set(&self, percent: u8) {
        self.percent.store(percent.min(100), Ordering::Relaxed);
    }

    /// The last stored percentage.
    #[must_use]
    pub fn get(&self) -> u8 {
        self.percent.load(Ordering::Relaxed)
    }
}

/// A one-row progress bar.
pub struct Gauge {
    percent: Arc<AtomicU8>,
    bar_style: Style,
}

impl Gauge {
    /// A gauge at zero percent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            percent: Arc::new(AtomicU8::new(0)),
            bar_style: Style::new().reversed(),
        }
    }

    /// A handle for updating the gauge from any thread.
    #[must_use]
    pub fn handle(&self) -> GaugeHandle {
        GaugeHandle {
            percent: self.percent.clone(),
        }
    }

    /// Style of the filled portion.
    #[must_use]
    pub fn bar_style(mut self, style: Style) -> Self {
        self.bar_style = style;
        self
    }
}

impl Default for Gauge {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for Gauge {
    fn height_hint(&self) -> Dimension {
        Dimension::exact(1)
    }

    fn render(&mut self, area: Rect, frame: &mut Frame, _focused: bool) {
        let percent = self.percent.load(Ordering::Relaxed).min(100);
        frame.buffer.fill(area, ' ', Style::new());

        let text = format!("{percent:>3}%");
        let text_x = area.x + (area.width.saturating_sub(text.len() as u16)) / 2;
        frame
            .buffer
            .draw_str(text_x, area.y, &text, Style::new(), area);

        let filled = u16::try_from(
            u32::from(area.width) * u32::from(percent) / 100,
        )
        .unwrap_or(area.width);
        frame.buffer.style_region(
            Rect::new(area.x, area.y, filled, area.height.min(1)),
            self.bar_style,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_render::StyleFlags;

    fn render_one(surface: &mut dyn Surface, width: u16, height: u16, focused: bool) -> Frame {
        let mut frame = Frame::new(width, height);
        surface.render(Rect::new(0, 0, width, height), &mut frame, focused);
        frame
    }

    #[test]
    fn label_reports_longest_line() {
        let label = Label::new("ab\nlonger line\nx");
        assert_eq!(label.width_hint().preferred, 11);
        assert_eq!(label.height_hint(), Dimension::exact(3));
    }

    #[test]
    fn label_renders_each_line() {
        let mut label = Label::new("one\ntwo");
        let frame = render_one(&mut label, 5, 2, false);
        assert_eq!(frame.buffer.row_text(0), "one  ");
        assert_eq!(frame.buffer.row_text(1), "two  ");
    }

    #[test]
    fn button_caption_is_bracketed() {
        let mut button = Button::new("Ok").width(8);
        let frame = render_one(&mut button, 8, 1, false);
        assert_eq!(frame.buffer.row_text(0), "< Ok   >");
    }

    #[test]
    fn focused_button_is_highlighted() {
        let mut button = Button::new("Ok");
        let frame = render_one(&mut button, 12, 1, true);
        let cell = frame.buffer.get(0, 0).unwrap();
        assert!(cell.style.flags.contains(StyleFlags::REVERSE));
    }

    #[test]
    fn button_fires_on_enter_and_space_only() {
        use std::cell::Cell;
        use std::rc::Rc;
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let mut button = Button::new("Go").on_press(move || counter.set(counter.get() + 1));

        assert_eq!(
            button.on_key(KeyEvent::new(KeyCode::Enter)),
            EventOutcome::Consumed
        );
        assert_eq!(
            button.on_key(KeyEvent::new(KeyCode::Char(' '))),
            EventOutcome::Consumed
        );
        assert_eq!(
            button.on_key(KeyEvent::new(KeyCode::Char('x'))),
            EventOutcome::Ignored
        );
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn gauge_reflects_thread_written_value() {
        let mut gauge = Gauge::new();
        let handle = gauge.handle();
        let worker = std::thread::spawn(move || handle.set(50));
        worker.join().unwrap();

        let frame = render_one(&mut gauge, 10, 1, false);
        assert!(frame.buffer.row_text(0).contains("50%"));
        // Half the row carries the bar style.
        let styled = (0..10)
            .filter(|&x| {
                frame
                    .buffer
                    .get(x, 0)
                    .unwrap()
                    .style
                    .flags
                    .contains(StyleFlags::REVERSE)
            })
            .count();
        assert_eq!(styled, 5);
    }

    #[test]
    fn gauge_handle_saturates_at_hundred() {
        let gauge = Gauge::new();
        let handle = gauge.handle();
        handle.set(250);
        assert_eq!(handle.get(), 100);
    }
}
