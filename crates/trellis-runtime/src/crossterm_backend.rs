#![forbid(unsafe_code)]

//! Crossterm-backed terminal. Feature `crossterm`.
//!
//! A thin adapter: raw mode plus alternate screen on entry, restored on
//! drop; events mapped to the engine's key model; frames presented by
//! rewriting only the rows that changed since the previous present.

use crate::backend::Backend;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, Event as CtEvent, KeyCode as CtKeyCode, KeyEventKind as CtKeyEventKind,
    KeyModifiers as CtKeyModifiers,
};
use crossterm::style::{
    Attribute, Color as CtColor, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::time::Duration;
use trellis_core::event::{Event, KeyCode, KeyEvent, Modifiers};
use trellis_core::geometry::Size;
use trellis_core::text::char_width;
use trellis_render::{Color, Frame, Style, StyleFlags};

/// The real terminal.
pub struct CrosstermBackend {
    out: Stdout,
    prev: Option<Frame>,
}

impl CrosstermBackend {
    /// Enter raw mode and the alternate screen.
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, Hide)?;
        Ok(Self { out, prev: None })
    }

    fn write_row(&mut self, frame: &Frame, y: u16) -> io::Result<()> {
        queue!(self.out, MoveTo(0, y))?;
        let mut current: Option<Style> = None;
        let mut skip = false;
        for cell in frame.buffer.row(y) {
            if skip {
                skip = false;
                continue;
            }
            if current != Some(cell.style) {
                apply_style(&mut self.out, cell.style)?;
                current = Some(cell.style);
            }
            queue!(self.out, Print(cell.ch))?;
            // A wide character also covers the next cell; the terminal
            // advanced two columns, so drop the continuation blank.
            if char_width(cell.ch) == 2 {
                skip = true;
            }
        }
        Ok(())
    }
}

impl Backend for CrosstermBackend {
    fn size(&mut self) -> io::Result<Size> {
        let (width, height) = terminal::size()?;
        Ok(Size::new(width, height))
    }

    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            CtEvent::Key(key) if key.kind != CtKeyEventKind::Release => {
                Ok(map_key(key.code).map(|code| {
                    Event::Key(KeyEvent::new(code).with_modifiers(map_modifiers(key.modifiers)))
                }))
            }
            CtEvent::Resize(width, height) => Ok(Some(Event::Resize { width, height })),
            _ => Ok(None),
        }
    }

    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        let rows = match &self.prev {
            Some(prev) => frame.buffer.changed_rows(&prev.buffer),
            None => (0..frame.height()).collect(),
        };
        for y in rows {
            self.write_row(frame, y)?;
        }
        queue!(self.out, SetAttribute(Attribute::Reset))?;
        match frame.cursor() {
            Some((x, y)) => queue!(self.out, MoveTo(x, y), Show)?,
            None => queue!(self.out, Hide)?,
        }
        self.out.flush()?;
        self.prev = Some(frame.clone());
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = execute!(self.out, SetAttribute(Attribute::Reset), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

fn apply_style(out: &mut Stdout, style: Style) -> io::Result<()> {
    queue!(
        out,
        SetAttribute(Attribute::Reset),
        SetForegroundColor(map_color(style.fg)),
        SetBackgroundColor(map_color(style.bg)),
    )?;
    if style.flags.contains(StyleFlags::BOLD) {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.flags.contains(StyleFlags::DIM) {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    if style.flags.contains(StyleFlags::ITALIC) {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    if style.flags.contains(StyleFlags::UNDERLINE) {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    if style.flags.contains(StyleFlags::REVERSE) {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    Ok(())
}

fn map_color(color: Color) -> CtColor {
    match color {
        Color::Default => CtColor::Reset,
        Color::Black => CtColor::Black,
        Color::Red => CtColor::DarkRed,
        Color::Green => CtColor::DarkGreen,
        Color::Yellow => CtColor::DarkYellow,
        Color::Blue => CtColor::DarkBlue,
        Color::Magenta => CtColor::DarkMagenta,
        Color::Cyan => CtColor::DarkCyan,
        Color::White => CtColor::Grey,
        Color::Indexed(i) => CtColor::AnsiValue(i),
        Color::Rgb(r, g, b) => CtColor::Rgb { r, g, b },
    }
}

fn map_key(code: CtKeyCode) -> Option<KeyCode> {
    match code {
        CtKeyCode::Char(c) => Some(KeyCode::Char(c)),
        CtKeyCode::Enter => Some(KeyCode::Enter),
        CtKeyCode::Esc => Some(KeyCode::Escape),
        CtKeyCode::Backspace => Some(KeyCode::Backspace),
        CtKeyCode::Tab => Some(KeyCode::Tab),
        CtKeyCode::BackTab => Some(KeyCode::BackTab),
        CtKeyCode::Left => Some(KeyCode::Left),
        CtKeyCode::Right => Some(KeyCode::Right),
        CtKeyCode::Up => Some(KeyCode::Up),
        CtKeyCode::Down => Some(KeyCode::Down),
        CtKeyCode::Home => Some(KeyCode::Home),
        CtKeyCode::End => Some(KeyCode::End),
        CtKeyCode::PageUp => Some(KeyCode::PageUp),
        CtKeyCode::PageDown => Some(KeyCode::PageDown),
        CtKeyCode::Delete => Some(KeyCode::Delete),
        CtKeyCode::F(n) => Some(KeyCode::F(n)),
        _ => None,
    }
}

fn map_modifiers(mods: CtKeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if mods.contains(CtKeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if mods.contains(CtKeyModifiers::CONTROL) {
        out |= Modifiers::CTRL;
    }
    if mods.contains(CtKeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    out
}
