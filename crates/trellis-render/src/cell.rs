#![forbid(unsafe_code)]

//! Styled character cells.

use bitflags::bitflags;

/// A terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The terminal's default foreground/background.
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    /// An entry in the 256-color palette.
    Indexed(u8),
    /// 24-bit color.
    Rgb(u8, u8, u8),
}

bitflags! {
    /// Text attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        const BOLD      = 1 << 0;
        const DIM       = 1 << 1;
        const ITALIC    = 1 << 2;
        const UNDERLINE = 1 << 3;
        const REVERSE   = 1 << 4;
    }
}

/// Foreground, background, and attributes for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub flags: StyleFlags,
}

impl Style {
    /// The terminal's default style.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: Color::Default,
            bg: Color::Default,
            flags: StyleFlags::empty(),
        }
    }

    /// Set the foreground color.
    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = color;
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = color;
        self
    }

    /// Add the reverse-video attribute (used for focus/selection highlight).
    #[must_use]
    pub const fn reversed(mut self) -> Self {
        self.flags = self.flags.union(StyleFlags::REVERSE);
        self
    }

    /// Add the bold attribute.
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.flags = self.flags.union(StyleFlags::BOLD);
        self
    }

    /// Add the dim attribute.
    #[must_use]
    pub const fn dim(mut self) -> Self {
        self.flags = self.flags.union(StyleFlags::DIM);
        self
    }

    /// Overlay `other` on `self`: non-default colors and all flags of
    /// `other` win.
    #[must_use]
    pub fn patch(mut self, other: Style) -> Self {
        if other.fg != Color::Default {
            self.fg = other.fg;
        }
        if other.bg != Color::Default {
            self.bg = other.bg;
        }
        self.flags |= other.flags;
        self
    }
}

/// One cell of the terminal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The character shown in this cell. Wide characters occupy this cell
    /// plus a blank continuation cell to their right.
    pub ch: char,
    pub style: Style,
}

impl Cell {
    /// A blank cell with the default style.
    pub const EMPTY: Cell = Cell {
        ch: ' ',
        style: Style::new(),
    };

    /// A cell showing `ch` with the default style.
    #[must_use]
    pub const fn from_char(ch: char) -> Self {
        Self {
            ch,
            style: Style::new(),
        }
    }

    /// Attach a style.
    #[must_use]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Whether the cell shows nothing: a space in the default style.
    ///
    /// Transparent overlay compositing skips blank cells.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.ch == ' ' && self.style == Style::new()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}
