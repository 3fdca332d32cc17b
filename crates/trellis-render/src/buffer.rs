#![forbid(unsafe_code)]

//! The cell grid.
//!
//! A [`Buffer`] is a dense `width x height` grid of [`Cell`]s. Writes outside
//! the grid are silently dropped, so callers can paint through a clipping
//! rectangle without bounds arithmetic at every call site.

use crate::cell::{Cell, Style};
use trellis_core::geometry::Rect;
use trellis_core::text::char_width;

/// A dense grid of styled cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a blank buffer.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; width as usize * height as usize],
        }
    }

    /// Grid width in columns.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Grid height in rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The full grid as a rectangle at the origin.
    #[inline]
    pub const fn area(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// The cell at `(x, y)`, if inside the grid.
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Write a cell. Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Write a string starting at `(x, y)`, clipped to `clip`.
    ///
    /// Returns the number of columns consumed. Wide characters take two
    /// columns; the continuation column is blanked with the same style. A
    /// wide character that would straddle the clip edge is not drawn.
    pub fn draw_str(&mut self, x: u16, y: u16, s: &str, style: Style, clip: Rect) -> u16 {
        if y < clip.y || y >= clip.bottom() {
            return 0;
        }
        let mut col = x;
        for ch in s.chars() {
            let w = char_width(ch) as u16;
            if w == 0 {
                continue;
            }
            if col < clip.x || col.saturating_add(w) > clip.right() {
                break;
            }
            self.set(col, y, Cell { ch, style });
            if w == 2 {
                self.set(col + 1, y, Cell { ch: ' ', style });
            }
            col += w;
        }
        col - x
    }

    /// Fill a rectangle with a character and style, clipped to the grid.
    pub fn fill(&mut self, rect: Rect, ch: char, style: Style) {
        let Some(rect) = rect.intersection(self.area()) else {
            return;
        };
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.set(x, y, Cell { ch, style });
            }
        }
    }

    /// Apply `style` on top of the existing style of every cell in `rect`.
    pub fn style_region(&mut self, rect: Rect, style: Style) {
        let Some(rect) = rect.intersection(self.area()) else {
            return;
        };
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                if let Some(i) = self.index(x, y) {
                    self.cells[i].style = self.cells[i].style.patch(style);
                }
            }
        }
    }

    /// Copy the cells of `region` from an equally-sized buffer `src`.
    ///
    /// This is the overlay compositing primitive: an overlay paints into a
    /// scratch buffer of the same dimensions and the touched region is
    /// merged back. When `transparent` is true, blank cells of `src` leave
    /// the destination untouched; otherwise every cell is copied.
    pub fn merge_region(&mut self, src: &Buffer, region: Rect, transparent: bool) {
        let Some(region) = region
            .intersection(self.area())
            .and_then(|r| r.intersection(src.area()))
        else {
            return;
        };
        for y in region.y..region.bottom() {
            for x in region.x..region.right() {
                let cell = src.cells[y as usize * src.width as usize + x as usize];
                if transparent && cell.is_blank() {
                    continue;
                }
                self.set(x, y, cell);
            }
        }
    }

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Resize the grid, dropping previous contents.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(width as usize * height as usize, Cell::EMPTY);
    }

    /// Row contents for row `y`, or an empty slice when out of range.
    pub fn row(&self, y: u16) -> &[Cell] {
        if y < self.height {
            let start = y as usize * self.width as usize;
            &self.cells[start..start + self.width as usize]
        } else {
            &[]
        }
    }

    /// Indices of rows that differ from `prev`.
    ///
    /// When the two buffers have different dimensions every row is reported.
    pub fn changed_rows(&self, prev: &Buffer) -> Vec<u16> {
        if self.width != prev.width || self.height != prev.height {
            return (0..self.height).collect();
        }
        (0..self.height)
            .filter(|&y| self.row(y) != prev.row(y))
            .collect()
    }

    /// The characters of row `y` as a string, without styling.
    ///
    /// Intended for tests and debugging.
    pub fn row_text(&self, y: u16) -> String {
        self.row(y).iter().map(|c| c.ch).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Color, StyleFlags};

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut buf = Buffer::new(4, 2);
        buf.set(10, 10, Cell::from_char('x'));
        assert!(buf.get(10, 10).is_none());
        assert_eq!(buf.row_text(0), "    ");
    }

    #[test]
    fn draw_str_clips_to_rect() {
        let mut buf = Buffer::new(10, 2);
        let clip = Rect::new(0, 0, 5, 1);
        let used = buf.draw_str(2, 0, "hello", Style::new(), clip);
        assert_eq!(used, 3);
        assert_eq!(buf.row_text(0), "  hel     ");
    }

    #[test]
    fn draw_str_handles_wide_chars() {
        let mut buf = Buffer::new(6, 1);
        let used = buf.draw_str(0, 0, "日本", Style::new(), Rect::new(0, 0, 6, 1));
        assert_eq!(used, 4);
        assert_eq!(buf.get(0, 0).unwrap().ch, '日');
        assert_eq!(buf.get(1, 0).unwrap().ch, ' ');
        assert_eq!(buf.get(2, 0).unwrap().ch, '本');
    }

    #[test]
    fn wide_char_does_not_straddle_clip_edge() {
        let mut buf = Buffer::new(6, 1);
        let used = buf.draw_str(0, 0, "a日", Style::new(), Rect::new(0, 0, 2, 1));
        assert_eq!(used, 1);
        assert_eq!(buf.row_text(0), "a     ");
    }

    #[test]
    fn merge_region_opaque_overwrites() {
        let mut dst = Buffer::new(4, 1);
        dst.fill(dst.area(), 'x', Style::new());
        let src = Buffer::new(4, 1);
        dst.merge_region(&src, Rect::new(1, 0, 2, 1), false);
        assert_eq!(dst.row_text(0), "x  x");
    }

    #[test]
    fn merge_region_transparent_skips_blanks() {
        let mut dst = Buffer::new(4, 1);
        dst.fill(dst.area(), 'x', Style::new());
        let mut src = Buffer::new(4, 1);
        src.set(2, 0, Cell::from_char('o'));
        dst.merge_region(&src, Rect::new(1, 0, 2, 1), true);
        assert_eq!(dst.row_text(0), "xxox");
    }

    #[test]
    fn style_region_patches_existing() {
        let mut buf = Buffer::new(2, 1);
        buf.set(0, 0, Cell::from_char('a').with_style(Style::new().fg(Color::Red)));
        buf.style_region(buf.area(), Style::new().reversed());
        let cell = buf.get(0, 0).unwrap();
        assert_eq!(cell.style.fg, Color::Red);
        assert!(cell.style.flags.contains(StyleFlags::REVERSE));
    }

    #[test]
    fn changed_rows_reports_differences() {
        let mut a = Buffer::new(3, 3);
        let b = a.clone();
        a.set(1, 1, Cell::from_char('z'));
        assert_eq!(a.changed_rows(&b), vec![1]);
    }

    #[test]
    fn changed_rows_after_resize_reports_all() {
        let a = Buffer::new(3, 2);
        let b = Buffer::new(4, 2);
        assert_eq!(a.changed_rows(&b), vec![0, 1]);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn draw_str_never_escapes_its_clip(x in 0u16..12, s in "\\PC{0,8}") {
                let mut buf = Buffer::new(10, 3);
                let clip = Rect::new(2, 1, 5, 1);
                buf.draw_str(x, 1, &s, Style::new(), clip);
                for cy in 0..3u16 {
                    for cx in 0..10u16 {
                        if !clip.contains(cx, cy) {
                            prop_assert!(buf.get(cx, cy).unwrap().is_blank());
                        }
                    }
                }
            }
        }
    }
}
