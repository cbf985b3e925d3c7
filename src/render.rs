//! Render surface contract and the in-memory glyph frame the game draws into.
//!
//! The game never talks to Bevy directly when drawing. It redraws the whole
//! panel into a [`RenderSurface`] after every completed action; the display
//! plugin mirrors the resulting [`GlyphFrame`] onto the screen.

use std::collections::VecDeque;

use bevy::color::Color;

use crate::components::Cell;

pub const DEFAULT_FOREGROUND: Color = Color::WHITE;
pub const DEFAULT_BACKGROUND: Color = Color::BLACK;

// ---------------------------------------------------------------------------
// Glyph
// ---------------------------------------------------------------------------

/// Visual identity of a tile or actor: a character and its colours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub foreground: Color,
    pub background: Color,
}

impl Glyph {
    pub fn new(ch: char) -> Self {
        Glyph {
            ch,
            foreground: DEFAULT_FOREGROUND,
            background: DEFAULT_BACKGROUND,
        }
    }

    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = color;
        self
    }
}

impl Default for Glyph {
    fn default() -> Self {
        Glyph::new(' ')
    }
}

// ---------------------------------------------------------------------------
// Render surface
// ---------------------------------------------------------------------------

/// Character-cell drawing target.
pub trait RenderSurface {
    fn clear(&mut self);

    fn draw_cell(&mut self, position: Cell, ch: char, foreground: Color, background: Color);

    /// Draw `text` left to right from `position`, cut off after `max_width` characters.
    fn draw_text(&mut self, position: Cell, text: &str, max_width: usize);

    fn draw_glyph(&mut self, position: Cell, glyph: Glyph) {
        self.draw_cell(position, glyph.ch, glyph.foreground, glyph.background);
    }
}

/// Fixed-size character grid. Writes outside the grid are dropped.
#[derive(Debug, Clone)]
pub struct GlyphFrame {
    width: usize,
    height: usize,
    cells: Vec<Glyph>,
}

impl GlyphFrame {
    pub fn new(width: usize, height: usize) -> Self {
        GlyphFrame {
            width,
            height,
            cells: vec![Glyph::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, column: usize, row: usize) -> Option<Glyph> {
        if column >= self.width || row >= self.height {
            return None;
        }
        Some(self.cells[row * self.width + column])
    }

    /// The characters of one row, trailing blanks trimmed.
    pub fn row_text(&self, row: usize) -> String {
        if row >= self.height {
            return String::new();
        }
        let start = row * self.width;
        let line: String = self.cells[start..start + self.width]
            .iter()
            .map(|g| g.ch)
            .collect();
        line.trim_end().to_string()
    }

    fn index(&self, position: Cell) -> Option<usize> {
        if position.x < 0 || position.y < 0 {
            return None;
        }
        let (x, y) = (position.x as usize, position.y as usize);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

impl RenderSurface for GlyphFrame {
    fn clear(&mut self) {
        self.cells.fill(Glyph::default());
    }

    fn draw_cell(&mut self, position: Cell, ch: char, foreground: Color, background: Color) {
        if let Some(i) = self.index(position) {
            self.cells[i] = Glyph {
                ch,
                foreground,
                background,
            };
        }
    }

    fn draw_text(&mut self, position: Cell, text: &str, max_width: usize) {
        for (offset, ch) in text.chars().take(max_width).enumerate() {
            let at = Cell::new(position.x + offset as i32, position.y);
            self.draw_cell(at, ch, DEFAULT_FOREGROUND, DEFAULT_BACKGROUND);
        }
    }
}

// ---------------------------------------------------------------------------
// Message log
// ---------------------------------------------------------------------------

/// Narrative lines shown under the status line, newest first.
#[derive(Debug, Clone)]
pub struct MessageLog {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl MessageLog {
    pub fn new(max_lines: usize) -> Self {
        MessageLog {
            lines: VecDeque::with_capacity(max_lines + 1),
            max_lines,
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn append(&mut self, text: impl Into<String>) {
        self.lines.push_front(text.into());
        self.lines.truncate(self.max_lines);
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn newest(&self) -> Option<&str> {
        self.lines.front().map(String::as_str)
    }

    pub fn draw(&self, surface: &mut impl RenderSurface, origin: Cell, max_width: usize) {
        for (row, line) in self.lines().enumerate() {
            surface.draw_text(Cell::new(origin.x, origin.y + row as i32), line, max_width);
        }
    }
}

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

/// Columns taken by [`status_line`] while the counters fit their padding.
pub const STATUS_LINE_WIDTH: usize = 47;

pub fn status_line(turns: u64, prizes: u32, boxes_searched: u32, max_boxes: u32) -> String {
    format!(
        "turns: {turns:<6} pineapples: {prizes:<6} boxes: {boxes_searched:>2} / {max_boxes:>2}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_outside_frame_is_dropped() {
        let mut frame = GlyphFrame::new(3, 2);
        frame.draw_glyph(Cell::new(5, 0), Glyph::new('@'));
        frame.draw_glyph(Cell::new(-1, 1), Glyph::new('@'));
        frame.draw_glyph(Cell::new(2, 1), Glyph::new('@'));
        assert_eq!(frame.row_text(0), "");
        assert_eq!(frame.row_text(1), "  @");
    }

    #[test]
    fn text_is_cut_at_max_width() {
        let mut frame = GlyphFrame::new(10, 1);
        frame.draw_text(Cell::new(1, 0), "pineapple", 4);
        assert_eq!(frame.row_text(0), " pine");
    }

    #[test]
    fn clear_blanks_every_cell() {
        let mut frame = GlyphFrame::new(2, 2);
        frame.draw_text(Cell::new(0, 0), "ab", 2);
        frame.clear();
        assert_eq!(frame.get(0, 0), Some(Glyph::default()));
        assert_eq!(frame.get(2, 0), None);
    }

    #[test]
    fn message_log_keeps_newest_first_and_caps() {
        let mut log = MessageLog::new(2);
        log.append("one");
        log.append("two");
        log.append("three");
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines, vec!["three", "two"]);
        assert_eq!(log.newest(), Some("three"));
    }

    #[test]
    fn status_line_padding() {
        assert_eq!(
            status_line(12, 1, 3, 10),
            "turns: 12     pineapples: 1      boxes:  3 / 10"
        );
        assert_eq!(status_line(0, 0, 0, 0).len(), STATUS_LINE_WIDTH);
    }
}
