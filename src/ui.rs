//! Drawing surface handed to the painter.
//!
//! Element boxes come from document geometry and routinely reach past the
//! terminal (a dropdown opened on the last row, a dialog taller than the
//! viewport, text scrolled above its container). `ratatui::Buffer` panics on
//! out-of-range writes, so every call here intersects with the frame first.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

/// Columns of one text row that survive clipping: the chars to skip on the
/// left, the first visible column and how many columns remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    skip: usize,
    x: u16,
    width: u16,
}

fn visible_span(bounds: Rect, x: u16, y: u16) -> Option<Span> {
    if bounds.is_empty() || y < bounds.top() || y >= bounds.bottom() || x >= bounds.right() {
        return None;
    }
    let start = x.max(bounds.left());
    Some(Span {
        skip: usize::from(start - x),
        x: start,
        width: bounds.right() - start,
    })
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        Self {
            area,
            buffer: frame.buffer_mut(),
        }
    }

    /// Paint into a bare buffer, e.g. off screen in tests.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip(&self, rect: Rect) -> Option<Rect> {
        Some(rect.intersection(self.area)).filter(|r| !r.is_empty())
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        if let Some(area) = self.clip(area) {
            widget.render(area, self.buffer);
        }
    }

    /// Write one row of `text` starting at column `x`. Characters left of
    /// `bounds` are dropped, the rest is cut at its right edge.
    pub fn set_string(&mut self, bounds: Rect, x: u16, y: u16, text: &str, style: Style) {
        let Some(bounds) = self.clip(bounds) else {
            return;
        };
        let Some(span) = visible_span(bounds, x, y) else {
            return;
        };
        let visible: String = text
            .chars()
            .skip(span.skip)
            .take(usize::from(span.width))
            .collect();
        if !visible.is_empty() {
            self.buffer.set_string(span.x, y, visible, style);
        }
    }

    /// Repeat `symbol` over every cell of `area`.
    pub fn fill(&mut self, area: Rect, symbol: &str, style: Style) {
        let Some(area) = self.clip(area) else {
            return;
        };
        for position in area.positions() {
            if let Some(cell) = self.buffer.cell_mut(position) {
                cell.set_symbol(symbol).set_style(style);
            }
        }
    }

    /// Restyle `area` keeping its symbols.
    pub fn set_style(&mut self, area: Rect, style: Style) {
        if let Some(area) = self.clip(area) {
            self.buffer.set_style(area, style);
        }
    }
}
