//! In-memory character grid backed by a ratatui [`Buffer`].

use super::Surface;
use ratatui::{buffer::Buffer, layout::Rect, style::Style};

/// Headless surface. Also the backing store of the terminal surface.
pub struct BufferSurface {
    buffer: Buffer,
    cursor: Option<(u16, u16)>,
    flushes: usize,
}

impl BufferSurface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::empty(Rect::new(0, 0, width, height)),
            cursor: None,
            flushes: 0,
        }
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Text of one row, one symbol per cell.
    pub fn row_text(&self, y: u16) -> String {
        row_text(&self.buffer, y)
    }

    pub fn rows(&self) -> Vec<String> {
        (0..self.buffer.area.height)
            .map(|y| row_text(&self.buffer, y))
            .collect()
    }
}

impl Surface for BufferSurface {
    fn write(&mut self, x: u16, y: u16, text: &str, style: Style) {
        let area = self.buffer.area;
        if x >= area.width || y >= area.height {
            return;
        }
        let max_width = (area.width - x) as usize;
        self.buffer.set_stringn(x, y, text, max_width, style);
    }

    fn clear(&mut self) {
        self.buffer.reset();
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        (self.buffer.area.width, self.buffer.area.height)
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.buffer = Buffer::empty(Rect::new(0, 0, width, height));
        if let Some((x, y)) = self.cursor {
            if x >= width || y >= height {
                self.cursor = None;
            }
        }
    }

    fn set_cursor(&mut self, cursor: Option<(u16, u16)>) {
        self.cursor = cursor;
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    fn buffer(&self) -> &Buffer {
        &self.buffer
    }
}

/// Read one row of a buffer back as text. Out-of-range rows are empty.
pub fn row_text(buffer: &Buffer, y: u16) -> String {
    if y >= buffer.area.height {
        return String::new();
    }
    (0..buffer.area.width)
        .map(|x| buffer.cell((x, y)).map_or(" ", |cell| cell.symbol()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_write_and_read_back() {
        let mut surface = BufferSurface::new(10, 3);
        surface.write(2, 1, "hello", Style::default());
        assert_eq!(surface.row_text(1), "  hello   ");
        assert_eq!(surface.row_text(0), "          ");
    }

    #[test]
    fn test_write_truncates_at_edges() {
        let mut surface = BufferSurface::new(6, 2);
        surface.write(3, 0, "abcdef", Style::default());
        surface.write(0, 5, "ignored", Style::default());
        surface.write(9, 0, "ignored", Style::default());
        assert_eq!(surface.row_text(0), "   abc");
        assert_eq!(surface.row_text(1), "      ");
    }

    #[test]
    fn test_clear_and_styles() {
        let mut surface = BufferSurface::new(4, 1);
        surface.write(0, 0, "ab", Style::default().fg(Color::Cyan));
        assert_eq!(
            surface.buffer().cell((0, 0)).map(|cell| cell.fg),
            Some(Color::Cyan)
        );

        surface.clear();
        assert_eq!(surface.row_text(0), "    ");
    }

    #[test]
    fn test_resize_drops_offscreen_cursor() {
        let mut surface = BufferSurface::new(10, 10);
        surface.set_cursor(Some((8, 8)));
        surface.resize(5, 5);
        assert_eq!(surface.size(), (5, 5));
        assert_eq!(surface.cursor(), None);
    }
}
