use crate::frontend::{BufferSurface, Surface};
use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, buffer::Buffer, style::Style, Terminal};
use std::io;

/// Full-screen terminal surface
///
/// Initializes the terminal in raw mode on the alternate screen. Widgets
/// write into the backing grid; `flush` copies the grid into a ratatui frame.
pub struct TerminalSurface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    grid: BufferSurface,
    restored: bool,
}

impl TerminalSurface {
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let size = terminal.size().context("Failed to read terminal size")?;
        tracing::info!("Terminal size: {}x{}", size.width, size.height);

        Ok(Self {
            terminal,
            grid: BufferSurface::new(size.width, size.height),
            restored: false,
        })
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn write(&mut self, x: u16, y: u16, text: &str, style: Style) {
        self.grid.write(x, y, text, style);
    }

    fn clear(&mut self) {
        self.grid.clear();
    }

    /// The grid keeps its size until `resize` is called from the resize
    /// event, so widgets are redrawn onto the new grid in one pass.
    fn flush(&mut self) -> io::Result<()> {
        let grid = self.grid.buffer();
        let cursor = self.grid.cursor();

        self.terminal.draw(|frame| {
            let area = frame.area();
            let buf = frame.buffer_mut();
            for y in area.top()..area.bottom() {
                for x in area.left()..area.right() {
                    if let (Some(src), Some(dst)) = (grid.cell((x, y)), buf.cell_mut((x, y))) {
                        *dst = src.clone();
                    }
                }
            }
            if let Some(position) = cursor {
                frame.set_cursor_position(position);
            }
        })?;
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        self.grid.size()
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.grid.resize(width, height);
    }

    fn set_cursor(&mut self, cursor: Option<(u16, u16)>) {
        self.grid.set_cursor(cursor);
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        self.grid.cursor()
    }

    fn buffer(&self) -> &Buffer {
        self.grid.buffer()
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        // Ensure terminal is restored even if restore() wasn't called
        let _ = self.restore();
    }
}
