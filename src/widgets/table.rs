//! Bordered text table (passive).
//!
//! Rows longer than the content width are word-wrapped; shorter rows are
//! padded to the width with a per-row alignment. The whole block is laid out
//! up front, then written line by line.

use super::chrome::{Border, ERROR_BORDER, INFO_BORDER};
use crate::core::{Placement, Ui, UiError, Widget, WidgetBase, WidgetBounds};
use ratatui::style::{Color, Style};
use std::collections::BTreeMap;
use tracing::warn;

pub const DEFAULT_TABLE_WIDTH: u16 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableStyle {
    #[default]
    Info,
    Error,
}

impl TableStyle {
    fn border(self) -> Border {
        match self {
            TableStyle::Info => INFO_BORDER,
            TableStyle::Error => ERROR_BORDER,
        }
    }

    fn style(self) -> Style {
        match self {
            TableStyle::Info => Style::default().fg(Color::White),
            TableStyle::Error => Style::default().fg(Color::Red),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl RowAlign {
    /// Parse `l`/`left`, `c`/`center`, `r`/`right`. Anything else is
    /// logged and treated as left.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "l" | "left" => RowAlign::Left,
            "c" | "center" => RowAlign::Center,
            "r" | "right" => RowAlign::Right,
            other => {
                warn!("Invalid row alignment '{}', defaulting to left", other);
                RowAlign::Left
            }
        }
    }

    fn pad(self, text: &str, width: usize) -> String {
        match self {
            RowAlign::Left => format!("{:<width$}", text),
            RowAlign::Center => format!("{:^width$}", text),
            RowAlign::Right => format!("{:>width$}", text),
        }
    }
}

/// How a table is laid out and revealed.
#[derive(Debug, Clone)]
pub struct TableOptions {
    pub style: TableStyle,
    /// Content width in cells, excluding borders
    pub width: u16,
    /// Alignment per row index; unlisted rows are left-aligned
    pub alignments: BTreeMap<usize, RowAlign>,
    /// Row indices followed by a separator line
    pub separators: Vec<usize>,
    pub placement: Placement,
    pub clear: bool,
    /// Reveal line by line with the output delay and a tick per line
    pub animation: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            style: TableStyle::Info,
            width: DEFAULT_TABLE_WIDTH,
            alignments: BTreeMap::new(),
            separators: Vec::new(),
            placement: Placement::center(),
            clear: true,
            animation: true,
        }
    }
}

impl TableOptions {
    pub fn width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    pub fn style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    pub fn align(mut self, row: usize, align: RowAlign) -> Self {
        self.alignments.insert(row, align);
        self
    }

    pub fn separator_after(mut self, row: usize) -> Self {
        self.separators.push(row);
        self
    }

    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn keep_screen(mut self) -> Self {
        self.clear = false;
        self
    }

    pub fn instant(mut self) -> Self {
        self.animation = false;
        self
    }
}

pub struct Table {
    base: WidgetBase,
    lines: Vec<String>,
    style: Style,
    animation: bool,
}

impl Table {
    pub fn new<S: AsRef<str>>(rows: &[S], options: &TableOptions) -> Self {
        let lines = layout_lines(rows, options);
        let width = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let bounds = WidgetBounds::new(
            width.min(u16::MAX as usize) as u16,
            lines.len().min(u16::MAX as usize) as u16,
            options.placement,
        );
        Self {
            base: WidgetBase::new(bounds, options.clear),
            lines,
            style: options.style.style(),
            animation: options.animation,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Widget for Table {
    fn bounds(&self) -> WidgetBounds {
        self.base.bounds
    }

    fn draw(&mut self, ui: &Ui) {
        let origin = self.base.begin_passive(ui);
        for (offset, line) in self.lines.iter().enumerate() {
            ui.write(origin.x, origin.y.saturating_add(offset as u16), line, self.style);
            if self.animation {
                ui.reveal_step();
            }
        }
        if !self.animation {
            ui.flush();
        }
    }
}

/// Full block: top rule, content rows with separators, bottom rule.
pub fn layout_lines<S: AsRef<str>>(rows: &[S], options: &TableOptions) -> Vec<String> {
    let border = options.style.border();
    let width = options.width as usize;

    let mut lines = vec![border.top_rule(width)];
    for (index, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.chars().count() > width {
            for part in wrap_words(row, width) {
                lines.push(border.row(&RowAlign::Left.pad(&part, width)));
            }
        } else {
            let align = options.alignments.get(&index).copied().unwrap_or_default();
            lines.push(border.row(&align.pad(row, width)));
        }
        if options.separators.contains(&index) {
            lines.push(border.separator(width));
        }
    }
    lines.push(border.bottom_rule(width));
    lines
}

/// Greedy word wrap. A word longer than `width` gets a line of its own and
/// is left intact.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

impl Ui {
    /// Lay out and draw a table immediately.
    pub fn create_table<S: AsRef<str>>(
        &self,
        rows: &[S],
        options: TableOptions,
    ) -> Result<Table, UiError> {
        self.ensure_surface()?;
        let mut table = Table::new(rows, &options);
        table.draw(self);
        Ok(table)
    }
}
