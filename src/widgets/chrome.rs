//! Border glyph sets shared by the boxed widgets.

use ratatui::style::{Color, Style};

/// Glyphs of a framed block with `inner` content columns.
///
/// Content rows are `edge + ' ' + content + ' ' + edge`; the rules span the
/// content plus its two padding columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    pub corner_left: &'static str,
    pub corner_right: &'static str,
    pub top: char,
    pub bottom: char,
    pub edge: &'static str,
    pub divider: char,
}

pub const INFO_BORDER: Border = Border {
    corner_left: "Xx",
    corner_right: "xX",
    top: '_',
    bottom: '¯',
    edge: "||",
    divider: '-',
};

pub const ERROR_BORDER: Border = Border {
    corner_left: ">>>",
    corner_right: "<<<",
    top: '═',
    bottom: '═',
    edge: "!!!",
    divider: '-',
};

impl Border {
    pub fn top_rule(&self, inner: usize) -> String {
        rule(self.corner_left, self.top, self.corner_right, inner + 2)
    }

    pub fn bottom_rule(&self, inner: usize) -> String {
        rule(self.corner_left, self.bottom, self.corner_right, inner + 2)
    }

    pub fn separator(&self, inner: usize) -> String {
        rule(self.edge, self.divider, self.edge, inner + 2)
    }

    pub fn row(&self, content: &str) -> String {
        format!("{} {} {}", self.edge, content, self.edge)
    }

    /// Total width of a block with `inner` content columns.
    pub fn outer_width(&self, inner: usize) -> usize {
        inner + 2 + 2 * self.edge.chars().count()
    }
}

fn rule(left: &str, fill: char, right: &str, count: usize) -> String {
    let mut line = String::with_capacity(left.len() + right.len() + count * fill.len_utf8());
    line.push_str(left);
    line.extend(std::iter::repeat(fill).take(count));
    line.push_str(right);
    line
}

/// Plain box-drawing frame used around the help panel and the map.
pub fn box_lines(width: usize, height: usize) -> Vec<String> {
    if width < 2 || height < 2 {
        return Vec::new();
    }
    let inner = width - 2;
    let mut lines = Vec::with_capacity(height);
    lines.push(rule("┌", '─', "┐", inner));
    for _ in 0..height - 2 {
        lines.push(format!("│{}│", " ".repeat(inner)));
    }
    lines.push(rule("└", '─', "┘", inner));
    lines
}

/// Style of unfocused widgets.
pub fn dimmed() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn normal() -> Style {
    Style::default().fg(Color::White)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_rules() {
        assert_eq!(INFO_BORDER.top_rule(3), "Xx_____xX");
        assert_eq!(INFO_BORDER.bottom_rule(3), "Xx¯¯¯¯¯xX");
        assert_eq!(INFO_BORDER.separator(3), "||-----||");
        assert_eq!(INFO_BORDER.row("abc"), "|| abc ||");
        assert_eq!(INFO_BORDER.outer_width(3), 9);
    }

    #[test]
    fn test_error_rules_are_wider() {
        assert_eq!(ERROR_BORDER.top_rule(2), ">>>════<<<");
        assert_eq!(ERROR_BORDER.row("ab"), "!!! ab !!!");
        assert_eq!(ERROR_BORDER.outer_width(2), 10);
        assert_eq!(ERROR_BORDER.top_rule(2).chars().count(), 10);
    }

    #[test]
    fn test_box_lines() {
        assert_eq!(box_lines(4, 3), vec!["┌──┐", "│  │", "└──┘"]);
        assert!(box_lines(1, 5).is_empty());
    }
}
