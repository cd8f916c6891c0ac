//! Selectable option list (active).
//!
//! Up/Down move the highlight, any confirm key runs the highlighted option's
//! handler. The menu never closes itself: handlers decide whether to stop it,
//! swap scenes or leave it open.

use super::chrome::{self, INFO_BORDER};
use crate::core::keys::{self, CONFIRM_KEYS};
use crate::core::{
    ActiveState, ActiveWidget, Deferred, Handle, Placement, Ui, UiError, Widget, WidgetBounds,
};
use crossterm::event::KeyCode;
use ratatui::style::{Color, Style};
use std::rc::Rc;
use tracing::debug;

pub type MenuHandle = Handle<Menu>;

/// Called with the menu's handle when its option is confirmed.
pub type MenuHandler = Rc<dyn Fn(&MenuHandle)>;

pub struct MenuOption {
    pub label: String,
    pub handler: MenuHandler,
    /// Shown in the side panel while this option is highlighted
    pub help: String,
}

impl MenuOption {
    pub fn new<F>(label: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&MenuHandle) + 'static,
    {
        Self {
            label: label.into(),
            handler: Rc::new(handler),
            help: String::new(),
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct MenuLayout {
    /// Content width, excluding borders
    pub width: u16,
    pub placement: Placement,
    pub clear: bool,
    /// Width of the help panel; `None` hides it
    pub help_width: Option<u16>,
}

impl Default for MenuLayout {
    fn default() -> Self {
        Self {
            width: 22,
            placement: Placement::center(),
            clear: true,
            help_width: Some(50),
        }
    }
}

impl MenuLayout {
    pub fn width(mut self, width: u16) -> Self {
        self.width = width.max(2);
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

    pub fn help_width(mut self, width: u16) -> Self {
        self.help_width = Some(width.max(3));
        self
    }

    pub fn without_help(mut self) -> Self {
        self.help_width = None;
        self
    }
}

/// Gap between the menu and its help panel
const HELP_GAP: u16 = 3;

pub struct Menu {
    state: ActiveState,
    title: String,
    options: Vec<MenuOption>,
    selected: usize,
    width: usize,
    help_width: Option<u16>,
    highlight: Color,
}

impl Menu {
    pub fn new(
        title: impl Into<String>,
        options: Vec<MenuOption>,
        layout: MenuLayout,
        highlight: Color,
    ) -> Result<Self, UiError> {
        if options.is_empty() {
            return Err(UiError::EmptyWidget("menu"));
        }
        let width = layout.width as usize;
        let bounds = WidgetBounds::new(
            INFO_BORDER.outer_width(width) as u16,
            options.len() as u16 + 4,
            layout.placement,
        );
        Ok(Self {
            state: ActiveState::new(bounds, layout.clear),
            title: title.into(),
            options,
            selected: 0,
            width,
            help_width: layout.help_width,
            highlight,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_label(&self) -> &str {
        &self.options[self.selected].label
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn select(&mut self, index: usize) {
        if index < self.options.len() {
            self.selected = index;
        }
    }

    fn move_selection(&mut self, up: bool) {
        let count = self.options.len();
        self.selected = if up {
            (self.selected + count - 1) % count
        } else {
            (self.selected + 1) % count
        };
        debug!("Menu '{}' selected {}", self.title, self.selected);
    }

    fn option_text(&self, index: usize, focused: bool) -> String {
        let marker = if focused && index == self.selected { ">" } else { " " };
        let label: String = self.options[index]
            .label
            .chars()
            .take(self.width.saturating_sub(2))
            .collect();
        format!("{} {:<w$}", marker, label, w = self.width.saturating_sub(2))
    }

    fn draw_help(&self, ui: &Ui, x: u16, y: u16, style: Style) {
        let Some(width) = self.help_width else {
            return;
        };
        if self.options.iter().all(|option| option.help.is_empty()) {
            return;
        }
        let height = self.options.len() + 4;
        for (row, line) in chrome::box_lines(width as usize, height).iter().enumerate() {
            ui.write(x, y + row as u16, line, style);
        }
        let inner = (width as usize).saturating_sub(2);
        let help = &self.options[self.selected].help;
        for (row, line) in help.lines().take(height.saturating_sub(2)).enumerate() {
            let line: String = line.chars().take(inner).collect();
            ui.write(x + 1, y + 1 + row as u16, &line, style);
        }
    }
}

impl Widget for Menu {
    fn bounds(&self) -> WidgetBounds {
        self.state.base.bounds
    }

    fn draw(&mut self, ui: &Ui) {
        let (origin, first) = self.state.base.begin_active(ui);
        let reveal = first && ui.config().animations;
        let focused = self.state.is_focused();
        let frame = if focused { chrome::normal() } else { chrome::dimmed() };
        let selected = if focused {
            Style::default().fg(self.highlight)
        } else {
            frame
        };

        let outer = INFO_BORDER.outer_width(self.width) as u16;
        self.draw_help(ui, origin.x + outer + HELP_GAP, origin.y, frame);

        let (x, mut y) = (origin.x, origin.y);
        let emit = |ui: &Ui| {
            if reveal {
                ui.reveal_step();
            }
        };

        ui.write(x, y, &INFO_BORDER.top_rule(self.width), frame);
        emit(ui);
        y += 1;
        let title = format!("{:^w$}", self.title, w = self.width);
        ui.write(x, y, &INFO_BORDER.row(&title), frame);
        emit(ui);
        y += 1;
        ui.write(x, y, &INFO_BORDER.separator(self.width), frame);
        emit(ui);

        let content_x = x + INFO_BORDER.edge.len() as u16 + 1;
        for index in 0..self.options.len() {
            y += 1;
            let text = self.option_text(index, focused);
            let style = if focused && index == self.selected {
                selected
            } else {
                frame
            };
            ui.write(x, y, &INFO_BORDER.row(&" ".repeat(self.width)), frame);
            ui.write(content_x, y, &text, style);
            emit(ui);
        }

        y += 1;
        ui.write(x, y, &INFO_BORDER.bottom_rule(self.width), frame);
        emit(ui);

        if !reveal {
            ui.flush();
        }
    }
}

impl ActiveWidget for Menu {
    fn state(&self) -> &ActiveState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ActiveState {
        &mut self.state
    }

    fn keys(&self) -> Vec<KeyCode> {
        let mut keys = vec![KeyCode::Up, KeyCode::Down];
        keys.extend(CONFIRM_KEYS);
        keys
    }

    fn on_key(&mut self, key: KeyCode, ui: &Ui) -> Option<Deferred<Self>> {
        match key {
            KeyCode::Up | KeyCode::Down => {
                self.move_selection(key == KeyCode::Up);
                ui.tick();
                self.draw(ui);
                None
            }
            key if keys::is_confirm(key) => {
                let option = &self.options[self.selected];
                debug!("Menu '{}' confirmed '{}'", self.title, option.label);
                let handler = Rc::clone(&option.handler);
                Some(Box::new(move |menu: &MenuHandle| {
                    handler(menu);
                    menu.ui().tick();
                    menu.redraw();
                }))
            }
            _ => None,
        }
    }
}

impl Ui {
    /// Build a menu, attach it and draw it. It takes focus only when no
    /// other active widget is on screen.
    pub fn create_menu(
        self: &Rc<Self>,
        title: impl Into<String>,
        options: Vec<MenuOption>,
        layout: MenuLayout,
    ) -> Result<MenuHandle, UiError> {
        self.ensure_surface()?;
        let menu = Menu::new(title, options, layout, self.config().menu_color)?;
        Ok(self.attach(menu))
    }
}
