//! Tile map with a movable player marker (active).
//!
//! The marker moves one cell per key in the eight compass directions
//! (`q w e / a d / z x c` or the numeric pad digits). Moves into walls or off
//! the grid are ignored.

use super::chrome;
use crate::core::{
    ActiveState, ActiveWidget, Deferred, Handle, Placement, Ui, UiError, Widget, WidgetBounds,
};
use crossterm::event::KeyCode;
use ratatui::style::{Color, Style};
use std::collections::BTreeSet;
use std::rc::Rc;
use tracing::{debug, info, warn};

pub type MapHandle = Handle<MapView>;

pub const PLAYER_GLYPH: char = '@';
pub const DEFAULT_IMPASSABLE: [char; 2] = ['*', '#'];

/// Key bindings: lowercase, uppercase and keypad digit per direction.
const MOVES: [(char, char, (i32, i32)); 8] = [
    ('q', '7', (-1, -1)),
    ('w', '8', (0, -1)),
    ('e', '9', (1, -1)),
    ('a', '4', (-1, 0)),
    ('d', '6', (1, 0)),
    ('z', '1', (-1, 1)),
    ('x', '2', (0, 1)),
    ('c', '3', (1, 1)),
];

fn direction(key: KeyCode) -> Option<(i32, i32)> {
    let KeyCode::Char(c) = key else {
        return None;
    };
    let lower = c.to_ascii_lowercase();
    MOVES
        .iter()
        .find(|(letter, digit, _)| *letter == lower || *digit == c)
        .map(|(_, _, delta)| *delta)
}

/// Snapshot of the map geometry and marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapInfo {
    pub width: usize,
    pub height: usize,
    pub player: (usize, usize),
    pub spawn: (usize, usize),
}

#[derive(Debug, Clone)]
pub struct MapOptions {
    pub placement: Placement,
    pub clear: bool,
    pub impassable: BTreeSet<char>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            placement: Placement::center(),
            clear: true,
            impassable: DEFAULT_IMPASSABLE.into_iter().collect(),
        }
    }
}

impl MapOptions {
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn keep_screen(mut self) -> Self {
        self.clear = false;
        self
    }

    pub fn impassable(mut self, tiles: impl IntoIterator<Item = char>) -> Self {
        self.impassable = tiles.into_iter().collect();
        self
    }
}

pub struct MapView {
    state: ActiveState,
    tiles: Vec<Vec<char>>,
    width: usize,
    player: (usize, usize),
    spawn: (usize, usize),
    impassable: BTreeSet<char>,
}

impl MapView {
    /// Build the viewport. An unusable spawn is moved to the first passable
    /// tile in row-major order.
    pub fn new<S: AsRef<str>>(
        tiles: &[S],
        spawn: (usize, usize),
        options: MapOptions,
    ) -> Result<Self, UiError> {
        let tiles: Vec<Vec<char>> = tiles.iter().map(|row| row.as_ref().chars().collect()).collect();
        let width = tiles.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return Err(UiError::EmptyWidget("map"));
        }

        let bounds = WidgetBounds::new(
            (width + 2).min(u16::MAX as usize) as u16,
            (tiles.len() + 2).min(u16::MAX as usize) as u16,
            options.placement,
        );
        let mut map = Self {
            state: ActiveState::new(bounds, options.clear),
            tiles,
            width,
            player: spawn,
            spawn,
            impassable: options.impassable,
        };

        if !map.can_move_to(spawn.0, spawn.1) {
            let Some(relocated) = map.first_passable() else {
                return Err(UiError::NoPassableTile);
            };
            info!(
                "Spawn ({}, {}) is blocked, player placed at ({}, {})",
                spawn.0, spawn.1, relocated.0, relocated.1
            );
            map.player = relocated;
        }
        Ok(map)
    }

    /// In bounds (rows may be ragged) and not a wall.
    pub fn can_move_to(&self, x: usize, y: usize) -> bool {
        self.tiles
            .get(y)
            .and_then(|row| row.get(x))
            .is_some_and(|tile| !self.impassable.contains(tile))
    }

    fn first_passable(&self) -> Option<(usize, usize)> {
        self.tiles.iter().enumerate().find_map(|(y, row)| {
            (0..row.len())
                .find(|x| self.can_move_to(*x, y))
                .map(|x| (x, y))
        })
    }

    /// Move by a unit delta. Returns false, changing nothing, when the
    /// target is off the grid or impassable.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let target = (
            self.player.0.checked_add_signed(dx as isize),
            self.player.1.checked_add_signed(dy as isize),
        );
        let (Some(x), Some(y)) = target else {
            return false;
        };
        if !self.can_move_to(x, y) {
            return false;
        }
        self.player = (x, y);
        debug!("Player moved to ({}, {})", x, y);
        true
    }

    pub fn player_position(&self) -> (usize, usize) {
        self.player
    }

    pub fn set_player_position(&mut self, x: usize, y: usize) -> bool {
        if self.can_move_to(x, y) {
            self.player = (x, y);
            info!("Player position set to ({}, {})", x, y);
            true
        } else {
            warn!("Cannot move player to ({}, {}): tile not available", x, y);
            false
        }
    }

    pub fn map_info(&self) -> MapInfo {
        MapInfo {
            width: self.width,
            height: self.tiles.len(),
            player: self.player,
            spawn: self.spawn,
        }
    }

    fn tile_style(&self, tile: char, paused: bool) -> Style {
        if paused {
            return Style::default().fg(Color::Blue);
        }
        if self.impassable.contains(&tile) {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::White)
        }
    }
}

impl Widget for MapView {
    fn bounds(&self) -> WidgetBounds {
        self.state.base.bounds
    }

    fn draw(&mut self, ui: &Ui) {
        let (origin, _) = self.state.base.begin_active(ui);
        let paused = !self.state.is_focused();
        let frame = if paused {
            Style::default().fg(Color::Blue)
        } else {
            Style::default().fg(Color::White)
        };

        let bounds = self.state.base.bounds;
        let border = chrome::box_lines(bounds.width as usize, bounds.height as usize);
        for (row, line) in border.iter().enumerate() {
            ui.write(origin.x, origin.y + row as u16, line, frame);
        }

        let mut glyph = [0u8; 4];
        for (y, row) in self.tiles.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                let (text, style) = if (x, y) == self.player {
                    let color = if paused { Color::Blue } else { Color::Yellow };
                    (PLAYER_GLYPH, Style::default().fg(color))
                } else {
                    (*tile, self.tile_style(*tile, paused))
                };
                let cell_x = origin.x + 1 + x as u16;
                let cell_y = origin.y + 1 + y as u16;
                ui.write(cell_x, cell_y, text.encode_utf8(&mut glyph), style);
            }
        }
        ui.flush();
    }
}

impl ActiveWidget for MapView {
    fn state(&self) -> &ActiveState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ActiveState {
        &mut self.state
    }

    fn keys(&self) -> Vec<KeyCode> {
        MOVES
            .iter()
            .flat_map(|(letter, digit, _)| {
                [
                    KeyCode::Char(*letter),
                    KeyCode::Char(letter.to_ascii_uppercase()),
                    KeyCode::Char(*digit),
                ]
            })
            .collect()
    }

    fn on_key(&mut self, key: KeyCode, ui: &Ui) -> Option<Deferred<Self>> {
        let (dx, dy) = direction(key)?;
        if self.try_move(dx, dy) {
            self.draw(ui);
        }
        None
    }

    fn on_stop(&mut self, ui: &Ui) {
        let origin = ui.place(&self.state.base.bounds);
        let blank = " ".repeat(self.state.base.bounds.width as usize);
        for row in 0..self.state.base.bounds.height {
            ui.write(origin.x, origin.y + row, &blank, Style::default());
        }
        ui.flush();
    }
}

impl Ui {
    /// Build the map viewport, attach it and draw it.
    pub fn create_player_map<S: AsRef<str>>(
        self: &Rc<Self>,
        tiles: &[S],
        spawn: (usize, usize),
        options: MapOptions,
    ) -> Result<MapHandle, UiError> {
        self.ensure_surface()?;
        let map = MapView::new(tiles, spawn, options)?;
        Ok(self.attach(map))
    }
}
