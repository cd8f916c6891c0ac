//! The demonstration game: a handful of screens built from the widget toolkit.
//!
//! [`Game`] owns the player's choices and the configuration. Every screen
//! change goes through [`Game::show`], which stops the widgets of the current
//! screen before building the next one. Widget callbacks only ever hold a
//! `Weak<Game>` so the `Ui` and the game do not keep each other alive.

pub mod hero;
pub mod levels;
mod scenes;

use crate::config::Config;
use crate::core::Ui;
use anyhow::Result;
use crossterm::event::KeyCode;
use std::cell::{Cell, Ref, RefCell};
use std::rc::{Rc, Weak};
use tracing::{debug, error, info, warn};

pub use hero::{Hero, HeroClass, Race};
pub use levels::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    HeroCreate,
    WorldMap,
    Settings,
    OutputDelay,
    Authors,
}

pub struct Game {
    ui: Rc<Ui>,
    config: RefCell<Config>,
    hero: RefCell<Hero>,
    levels: Vec<Level>,
    quit: Cell<bool>,
}

impl Game {
    /// Build the game and register the global Esc (quit) key.
    pub fn new(ui: Rc<Ui>, config: Config) -> Result<Rc<Self>> {
        let levels = levels::load_levels()?;
        let game = Rc::new(Self {
            ui,
            config: RefCell::new(config),
            hero: RefCell::new(Hero::default()),
            levels,
            quit: Cell::new(false),
        });

        let weak = Rc::downgrade(&game);
        game.ui.on_key(KeyCode::Esc, move || {
            if let Some(game) = weak.upgrade() {
                game.request_quit();
            }
        });
        Ok(game)
    }

    pub fn ui(&self) -> &Rc<Ui> {
        &self.ui
    }

    pub fn config(&self) -> Ref<'_, Config> {
        self.config.borrow()
    }

    pub fn hero(&self) -> Ref<'_, Hero> {
        self.hero.borrow()
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn should_quit(&self) -> bool {
        self.quit.get()
    }

    pub fn request_quit(&self) {
        info!("Quit requested");
        self.quit.set(true);
    }

    /// Change settings and write them back when a config file is in use.
    /// The running `Ui` keeps its settings until the next launch.
    pub fn update_config(&self, f: impl FnOnce(&mut Config)) {
        let mut config = self.config.borrow_mut();
        f(&mut config);
        if config.path.is_none() {
            debug!("No config file in use, settings kept in memory");
            return;
        }
        if let Err(e) = config.save() {
            warn!("Failed to save settings: {:#}", e);
        }
    }

    /// Tear down the current screen and build `screen`.
    pub fn show(self: &Rc<Self>, screen: Screen) {
        self.ui.stop_all();
        self.ui.clear();
        info!("Showing {:?}", screen);

        let result = match screen {
            Screen::MainMenu => scenes::main_menu(self),
            Screen::HeroCreate => scenes::hero_create(self),
            Screen::WorldMap => scenes::world_map(self),
            Screen::Settings => scenes::settings(self),
            Screen::OutputDelay => scenes::output_delay(self),
            Screen::Authors => scenes::authors(self),
        };
        if let Err(e) = result {
            error!("Failed to build {:?}: {}", screen, e);
        }
    }

    /// Closure that switches to `screen`, for menu options and callbacks.
    fn goto<T: ?Sized + 'static>(self: &Rc<Self>, screen: Screen) -> impl Fn(&T) + 'static {
        let game = Rc::downgrade(self);
        move |_: &T| {
            if let Some(game) = game.upgrade() {
                game.show(screen);
            }
        }
    }

    fn weak(self: &Rc<Self>) -> Weak<Self> {
        Rc::downgrade(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestUi;

    #[test]
    fn test_escape_requests_quit() {
        let t = TestUi::instant(80, 24);
        let game = Game::new(t.ui.clone(), Config::default()).unwrap();
        game.show(Screen::MainMenu);
        assert!(!game.should_quit());
        t.press(&[KeyCode::Esc]);
        assert!(game.should_quit());
    }

    #[test]
    fn test_update_config_without_file_stays_in_memory() {
        let t = TestUi::instant(80, 24);
        let game = Game::new(t.ui.clone(), Config::default()).unwrap();
        game.update_config(|config| config.ui.animations = false);
        assert!(!game.config().ui.animations);
    }
}
