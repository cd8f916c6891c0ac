//! Screen builders. Each one assumes an empty focus ring and a blank surface.

use super::{Game, HeroClass, Race, Screen};
use crate::core::{Offset, Placement, UiError, Widget};
use crate::widgets::{
    MapOptions, MenuHandle, MenuLayout, MenuOption, RowAlign, TableOptions, TableStyle,
    TextBoxHandle, TextBoxLayout, ValueKind,
};
use std::rc::Rc;
use std::time::Duration;
use tracing::{info, warn};

const TITLE: &str = "TERMINALIUM";
const LOGO_FRAME_DELAY: Duration = Duration::from_millis(80);
const NAME_MAX_LENGTH: usize = 10;

fn at(x: i32, y: i32) -> Placement {
    Placement::left().with_x(Offset::set(x)).with_y(Offset::set(y))
}

/// The title spelled out one letter per frame.
pub(super) fn logo_frames() -> Vec<String> {
    let letters: Vec<String> = TITLE.chars().map(String::from).collect();
    (1..=letters.len())
        .map(|shown| letters[..shown].join(" "))
        .collect()
}

pub(super) fn main_menu(game: &Rc<Game>) -> Result<(), UiError> {
    let ui = game.ui();
    ui.audio().play_track("background", true);

    ui.create_animation(
        logo_frames().as_slice(),
        LOGO_FRAME_DELAY,
        Placement::center().with_y(Offset::subtract(8)),
    )?;

    let weak = game.weak();
    let options = vec![
        MenuOption::new("New Game", game.goto::<MenuHandle>(Screen::HeroCreate))
            .with_help("Create a hero:\nname, class and race"),
        MenuOption::new("World Map", game.goto::<MenuHandle>(Screen::WorldMap))
            .with_help("Walk the test level"),
        MenuOption::new("Options", game.goto::<MenuHandle>(Screen::Settings))
            .with_help("Output delay, animations\nand cheats"),
        MenuOption::new("Authors", game.goto::<MenuHandle>(Screen::Authors))
            .with_help("Who made this"),
        MenuOption::new("Exit", move |menu: &MenuHandle| {
            menu.stop();
            if let Some(game) = weak.upgrade() {
                game.request_quit();
            }
        })
        .with_help("Leave the game"),
    ];
    ui.create_menu(
        "Menu",
        options,
        MenuLayout::default()
            .placement(Placement::center().with_x(Offset::subtract(14)).with_y(Offset::add(2)))
            .help_width(26)
            .keep_screen(),
    )?;
    Ok(())
}

fn summary_options(style: TableStyle, heading: RowAlign) -> TableOptions {
    TableOptions::default()
        .width(60)
        .style(style)
        .align(0, heading)
        .placement(Placement::center().with_y(Offset::set(1)))
        .keep_screen()
        .instant()
}

/// Redraw the hero summary at the top of the creation screen.
fn refresh_summary(game: &Game, style: TableStyle) {
    let summary = game.hero().summary();
    let options = summary_options(style, game.config().heading_align());
    if let Err(e) = game.ui().create_table(&[summary], options) {
        warn!("Failed to draw hero summary: {}", e);
    }
}

pub(super) fn hero_create(game: &Rc<Game>) -> Result<(), UiError> {
    let heading = game.config().heading_align();
    let ui = game.ui();
    refresh_summary(game, TableStyle::Info);

    ui.create_table(
        &["Enter a name"],
        TableOptions::default()
            .width(17)
            .align(0, heading)
            .placement(at(2, 5))
            .keep_screen(),
    )?;

    let weak = game.weak();
    ui.create_text_box(
        TextBoxLayout::default().width(17).placement(at(2, 8)).keep_screen(),
        NAME_MAX_LENGTH,
        ValueKind::String,
        move |name: &str, _: &TextBoxHandle| {
            let Some(game) = weak.upgrade() else {
                return;
            };
            if game.hero.borrow_mut().set_name(name) {
                info!("Hero name set to {:?}", name.trim());
            }
            refresh_summary(&game, TableStyle::Info);
        },
    )?;

    let class_options = HeroClass::ALL
        .into_iter()
        .map(|class| {
            let weak = game.weak();
            MenuOption::new(class.name(), move |_: &MenuHandle| {
                if let Some(game) = weak.upgrade() {
                    game.hero.borrow_mut().class = Some(class);
                    refresh_summary(&game, TableStyle::Info);
                }
            })
        })
        .collect();
    ui.create_menu(
        "Class",
        class_options,
        MenuLayout::default().width(16).placement(at(28, 5)).without_help().keep_screen(),
    )?;

    let race_options = Race::ALL
        .into_iter()
        .map(|race| {
            let weak = game.weak();
            MenuOption::new(race.name(), move |_: &MenuHandle| {
                if let Some(game) = weak.upgrade() {
                    game.hero.borrow_mut().race = Some(race);
                    refresh_summary(&game, TableStyle::Info);
                }
            })
            .with_help(race.blurb())
        })
        .collect();
    ui.create_menu(
        "Race",
        race_options,
        MenuLayout::default().width(16).placement(at(28, 14)).help_width(26).keep_screen(),
    )?;

    let weak = game.weak();
    let confirm = vec![
        MenuOption::new("Enter world", move |_: &MenuHandle| {
            let Some(game) = weak.upgrade() else {
                return;
            };
            if game.hero().is_complete() {
                game.show(Screen::WorldMap);
            } else {
                refresh_summary(&game, TableStyle::Error);
            }
        }),
        MenuOption::new("Back", game.goto::<MenuHandle>(Screen::MainMenu)),
    ];
    ui.create_menu(
        "Ready?",
        confirm,
        MenuLayout::default().width(17).placement(at(2, 12)).without_help().keep_screen(),
    )?;
    Ok(())
}

pub(super) fn world_map(game: &Rc<Game>) -> Result<(), UiError> {
    let heading = game.config().heading_align();
    let ui = game.ui();
    let Some(level) = game.levels().first() else {
        warn!("No levels available");
        return Err(UiError::EmptyWidget("map"));
    };
    ui.audio().play_track("forest", true);

    let map = ui.create_player_map(
        level.tiles.as_slice(),
        level.spawn,
        MapOptions::default()
            .impassable(level.impassable.iter().copied())
            .placement(at(1, 0))
            .keep_screen(),
    )?;
    let legend_x = map.widget().bounds().width as i32 + 3;

    let who = game.hero().name.clone().unwrap_or_else(|| "Wanderer".to_string());
    let hero_line = format!("Hero: {}", who);
    ui.create_table(
        &[
            level.name.as_str(),
            level.description.as_str(),
            hero_line.as_str(),
            "Move: q w e / a d / z x c",
            "Numpad: 7 8 9 4 6 1 2 3",
            "Tab: switch focus",
            "Esc: quit",
        ],
        TableOptions::default()
            .width(20)
            .align(0, heading)
            .separator_after(1)
            .placement(at(legend_x, 1))
            .keep_screen(),
    )?;

    ui.create_menu(
        "World",
        vec![MenuOption::new("Main menu", game.goto::<MenuHandle>(Screen::MainMenu))],
        MenuLayout::default().width(18).placement(at(legend_x, 14)).without_help().keep_screen(),
    )?;
    Ok(())
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "On"
    } else {
        "Off"
    }
}

pub(super) fn settings(game: &Rc<Game>) -> Result<(), UiError> {
    let heading = game.config().heading_align();
    let ui = game.ui();
    let (delay_ms, animations, cheats) = {
        let config = game.config();
        (
            config.ui.output_delay_ms,
            config.ui.animations,
            config.game.cheats_enabled,
        )
    };

    ui.create_table(
        &["Changes apply on next launch"],
        TableOptions::default()
            .width(30)
            .align(0, heading)
            .placement(Placement::center().with_y(Offset::add(8)))
            .keep_screen()
            .instant(),
    )?;

    let toggle_animations = game.weak();
    let toggle_cheats = game.weak();
    let options = vec![
        MenuOption::new(
            format!("Output delay: {}ms", delay_ms),
            game.goto::<MenuHandle>(Screen::OutputDelay),
        ),
        MenuOption::new(
            format!("Animations: {}", on_off(animations)),
            move |_: &MenuHandle| {
                if let Some(game) = toggle_animations.upgrade() {
                    game.update_config(|config| config.ui.animations = !animations);
                    game.show(Screen::Settings);
                }
            },
        ),
        MenuOption::new(format!("Cheats: {}", on_off(cheats)), move |_: &MenuHandle| {
            if let Some(game) = toggle_cheats.upgrade() {
                game.update_config(|config| config.game.cheats_enabled = !cheats);
                game.show(Screen::Settings);
            }
        }),
        MenuOption::new("Back", game.goto::<MenuHandle>(Screen::MainMenu)),
    ];
    ui.create_menu(
        "Options",
        options,
        MenuLayout::default().width(24).without_help().keep_screen(),
    )?;
    Ok(())
}

/// Parse a delay typed in seconds, e.g. `0.02`.
pub(super) fn parse_delay_seconds(text: &str) -> Option<u64> {
    let seconds: f64 = text.trim().parse().ok()?;
    (seconds.is_finite() && seconds >= 0.0).then(|| (seconds * 1000.0).round() as u64)
}

pub(super) fn output_delay(game: &Rc<Game>) -> Result<(), UiError> {
    let heading = game.config().heading_align();
    let ui = game.ui();
    ui.create_table(
        &["Output delay", "Seconds per line, e.g. 0.02"],
        TableOptions::default()
            .width(30)
            .align(0, heading)
            .separator_after(0)
            .placement(Placement::center().with_y(Offset::subtract(4)))
            .keep_screen(),
    )?;

    let weak = game.weak();
    ui.create_text_box(
        TextBoxLayout::default()
            .width(10)
            .placement(Placement::center().with_y(Offset::add(1)))
            .keep_screen(),
        5,
        ValueKind::Float,
        move |text: &str, _: &TextBoxHandle| {
            let Some(game) = weak.upgrade() else {
                return;
            };
            match parse_delay_seconds(text) {
                Some(delay_ms) => {
                    info!("Output delay set to {}ms", delay_ms);
                    game.update_config(|config| config.ui.output_delay_ms = delay_ms);
                    game.show(Screen::Settings);
                }
                None => warn!("Ignoring output delay {:?}", text),
            }
        },
    )?;
    Ok(())
}

pub(super) fn authors(game: &Rc<Game>) -> Result<(), UiError> {
    let heading = game.config().heading_align();
    let ui = game.ui();
    ui.create_table(
        &["Authors", "perri?", "fantomm"],
        TableOptions::default()
            .align(0, heading)
            .align(1, heading)
            .align(2, heading)
            .separator_after(0)
            .placement(Placement::center().with_y(Offset::subtract(5)))
            .keep_screen(),
    )?;
    ui.create_menu(
        "Menu",
        vec![MenuOption::new("Back", game.goto::<MenuHandle>(Screen::MainMenu))],
        MenuLayout::default()
            .placement(Placement::center().with_y(Offset::add(3)))
            .without_help()
            .keep_screen(),
    )?;
    Ok(())
}
