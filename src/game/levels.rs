//! Level maps, embedded at compile time.

use anyhow::{Context, Result};
use serde::Deserialize;

const LEVELS_JSON: &str = include_str!("../../defaults/levels.json");

#[derive(Debug, Clone, Deserialize)]
pub struct Level {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// (x, y) of the player's starting cell
    pub spawn: (usize, usize),
    #[serde(default = "default_impassable")]
    pub impassable: Vec<char>,
    pub tiles: Vec<String>,
}

fn default_impassable() -> Vec<char> {
    vec!['*', '#']
}

/// Every level shipped with the game, in id order.
pub fn load_levels() -> Result<Vec<Level>> {
    let mut levels: Vec<Level> =
        serde_json::from_str(LEVELS_JSON).context("Failed to parse embedded levels.json")?;
    levels.sort_by_key(|level| level.id);
    tracing::debug!("Loaded {} levels", levels.len());
    Ok(levels)
}
