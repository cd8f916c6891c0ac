use thiserror::Error;

/// Failures raised while constructing a widget.
///
/// Bad user input is never an error; these only cover configurations that
/// cannot be drawn at all.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UiError {
    #[error("surface has no drawable area ({width}x{height})")]
    EmptySurface { width: u16, height: u16 },

    #[error("{0} has nothing to draw")]
    EmptyWidget(&'static str),

    #[error("map has no passable tile to place the player on")]
    NoPassableTile,
}
