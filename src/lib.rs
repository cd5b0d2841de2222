pub mod camera;
pub mod cell;
pub mod config;
pub mod events;
pub mod game;
pub mod grid;
pub mod parse_rle;
pub mod pattern;
pub mod record;
pub mod rule_set;
pub mod terminal;

mod parse_util;

/// Signed `(row, column)` component of a pattern, before it is placed on the grid
pub type PatternOffset = i64;
