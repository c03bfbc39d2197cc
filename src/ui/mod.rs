//! Screen models drawn by the render layer
//!
//! - `name_entry`: the name prompt shown after the first crash
//! - `game_over`: score, personal best and the global top 10

pub mod game_over;
pub mod name_entry;

pub use game_over::{GameOverView, RankRow, RankTier, RankingsView};
pub use name_entry::NameEntry;
