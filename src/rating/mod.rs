pub mod elo;
pub mod history;

pub use elo::{expected_score, update};
pub use history::{player_series, weekly_series, RatingPoint};
