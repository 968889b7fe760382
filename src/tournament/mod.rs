pub mod pairing;
pub mod report;
pub mod standings;
pub mod state;
pub mod types;

pub use pairing::generate_round;
pub use report::{crosstable, PlayerReportRow, RoundCell, Side};
pub use standings::{compute_scores, rank};
pub use state::TournamentPhase;
pub use types::{MatchRecord, Pairing, PlayerId, PlayerSeed, RoundPlan};
