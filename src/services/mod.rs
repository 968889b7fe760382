pub mod lifecycle;
pub mod server;

pub use lifecycle::{GeneratedRound, MatchResultEntry, TournamentService};
