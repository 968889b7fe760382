use serde::{Deserialize, Serialize};

use crate::rating::RatingPoint;
use crate::tournament::PlayerReportRow;

// --- players ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerListItem {
    pub rank: usize,
    pub player_id: i64,
    pub username: String,
    pub display_name: String,
    pub rating: i32,
    pub is_admin: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetail {
    pub player_id: i64,
    pub username: String,
    pub display_name: String,
    pub rating: i32,
    pub is_admin: bool,
    /// Weekly closing ratings, oldest first, for charting.
    pub rating_series: Vec<RatingPoint>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerPayload {
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Deserialize)]
pub struct SetRatingPayload {
    pub rating: i32,
}

// --- tournaments ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSummary {
    pub id: i64,
    pub name: String,
    pub total_rounds: i64,
    pub current_round: i64,
    pub completed: bool,
    pub phase: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentListResponse {
    pub active: Vec<TournamentSummary>,
    pub finished: Vec<TournamentSummary>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTournamentPayload {
    pub name: String,
    pub total_rounds: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterPayload {
    pub player_id: i64,
    /// Administrator-forced roster edit after registration closed.
    #[serde(default)]
    pub force: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub rank: usize,
    pub player_id: i64,
    pub display_name: String,
    pub rating: i32,
    pub score: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSide {
    pub player_id: Option<i64>,
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub match_id: i64,
    pub round: i64,
    pub white: MatchSide,
    /// `None` marks a bye.
    pub black: Option<MatchSide>,
    pub result: Option<f64>,
    pub white_delta: Option<i32>,
    pub black_delta: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundView {
    pub round: i64,
    pub matches: Vec<MatchView>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentDetail {
    #[serde(flatten)]
    pub summary: TournamentSummary,
    pub standings: Vec<StandingRow>,
    pub rounds: Vec<RoundView>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntryPayload {
    pub match_id: i64,
    /// 1.0, 0.5 or 0.0 from the white side.
    pub result: f64,
}

#[derive(Deserialize)]
pub struct ResultsPayload {
    pub round: i64,
    pub results: Vec<ResultEntryPayload>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub tournament_id: i64,
    pub name: String,
    pub total_rounds: i64,
    pub completed: bool,
    pub rows: Vec<PlayerReportRow>,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}
