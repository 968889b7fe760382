use chrono::NaiveDateTime;

#[derive(Debug, Clone)]
pub struct Player {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub rating: i32,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
}

/// Append-only rating timeline. One entry at account creation, one per
/// rated match or bye outcome.
#[derive(Debug, Clone)]
pub struct RatingHistoryEntry {
    pub id: i64,
    pub player_id: i64,
    pub rating: i32,
    pub recorded_at: NaiveDateTime,
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Tournament {
    pub id: i64,
    pub name: String,
    pub total_rounds: i64,
    pub current_round: i64,
    pub completed: bool,
    pub created_at: NaiveDateTime,
}

/// One board of one round. `black_name` is `None` exactly for a bye; the
/// id columns go `NULL` when a player account is deleted while the
/// denormalized names keep the row printable. `result` is from the white
/// side's perspective and flips from `NULL` to its terminal value exactly
/// once, together with the rating deltas.
#[derive(Debug, Clone)]
pub struct Match {
    pub id: i64,
    pub tournament_id: i64,
    pub round: i64,
    pub white_id: Option<i64>,
    pub black_id: Option<i64>,
    pub white_name: String,
    pub black_name: Option<String>,
    pub result: Option<f64>,
    pub white_delta: Option<i32>,
    pub black_delta: Option<i32>,
    pub created_at: NaiveDateTime,
}

impl Match {
    pub fn is_bye(&self) -> bool {
        self.black_name.is_none()
    }
}
