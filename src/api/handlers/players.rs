use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;

use crate::api::models::{CreatePlayerPayload, PlayerDetail, PlayerListItem};
use crate::database;
use crate::errors::TournamentError;
use crate::rating;

use super::{ApiError, AppState};

/// Club ranking: every player, rating descending.
pub async fn list_players(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PlayerListItem>>, ApiError> {
    let conn = database::get_connection(&state.pool)?;
    let players = database::players::list_all(&conn)?;

    let items = players
        .into_iter()
        .enumerate()
        .map(|(i, p)| PlayerListItem {
            rank: i + 1,
            player_id: p.id,
            username: p.username,
            display_name: p.display_name,
            rating: p.rating,
            is_admin: p.is_admin,
        })
        .collect();
    Ok(Json(items))
}

pub async fn create_player(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePlayerPayload>,
) -> Result<(StatusCode, Json<PlayerListItem>), ApiError> {
    let player =
        state
            .service
            .create_player(&payload.username, &payload.display_name, payload.is_admin)?;

    Ok((
        StatusCode::CREATED,
        Json(PlayerListItem {
            rank: 0,
            player_id: player.id,
            username: player.username,
            display_name: player.display_name,
            rating: player.rating,
            is_admin: player.is_admin,
        }),
    ))
}

/// Player profile with the weekly rating series used by the chart.
pub async fn player_detail(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
) -> Result<Json<PlayerDetail>, ApiError> {
    let conn = database::get_connection(&state.pool)?;
    let player = database::players::find_by_id(&conn, player_id)?
        .ok_or_else(|| TournamentError::not_found(format!("player {player_id}")))?;
    let history = database::history::list_by_player(&conn, player.id)?;
    let rating_series = rating::player_series(&player, &history);

    Ok(Json(PlayerDetail {
        player_id: player.id,
        username: player.username,
        display_name: player.display_name,
        rating: player.rating,
        is_admin: player.is_admin,
        rating_series,
    }))
}
