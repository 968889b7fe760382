use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;

use crate::api::models::{
    CreateTournamentPayload, MatchSide, MatchView, ReportResponse, ResultsPayload, RosterPayload,
    RoundView, StandingRow, TournamentDetail, TournamentListResponse, TournamentSummary,
};
use crate::database;
use crate::database::models::{Match, Tournament};
use crate::errors::TournamentError;
use crate::services::lifecycle::MatchResultEntry;
use crate::tournament::{self, MatchRecord, PlayerSeed, TournamentPhase};

use super::{ApiError, AppState};

pub async fn list_tournaments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TournamentListResponse>, ApiError> {
    let conn = database::get_connection(&state.pool)?;
    let active = database::tournaments::list_by_completion(&conn, false)?;
    let finished = database::tournaments::list_by_completion(&conn, true)?;

    Ok(Json(TournamentListResponse {
        active: summaries(&active)?,
        finished: summaries(&finished)?,
    }))
}

pub async fn create_tournament(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTournamentPayload>,
) -> Result<(StatusCode, Json<TournamentSummary>), ApiError> {
    let tournament = state
        .service
        .create_tournament(&payload.name, payload.total_rounds)?;
    Ok((StatusCode::CREATED, Json(summary(&tournament)?)))
}

pub async fn delete_tournament(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_tournament(tournament_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Standings plus every generated round's pairing table.
pub async fn tournament_detail(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<TournamentDetail>, ApiError> {
    let conn = database::get_connection(&state.pool)?;
    let tournament = database::tournaments::find_by_id(&conn, tournament_id)?
        .ok_or_else(|| TournamentError::not_found(format!("tournament {tournament_id}")))?;
    let roster = database::tournaments::roster(&conn, tournament.id)?;
    let matches = database::matches::list_by_tournament(&conn, tournament.id)?;

    let seeds: Vec<PlayerSeed> = roster
        .iter()
        .map(|p| PlayerSeed {
            id: p.id,
            rating: p.rating,
        })
        .collect();
    let records: Vec<MatchRecord> = matches.iter().map(MatchRecord::from).collect();
    let standings = tournament::rank(&seeds, &records)
        .into_iter()
        .enumerate()
        .filter_map(|(i, (seed, score))| {
            roster.iter().find(|p| p.id == seed.id).map(|p| StandingRow {
                rank: i + 1,
                player_id: p.id,
                display_name: p.display_name.clone(),
                rating: p.rating,
                score,
            })
        })
        .collect();

    let rounds = (1..=tournament.current_round)
        .map(|round| RoundView {
            round,
            matches: matches
                .iter()
                .filter(|m| m.round == round)
                .map(match_view)
                .collect(),
        })
        .collect();

    Ok(Json(TournamentDetail {
        summary: summary(&tournament)?,
        standings,
        rounds,
    }))
}

pub async fn register_player(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<i64>,
    Json(payload): Json<RosterPayload>,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .register_player(tournament_id, payload.player_id, payload.force)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn withdraw_player(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<i64>,
    Json(payload): Json<RosterPayload>,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .withdraw_player(tournament_id, payload.player_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Generates the next round and returns its pairing table.
pub async fn advance_round(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<i64>,
) -> Result<(StatusCode, Json<RoundView>), ApiError> {
    let generated = state.service.advance_round(tournament_id)?;
    Ok((
        StatusCode::CREATED,
        Json(RoundView {
            round: generated.round,
            matches: generated.matches.iter().map(match_view).collect(),
        }),
    ))
}

pub async fn record_results(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<i64>,
    Json(payload): Json<ResultsPayload>,
) -> Result<StatusCode, ApiError> {
    let entries: Vec<MatchResultEntry> = payload
        .results
        .iter()
        .map(|r| MatchResultEntry {
            match_id: r.match_id,
            result: r.result,
        })
        .collect();
    state
        .service
        .record_results(tournament_id, payload.round, &entries)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Crosstable in the exact shape an export renderer consumes.
pub async fn report(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<i64>,
) -> Result<Json<ReportResponse>, ApiError> {
    let conn = database::get_connection(&state.pool)?;
    let tournament = database::tournaments::find_by_id(&conn, tournament_id)?
        .ok_or_else(|| TournamentError::not_found(format!("tournament {tournament_id}")))?;
    let matches = database::matches::list_by_tournament(&conn, tournament.id)?;
    let rows = tournament::crosstable(tournament.total_rounds, &matches);

    Ok(Json(ReportResponse {
        tournament_id: tournament.id,
        name: tournament.name,
        total_rounds: tournament.total_rounds,
        completed: tournament.completed,
        rows,
    }))
}

fn summary(tournament: &Tournament) -> Result<TournamentSummary, TournamentError> {
    let phase = TournamentPhase::of(tournament)?;
    Ok(TournamentSummary {
        id: tournament.id,
        name: tournament.name.clone(),
        total_rounds: tournament.total_rounds,
        current_round: tournament.current_round,
        completed: tournament.completed,
        phase: phase.as_str().to_string(),
    })
}

fn summaries(tournaments: &[Tournament]) -> Result<Vec<TournamentSummary>, TournamentError> {
    tournaments.iter().map(summary).collect()
}

fn match_view(m: &Match) -> MatchView {
    let black = if m.is_bye() {
        None
    } else {
        Some(MatchSide {
            player_id: m.black_id,
            name: m.black_name.clone().unwrap_or_default(),
        })
    };
    MatchView {
        match_id: m.id,
        round: m.round,
        white: MatchSide {
            player_id: m.white_id,
            name: m.white_name.clone(),
        },
        black,
        result: m.result,
        white_delta: m.white_delta,
        black_delta: m.black_delta,
    }
}
