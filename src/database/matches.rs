use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Match, Player};

const MATCH_COLUMNS: &str = "id, tournament_id, round, white_id, black_id, white_name, black_name, result, white_delta, black_delta, created_at";

pub fn insert_pairing(
    conn: &Connection,
    tournament_id: i64,
    round: i64,
    white: &Player,
    black: &Player,
) -> Result<Match> {
    let sql = format!(
        "INSERT INTO matches (tournament_id, round, white_id, black_id, white_name, black_name) VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            tournament_id,
            round,
            white.id,
            black.id,
            white.display_name,
            black.display_name
        ],
        parse_match_row,
    )
    .context("Failed to insert pairing")
}

/// A bye is stored with no opponent and its automatic 1.0 already applied.
pub fn insert_bye(
    conn: &Connection,
    tournament_id: i64,
    round: i64,
    player: &Player,
    rating_delta: i32,
) -> Result<Match> {
    let sql = format!(
        "INSERT INTO matches (tournament_id, round, white_id, white_name, result, white_delta) VALUES (?1, ?2, ?3, ?4, 1.0, ?5) RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![tournament_id, round, player.id, player.display_name, rating_delta],
        parse_match_row,
    )
    .context("Failed to insert bye")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Match>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_match_row)
        .optional()
        .context("Failed to query match by id")
}

pub fn list_by_tournament(conn: &Connection, tournament_id: i64) -> Result<Vec<Match>> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE tournament_id = ?1 ORDER BY round ASC, id ASC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_by_round(conn: &Connection, tournament_id: i64, round: i64) -> Result<Vec<Match>> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE tournament_id = ?1 AND round = ?2 ORDER BY id ASC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![tournament_id, round], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn record_result(
    conn: &Connection,
    match_id: i64,
    result: f64,
    white_delta: Option<i32>,
    black_delta: Option<i32>,
) -> Result<()> {
    conn.execute(
        "UPDATE matches SET result = ?1, white_delta = ?2, black_delta = ?3 WHERE id = ?4",
        params![result, white_delta, black_delta, match_id],
    )
    .context("Failed to record match result")
    .map(|_| ())
}

/// Detaches a deleted player from their matches. The denormalized names
/// stay behind so standings and reports remain computable.
pub fn detach_player(conn: &Connection, player_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE matches SET white_id = NULL WHERE white_id = ?1",
        params![player_id],
    )
    .context("Failed to detach player from white side")?;
    conn.execute(
        "UPDATE matches SET black_id = NULL WHERE black_id = ?1",
        params![player_id],
    )
    .context("Failed to detach player from black side")
    .map(|_| ())
}

pub fn delete_by_tournament(conn: &Connection, tournament_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM matches WHERE tournament_id = ?1",
        params![tournament_id],
    )
    .context("Failed to delete tournament matches")
    .map(|_| ())
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        round: row.get(2)?,
        white_id: row.get(3)?,
        black_id: row.get(4)?,
        white_name: row.get(5)?,
        black_name: row.get(6)?,
        result: row.get(7)?,
        white_delta: row.get(8)?,
        black_delta: row.get(9)?,
        created_at: row.get(10)?,
    })
}
