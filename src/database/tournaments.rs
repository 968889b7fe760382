use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Player, Tournament};

pub fn insert_tournament(conn: &Connection, name: &str, total_rounds: i64) -> Result<Tournament> {
    let sql = "INSERT INTO tournaments (name, total_rounds) VALUES (?1, ?2) RETURNING id, name, total_rounds, current_round, completed, created_at";

    conn.query_row(sql, params![name, total_rounds], parse_tournament_row)
        .context("Failed to insert new tournament")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Tournament>> {
    let sql = "SELECT id, name, total_rounds, current_round, completed, created_at FROM tournaments WHERE id = ?1";

    conn.query_row(sql, params![id], parse_tournament_row)
        .optional()
        .context("Failed to query tournament by id")
}

pub fn list_by_completion(conn: &Connection, completed: bool) -> Result<Vec<Tournament>> {
    let sql = "SELECT id, name, total_rounds, current_round, completed, created_at FROM tournaments WHERE completed = ?1 ORDER BY created_at DESC, id DESC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![completed], parse_tournament_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn set_current_round(conn: &Connection, id: i64, round: i64) -> Result<()> {
    conn.execute(
        "UPDATE tournaments SET current_round = ?1 WHERE id = ?2",
        params![round, id],
    )
    .context("Failed to update current round")
    .map(|_| ())
}

pub fn set_completed(conn: &Connection, id: i64) -> Result<()> {
    conn.execute(
        "UPDATE tournaments SET completed = 1 WHERE id = ?1",
        params![id],
    )
    .context("Failed to mark tournament completed")
    .map(|_| ())
}

pub fn delete_tournament(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM tournaments WHERE id = ?1", params![id])
        .context("Failed to delete tournament")
        .map(|_| ())
}

/// Roster in registration order, which keeps pairing input deterministic.
pub fn roster(conn: &Connection, tournament_id: i64) -> Result<Vec<Player>> {
    let sql = "SELECT p.id, p.username, p.display_name, p.rating, p.is_admin, p.created_at FROM tournament_players tp JOIN players p ON p.id = tp.player_id WHERE tp.tournament_id = ?1 ORDER BY tp.rowid ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![tournament_id], |row| {
            Ok(Player {
                id: row.get(0)?,
                username: row.get(1)?,
                display_name: row.get(2)?,
                rating: row.get(3)?,
                is_admin: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn is_registered(conn: &Connection, tournament_id: i64, player_id: i64) -> Result<bool> {
    let sql = "SELECT COUNT(*) FROM tournament_players WHERE tournament_id = ?1 AND player_id = ?2";

    let count: i64 = conn
        .query_row(sql, params![tournament_id, player_id], |row| row.get(0))
        .context("Failed to check roster membership")?;
    Ok(count > 0)
}

pub fn add_to_roster(conn: &Connection, tournament_id: i64, player_id: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO tournament_players (tournament_id, player_id) VALUES (?1, ?2)",
        params![tournament_id, player_id],
    )
    .context("Failed to add player to roster")
    .map(|_| ())
}

pub fn remove_from_roster(conn: &Connection, tournament_id: i64, player_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM tournament_players WHERE tournament_id = ?1 AND player_id = ?2",
        params![tournament_id, player_id],
    )
    .context("Failed to remove player from roster")
    .map(|_| ())
}

pub fn remove_from_all_rosters(conn: &Connection, player_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM tournament_players WHERE player_id = ?1",
        params![player_id],
    )
    .context("Failed to remove player from rosters")
    .map(|_| ())
}

pub fn clear_roster(conn: &Connection, tournament_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM tournament_players WHERE tournament_id = ?1",
        params![tournament_id],
    )
    .context("Failed to clear tournament roster")
    .map(|_| ())
}

fn parse_tournament_row(row: &rusqlite::Row) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        total_rounds: row.get(2)?,
        current_round: row.get(3)?,
        completed: row.get(4)?,
        created_at: row.get(5)?,
    })
}
