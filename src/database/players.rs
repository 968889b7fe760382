use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Player;

pub fn insert_player(
    conn: &Connection,
    username: &str,
    display_name: &str,
    rating: i32,
    is_admin: bool,
) -> Result<Player> {
    let sql = "INSERT INTO players (username, display_name, rating, is_admin) VALUES (?1, ?2, ?3, ?4) RETURNING id, username, display_name, rating, is_admin, created_at";

    conn.query_row(
        sql,
        params![username, display_name, rating, is_admin],
        parse_player_row,
    )
    .context("Failed to insert new player")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Player>> {
    let sql = "SELECT id, username, display_name, rating, is_admin, created_at FROM players WHERE id = ?1";

    conn.query_row(sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<Player>> {
    let sql = "SELECT id, username, display_name, rating, is_admin, created_at FROM players WHERE username = ?1";

    conn.query_row(sql, params![username], parse_player_row)
        .optional()
        .context("Failed to query player by username")
}

/// Club ranking order: rating descending, then name for stable display.
pub fn list_all(conn: &Connection) -> Result<Vec<Player>> {
    let sql = "SELECT id, username, display_name, rating, is_admin, created_at FROM players ORDER BY rating DESC, display_name ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn update_rating(conn: &Connection, player_id: i64, rating: i32) -> Result<()> {
    conn.execute(
        "UPDATE players SET rating = ?1 WHERE id = ?2",
        params![rating, player_id],
    )
    .context("Failed to update player rating")
    .map(|_| ())
}

pub fn delete_player(conn: &Connection, player_id: i64) -> Result<()> {
    conn.execute("DELETE FROM players WHERE id = ?1", params![player_id])
        .context("Failed to delete player")
        .map(|_| ())
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        username: row.get(1)?,
        display_name: row.get(2)?,
        rating: row.get(3)?,
        is_admin: row.get(4)?,
        created_at: row.get(5)?,
    })
}
