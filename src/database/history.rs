use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use super::models::RatingHistoryEntry;

pub fn append_entry(
    conn: &Connection,
    player_id: i64,
    rating: i32,
    recorded_at: NaiveDateTime,
    note: Option<&str>,
) -> Result<RatingHistoryEntry> {
    let sql = "INSERT INTO rating_history (player_id, rating, recorded_at, note) VALUES (?1, ?2, ?3, ?4) RETURNING id, player_id, rating, recorded_at, note";

    conn.query_row(
        sql,
        params![player_id, rating, recorded_at, note],
        parse_entry_row,
    )
    .context("Failed to append rating history entry")
}

pub fn list_by_player(conn: &Connection, player_id: i64) -> Result<Vec<RatingHistoryEntry>> {
    let sql = "SELECT id, player_id, rating, recorded_at, note FROM rating_history WHERE player_id = ?1 ORDER BY recorded_at ASC, id ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![player_id], parse_entry_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn delete_for_player(conn: &Connection, player_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM rating_history WHERE player_id = ?1",
        params![player_id],
    )
    .context("Failed to delete rating history")
    .map(|_| ())
}

fn parse_entry_row(row: &rusqlite::Row) -> rusqlite::Result<RatingHistoryEntry> {
    Ok(RatingHistoryEntry {
        id: row.get(0)?,
        player_id: row.get(1)?,
        rating: row.get(2)?,
        recorded_at: row.get(3)?,
        note: row.get(4)?,
    })
}
