use std::collections::BTreeMap;

use serde::Serialize;

use crate::database::models::Match;

use super::types::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
    Bye,
}

/// One scored round from a participant's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundCell {
    pub result: f64,
    pub side: Side,
    pub rating_delta: i32,
}

/// One crosstable line. `cells[r - 1]` is round `r`; `None` until the round
/// is played. `player_id` is `None` once the account was deleted — the
/// denormalized name keeps the line printable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerReportRow {
    pub player_id: Option<PlayerId>,
    pub name: String,
    pub cells: Vec<Option<RoundCell>>,
    pub total_score: f64,
    pub rating_delta: i32,
}

/// Round-by-round report over a tournament's full match ledger, the data
/// shape an export renderer consumes. Participants who withdrew or whose
/// account was deleted keep their line and their points. Sorted by total
/// score descending, name as the tie-break.
pub fn crosstable(total_rounds: i64, matches: &[Match]) -> Vec<PlayerReportRow> {
    let rounds = usize::try_from(total_rounds.max(0)).unwrap_or(0);
    let mut rows: BTreeMap<RowKey, PlayerReportRow> = BTreeMap::new();

    for m in matches {
        let Ok(index) = usize::try_from(m.round - 1) else {
            continue;
        };
        if index >= rounds {
            continue;
        }

        if m.is_bye() {
            if m.result == Some(1.0) {
                let row = row_entry(&mut rows, rounds, m.white_id, &m.white_name);
                row.total_score += 1.0;
                row.rating_delta += m.white_delta.unwrap_or(0);
                row.cells[index] = Some(RoundCell {
                    result: 1.0,
                    side: Side::Bye,
                    rating_delta: m.white_delta.unwrap_or(0),
                });
            }
            continue;
        }

        let Some(result) = m.result else { continue };
        let black_name = m.black_name.as_deref().unwrap_or("");

        let white = row_entry(&mut rows, rounds, m.white_id, &m.white_name);
        white.total_score += result;
        white.rating_delta += m.white_delta.unwrap_or(0);
        white.cells[index] = Some(RoundCell {
            result,
            side: Side::White,
            rating_delta: m.white_delta.unwrap_or(0),
        });

        let black = row_entry(&mut rows, rounds, m.black_id, black_name);
        black.total_score += 1.0 - result;
        black.rating_delta += m.black_delta.unwrap_or(0);
        black.cells[index] = Some(RoundCell {
            result: 1.0 - result,
            side: Side::Black,
            rating_delta: m.black_delta.unwrap_or(0),
        });
    }

    let mut table: Vec<PlayerReportRow> = rows.into_values().collect();
    table.sort_by(|a, b| {
        b.total_score
            .total_cmp(&a.total_score)
            .then_with(|| a.name.cmp(&b.name))
    });
    table
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum RowKey {
    Id(PlayerId),
    Name(String),
}

fn row_entry<'a>(
    rows: &'a mut BTreeMap<RowKey, PlayerReportRow>,
    rounds: usize,
    player_id: Option<PlayerId>,
    name: &str,
) -> &'a mut PlayerReportRow {
    let key = match player_id {
        Some(id) => RowKey::Id(id),
        None => RowKey::Name(name.to_string()),
    };
    rows.entry(key).or_insert_with(|| PlayerReportRow {
        player_id,
        name: name.to_string(),
        cells: vec![None; rounds],
        total_score: 0.0,
        rating_delta: 0,
    })
}
