use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::database::models::{Player, RatingHistoryEntry};

/// One charted point: the closing rating of a calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingPoint {
    pub date: NaiveDate,
    pub rating: i32,
}

/// Downsamples a rating timeline to one point per ISO week, oldest first.
///
/// Within a week only the entry with the latest timestamp survives. The
/// grouping key is the ISO week-year plus week number, so late-December and
/// early-January entries land in the week they actually belong to. Computed
/// entirely in memory so the result does not depend on what the underlying
/// store supports.
pub fn weekly_series(entries: &[RatingHistoryEntry]) -> Vec<RatingPoint> {
    let mut latest: HashMap<(i32, u32), &RatingHistoryEntry> = HashMap::new();

    for entry in entries {
        let week = entry.recorded_at.date().iso_week();
        let key = (week.year(), week.week());
        match latest.get(&key) {
            Some(current) if current.recorded_at >= entry.recorded_at => {}
            _ => {
                latest.insert(key, entry);
            }
        }
    }

    let mut points: Vec<RatingPoint> = latest
        .values()
        .map(|entry| RatingPoint {
            date: entry.recorded_at.date(),
            rating: entry.rating,
        })
        .collect();
    points.sort_by_key(|point| point.date);
    points
}

/// Weekly series for a player, with a synthesized point when the player has
/// no history at all (current rating at the account-creation date).
pub fn player_series(player: &Player, entries: &[RatingHistoryEntry]) -> Vec<RatingPoint> {
    let points = weekly_series(entries);
    if points.is_empty() {
        return vec![RatingPoint {
            date: player.created_at.date(),
            rating: player.rating,
        }];
    }
    points
}
