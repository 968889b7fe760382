use std::collections::HashMap;

use super::types::{MatchRecord, PlayerId, PlayerSeed};

/// Cumulative score per player over the match ledger.
///
/// Every decided match credits `result` to the white side and `1 - result`
/// to the black side; a bye carries its automatic 1.0 on the white side.
/// Every player id appearing on any match gets a key, so withdrawn players
/// keep their totals — whether to display them is the caller's call.
/// Unresolved matches contribute nothing yet.
pub fn compute_scores(matches: &[MatchRecord]) -> HashMap<PlayerId, f64> {
    let mut scores: HashMap<PlayerId, f64> = HashMap::new();

    for m in matches {
        if let Some(id) = m.white {
            scores.entry(id).or_insert(0.0);
        }
        if let Some(id) = m.black {
            scores.entry(id).or_insert(0.0);
        }

        let Some(result) = m.result else { continue };
        if let Some(id) = m.white {
            if let Some(score) = scores.get_mut(&id) {
                *score += result;
            }
        }
        if let Some(id) = m.black {
            if let Some(score) = scores.get_mut(&id) {
                *score += 1.0 - result;
            }
        }
    }

    scores
}

/// Players ordered for standings and pairing: score descending, rating as
/// the tie-break, and the input order beyond that (stable sort), so the
/// ranking is deterministic for identical inputs.
pub fn rank(players: &[PlayerSeed], matches: &[MatchRecord]) -> Vec<(PlayerSeed, f64)> {
    let scores = compute_scores(matches);
    let mut ranked: Vec<(PlayerSeed, f64)> = players
        .iter()
        .map(|p| (*p, scores.get(&p.id).copied().unwrap_or(0.0)))
        .collect();
    ranked.sort_by(|(a, score_a), (b, score_b)| {
        score_b
            .total_cmp(score_a)
            .then_with(|| b.rating.cmp(&a.rating))
    });
    ranked
}
