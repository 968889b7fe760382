use std::collections::{HashMap, HashSet, VecDeque};

use crate::errors::TournamentError;

use super::standings;
use super::types::{MatchRecord, Pairing, PlayerId, PlayerSeed, RoundPlan};

/// Swiss-style pairing for the next round.
///
/// Players are ranked by (score, rating) descending and paired greedily from
/// the top: each player meets the highest-ranked opponent they have not
/// faced yet, falling back to a forced rematch when every remaining opponent
/// is exhausted. An odd pool leaves the last-ranked player with a bye.
/// No swap-based backtracking is attempted to minimize total rematches.
pub fn generate_round(
    active_players: &[PlayerSeed],
    prior_matches: &[MatchRecord],
) -> Result<RoundPlan, TournamentError> {
    if active_players.len() < 2 {
        return Err(TournamentError::state(
            "at least two active players are required to pair a round",
        ));
    }

    let mut queue: VecDeque<PlayerSeed> = standings::rank(active_players, prior_matches)
        .into_iter()
        .map(|(player, _)| player)
        .collect();
    let faced = faced_opponents(active_players, prior_matches);

    let mut pairings = Vec::with_capacity(queue.len() / 2);
    while queue.len() > 1 {
        let Some(white) = queue.pop_front() else { break };
        let fresh = queue
            .iter()
            .position(|candidate| !has_faced(&faced, white.id, candidate.id));
        // No fresh opponent left: force-pair with the next in rank so nobody
        // stays unmatched.
        let black = match fresh {
            Some(position) => queue.remove(position),
            None => queue.pop_front(),
        };
        let Some(black) = black else { break };
        pairings.push(Pairing {
            white: white.id,
            black: black.id,
        });
    }

    let bye = queue.pop_front().map(|player| player.id);
    Ok(RoundPlan { pairings, bye })
}

/// Opponents each active player has already met, considering only matches
/// where both sides are still active. A withdrawn opponent's past match
/// neither blocks the remaining player nor matters for pairing — the
/// opponent cannot be paired again anyway.
fn faced_opponents(
    active_players: &[PlayerSeed],
    prior_matches: &[MatchRecord],
) -> HashMap<PlayerId, HashSet<PlayerId>> {
    let mut faced: HashMap<PlayerId, HashSet<PlayerId>> = active_players
        .iter()
        .map(|player| (player.id, HashSet::new()))
        .collect();

    for m in prior_matches {
        let (Some(white), Some(black)) = (m.white, m.black) else {
            continue;
        };
        if !faced.contains_key(&white) || !faced.contains_key(&black) {
            continue;
        }
        if let Some(opponents) = faced.get_mut(&white) {
            opponents.insert(black);
        }
        if let Some(opponents) = faced.get_mut(&black) {
            opponents.insert(white);
        }
    }

    faced
}

fn has_faced(
    faced: &HashMap<PlayerId, HashSet<PlayerId>>,
    player: PlayerId,
    opponent: PlayerId,
) -> bool {
    faced
        .get(&player)
        .is_some_and(|opponents| opponents.contains(&opponent))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(id: PlayerId, rating: i32) -> PlayerSeed {
        PlayerSeed { id, rating }
    }

    fn played(white: PlayerId, black: PlayerId, result: f64) -> MatchRecord {
        MatchRecord {
            round: 1,
            white: Some(white),
            black: Some(black),
            result: Some(result),
        }
    }

    #[test]
    fn fewer_than_two_players_is_a_state_error() {
        let err = generate_round(&[seed(1, 1500)], &[]).unwrap_err();
        assert!(matches!(err, TournamentError::State(_)));

        let err = generate_round(&[], &[]).unwrap_err();
        assert!(matches!(err, TournamentError::State(_)));
    }

    #[test]
    fn even_pool_pairs_everyone_without_bye() {
        let players = [seed(1, 1800), seed(2, 1700), seed(3, 1600), seed(4, 1500)];

        let plan = generate_round(&players, &[]).unwrap();

        assert_eq!(plan.pairings.len(), 2);
        assert_eq!(plan.bye, None);
        assert_eq!(
            plan.pairings[0],
            Pairing { white: 1, black: 2 }
        );
        assert_eq!(
            plan.pairings[1],
            Pairing { white: 3, black: 4 }
        );
    }

    #[test]
    fn odd_pool_gives_exactly_one_bye_to_the_last_ranked() {
        let players = [
            seed(1, 1800),
            seed(2, 1700),
            seed(3, 1600),
            seed(4, 1500),
            seed(5, 1400),
        ];

        let plan = generate_round(&players, &[]).unwrap();

        assert_eq!(plan.pairings.len(), 2);
        assert_eq!(plan.bye, Some(5));
    }

    #[test]
    fn never_pairs_a_player_with_themselves() {
        let players: Vec<PlayerSeed> = (1..=9).map(|id| seed(id, 1500)).collect();

        let plan = generate_round(&players, &[]).unwrap();

        for pairing in &plan.pairings {
            assert_ne!(pairing.white, pairing.black);
        }
    }

    #[test]
    fn avoids_rematch_when_an_alternative_exists() {
        let players = [seed(1, 1800), seed(2, 1700), seed(3, 1600), seed(4, 1500)];
        // Round 1 was 1-2 and 3-4; leaders meet next.
        let prior = [played(1, 2, 1.0), played(3, 4, 1.0)];

        let plan = generate_round(&players, &prior).unwrap();

        for pairing in &plan.pairings {
            let repeat = prior.iter().any(|m| {
                (m.white == Some(pairing.white) && m.black == Some(pairing.black))
                    || (m.white == Some(pairing.black) && m.black == Some(pairing.white))
            });
            assert!(!repeat, "rematch {pairing:?}");
        }
        assert_eq!(
            plan.pairings[0],
            Pairing { white: 1, black: 3 }
        );
    }

    #[test]
    fn forces_a_rematch_when_no_fresh_opponent_remains() {
        let players = [seed(1, 1600), seed(2, 1500)];
        let prior = [played(1, 2, 1.0)];

        let plan = generate_round(&players, &prior).unwrap();

        assert_eq!(
            plan.pairings,
            vec![Pairing { white: 1, black: 2 }]
        );
        assert_eq!(plan.bye, None);
    }

    #[test]
    fn withdrawn_opponents_do_not_constrain_pairing() {
        // Player 9 has left the roster; 1 already played them, which must
        // not stop 1 from meeting the only remaining fresh opponent.
        let players = [seed(1, 1600), seed(2, 1500)];
        let prior = [played(1, 9, 1.0)];

        let plan = generate_round(&players, &prior).unwrap();

        assert_eq!(
            plan.pairings,
            vec![Pairing { white: 1, black: 2 }]
        );
    }

    #[test]
    fn leaders_meet_leaders_after_scores_split() {
        let players = [
            seed(1, 1500),
            seed(2, 1500),
            seed(3, 1500),
            seed(4, 1500),
            seed(5, 1500),
        ];
        // Round 1: 1 beat 2, 4 beat 3, 5 had the bye.
        let prior = [
            played(1, 2, 1.0),
            played(3, 4, 0.0),
            MatchRecord {
                round: 1,
                white: Some(5),
                black: None,
                result: Some(1.0),
            },
        ];

        let plan = generate_round(&players, &prior).unwrap();

        // Score group {1, 4, 5} pairs among itself first.
        assert_eq!(
            plan.pairings[0],
            Pairing { white: 1, black: 4 }
        );
        assert_eq!(
            plan.pairings[1],
            Pairing { white: 5, black: 2 }
        );
        assert_eq!(plan.bye, Some(3));
    }

    #[test]
    fn output_is_stable_for_identical_inputs() {
        let players: Vec<PlayerSeed> = (1..=7).map(|id| seed(id, 1500)).collect();
        let prior = [played(1, 2, 0.5), played(3, 4, 1.0)];

        let first = generate_round(&players, &prior).unwrap();
        let second = generate_round(&players, &prior).unwrap();

        assert_eq!(first, second);
    }
}
