use swiss_club_ranking::config::settings::RatingSettings;
use swiss_club_ranking::database::{self, DbPool};
use swiss_club_ranking::errors::TournamentError;
use swiss_club_ranking::services::lifecycle::{MatchResultEntry, TournamentService};

fn setup() -> (TournamentService, DbPool) {
    let pool = database::create_memory_pool().expect("memory pool");
    {
        let conn = database::get_connection(&pool).expect("connection");
        database::setup::reset_database(&conn).expect("schema");
    }
    let service = TournamentService::new(pool.clone(), RatingSettings::default());
    (service, pool)
}

fn create_players(service: &TournamentService, count: usize) -> Vec<i64> {
    (1..=count)
        .map(|i| {
            service
                .create_player(&format!("player{i}"), &format!("Player {i}"), false)
                .expect("player")
                .id
        })
        .collect()
}

fn enter_all(service: &TournamentService, tournament_id: i64, players: &[i64]) {
    for &player_id in players {
        service
            .register_player(tournament_id, player_id, false)
            .expect("register");
    }
}

/// Scores every unresolved non-bye match of a round with the given result.
fn score_round(service: &TournamentService, pool: &DbPool, tournament_id: i64, round: i64) {
    let conn = database::get_connection(pool).expect("connection");
    let entries: Vec<MatchResultEntry> =
        database::matches::list_by_round(&conn, tournament_id, round)
            .expect("matches")
            .iter()
            .filter(|m| !m.is_bye() && m.result.is_none())
            .map(|m| MatchResultEntry {
                match_id: m.id,
                result: 1.0,
            })
            .collect();
    drop(conn);
    service
        .record_results(tournament_id, round, &entries)
        .expect("record results");
}

#[test]
fn five_players_three_rounds_end_to_end() {
    let (service, pool) = setup();
    let players = create_players(&service, 5);
    let tournament = service.create_tournament("Autumn Open", 3).expect("tournament");
    enter_all(&service, tournament.id, &players);

    // Round 1: two boards plus a bye.
    let round1 = service.advance_round(tournament.id).expect("round 1");
    assert_eq!(round1.round, 1);
    assert_eq!(round1.matches.len(), 3);
    let byes: Vec<_> = round1.matches.iter().filter(|m| m.is_bye()).collect();
    assert_eq!(byes.len(), 1);
    assert_eq!(byes[0].result, Some(1.0));

    // Decisive results for both played boards.
    let played: Vec<i64> = round1
        .matches
        .iter()
        .filter(|m| !m.is_bye())
        .map(|m| m.id)
        .collect();
    service
        .record_results(
            tournament.id,
            1,
            &[
                MatchResultEntry {
                    match_id: played[0],
                    result: 1.0,
                },
                MatchResultEntry {
                    match_id: played[1],
                    result: 0.0,
                },
            ],
        )
        .expect("round 1 results");

    // Winners gained, losers lost.
    {
        let conn = database::get_connection(&pool).expect("connection");
        let m = database::matches::find_by_id(&conn, played[0])
            .expect("match")
            .expect("exists");
        assert_eq!(m.white_delta, Some(16));
        assert_eq!(m.black_delta, Some(-16));
    }

    // Round 2 avoids the pairs that already met.
    let round2 = service.advance_round(tournament.id).expect("round 2");
    let earlier: Vec<(Option<i64>, Option<i64>)> = round1
        .matches
        .iter()
        .filter(|m| !m.is_bye())
        .map(|m| (m.white_id, m.black_id))
        .collect();
    for m in round2.matches.iter().filter(|m| !m.is_bye()) {
        let repeat = earlier
            .iter()
            .any(|&(w, b)| (w, b) == (m.white_id, m.black_id) || (b, w) == (m.white_id, m.black_id));
        assert!(!repeat, "round 2 repeated a round 1 pairing");
    }

    score_round(&service, &pool, tournament.id, 2);
    let round3 = service.advance_round(tournament.id).expect("round 3");
    assert_eq!(round3.round, 3);
    score_round(&service, &pool, tournament.id, 3);

    let conn = database::get_connection(&pool).expect("connection");
    let finished = database::tournaments::find_by_id(&conn, tournament.id)
        .expect("query")
        .expect("exists");
    assert!(finished.completed);
    assert_eq!(finished.current_round, 3);

    // Terminal: no further pairing.
    drop(conn);
    let err = service.advance_round(tournament.id).unwrap_err();
    assert!(matches!(err, TournamentError::State(_)));
}

#[test]
fn advance_fails_while_previous_round_is_unscored() {
    let (service, pool) = setup();
    let players = create_players(&service, 4);
    let tournament = service.create_tournament("Blitz Night", 2).expect("tournament");
    enter_all(&service, tournament.id, &players);

    service.advance_round(tournament.id).expect("round 1");
    let err = service.advance_round(tournament.id).unwrap_err();
    assert!(matches!(err, TournamentError::State(_)));

    let conn = database::get_connection(&pool).expect("connection");
    let unchanged = database::tournaments::find_by_id(&conn, tournament.id)
        .expect("query")
        .expect("exists");
    assert_eq!(unchanged.current_round, 1);
    assert!(!unchanged.completed);
}

#[test]
fn registration_closes_once_play_begins() {
    let (service, _pool) = setup();
    let players = create_players(&service, 5);
    let tournament = service.create_tournament("Open", 2).expect("tournament");
    enter_all(&service, tournament.id, &players[..4]);

    service.advance_round(tournament.id).expect("round 1");

    let err = service
        .register_player(tournament.id, players[4], false)
        .unwrap_err();
    assert!(matches!(err, TournamentError::State(_)));

    // Administrator-forced edits stay possible.
    service
        .register_player(tournament.id, players[4], true)
        .expect("forced registration");
}

#[test]
fn withdrawn_player_is_excluded_from_future_rounds() {
    let (service, pool) = setup();
    let players = create_players(&service, 5);
    let tournament = service.create_tournament("Open", 3).expect("tournament");
    enter_all(&service, tournament.id, &players);

    service.advance_round(tournament.id).expect("round 1");
    score_round(&service, &pool, tournament.id, 1);

    service
        .withdraw_player(tournament.id, players[4])
        .expect("withdraw");

    // Four players remain: two boards, no bye.
    let round2 = service.advance_round(tournament.id).expect("round 2");
    assert_eq!(round2.matches.len(), 2);
    assert!(round2.matches.iter().all(|m| !m.is_bye()));
    for m in &round2.matches {
        assert_ne!(m.white_id, Some(players[4]));
        assert_ne!(m.black_id, Some(players[4]));
    }
}

#[test]
fn invalid_result_value_is_rejected_without_writes() {
    let (service, pool) = setup();
    let players = create_players(&service, 2);
    let tournament = service.create_tournament("Duel", 1).expect("tournament");
    enter_all(&service, tournament.id, &players);

    let round = service.advance_round(tournament.id).expect("round 1");
    let board = round.matches[0].id;

    let err = service
        .record_results(
            tournament.id,
            1,
            &[MatchResultEntry {
                match_id: board,
                result: 0.7,
            }],
        )
        .unwrap_err();
    assert!(matches!(err, TournamentError::Validation(_)));

    let conn = database::get_connection(&pool).expect("connection");
    let untouched = database::matches::find_by_id(&conn, board)
        .expect("query")
        .expect("exists");
    assert_eq!(untouched.result, None);
}

#[test]
fn results_transition_exactly_once() {
    let (service, _pool) = setup();
    let players = create_players(&service, 2);
    let tournament = service.create_tournament("Duel", 2).expect("tournament");
    enter_all(&service, tournament.id, &players);

    let round = service.advance_round(tournament.id).expect("round 1");
    let board = round.matches[0].id;
    let entry = [MatchResultEntry {
        match_id: board,
        result: 0.5,
    }];
    service
        .record_results(tournament.id, 1, &entry)
        .expect("first write");

    let err = service.record_results(tournament.id, 1, &entry).unwrap_err();
    assert!(matches!(err, TournamentError::State(_)));
}

#[test]
fn bye_leaves_rating_unchanged_but_is_recorded() {
    let (service, pool) = setup();
    let players = create_players(&service, 3);
    let tournament = service.create_tournament("Trio", 1).expect("tournament");
    enter_all(&service, tournament.id, &players);

    let round = service.advance_round(tournament.id).expect("round 1");
    let bye = round
        .matches
        .iter()
        .find(|m| m.is_bye())
        .expect("one bye for an odd pool");
    let bye_player = bye.white_id.expect("bye player id");

    let conn = database::get_connection(&pool).expect("connection");
    let player = database::players::find_by_id(&conn, bye_player)
        .expect("query")
        .expect("exists");
    assert_eq!(player.rating, 1500);

    // The self-versus-self update still lands in the history.
    let history = database::history::list_by_player(&conn, bye_player).expect("history");
    assert_eq!(history.len(), 2);
    assert!(history
        .iter()
        .any(|entry| entry.note.as_deref().is_some_and(|note| note.contains("bye"))));
}

#[test]
fn deleting_a_player_keeps_opponent_scores_and_report_lines() {
    let (service, pool) = setup();
    let players = create_players(&service, 4);
    let tournament = service.create_tournament("Open", 2).expect("tournament");
    enter_all(&service, tournament.id, &players);

    let round1 = service.advance_round(tournament.id).expect("round 1");
    score_round(&service, &pool, tournament.id, 1);

    let loser = round1
        .matches
        .iter()
        .find(|m| !m.is_bye())
        .and_then(|m| m.black_id)
        .expect("loser id");
    service.delete_player(loser).expect("delete");

    let conn = database::get_connection(&pool).expect("connection");
    assert!(database::players::find_by_id(&conn, loser)
        .expect("query")
        .is_none());
    assert!(database::history::list_by_player(&conn, loser)
        .expect("history")
        .is_empty());

    let matches = database::matches::list_by_tournament(&conn, tournament.id).expect("matches");
    let tournament_row = database::tournaments::find_by_id(&conn, tournament.id)
        .expect("query")
        .expect("exists");
    let rows = swiss_club_ranking::tournament::crosstable(tournament_row.total_rounds, &matches);

    // Winners keep their point; the deleted player keeps a named line.
    let total: f64 = rows.iter().map(|r| r.total_score).sum();
    assert_eq!(total, 2.0);
    assert!(rows.iter().any(|r| r.player_id.is_none()));
}

#[test]
fn pairing_needs_at_least_two_players() {
    let (service, _pool) = setup();
    let players = create_players(&service, 1);
    let tournament = service.create_tournament("Solo", 1).expect("tournament");
    enter_all(&service, tournament.id, &players);

    let err = service.advance_round(tournament.id).unwrap_err();
    assert!(matches!(err, TournamentError::State(_)));
}
