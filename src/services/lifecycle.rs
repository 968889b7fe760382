use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};
use log::info;
use rusqlite::Connection;

use crate::config::settings::RatingSettings;
use crate::database::models::{Match, Player, Tournament};
use crate::database::{self, DbPool};
use crate::errors::TournamentError;
use crate::rating::elo;
use crate::tournament::{pairing, MatchRecord, PlayerSeed, TournamentPhase};

/// Outcome values a match result may take, from the white side.
const VALID_RESULTS: [f64; 3] = [0.0, 0.5, 1.0];

/// A freshly generated round: the persisted boards plus the bye, in rank
/// order.
#[derive(Debug, Clone)]
pub struct GeneratedRound {
    pub round: i64,
    pub matches: Vec<Match>,
}

#[derive(Debug, Clone, Copy)]
pub struct MatchResultEntry {
    pub match_id: i64,
    pub result: f64,
}

/// Orchestrates tournament mutations. Every write runs inside one SQLite
/// transaction, and a per-tournament mutex serializes round generation and
/// result recording so a round can never be paired or scored twice
/// concurrently. Reads go straight through the pool.
pub struct TournamentService {
    pool: DbPool,
    settings: RatingSettings,
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl TournamentService {
    pub fn new(pool: DbPool, settings: RatingSettings) -> Self {
        Self {
            pool,
            settings,
            locks: Mutex::new(HashMap::new()),
        }
    }

    // --- players ---

    pub fn create_player(
        &self,
        username: &str,
        display_name: &str,
        is_admin: bool,
    ) -> Result<Player, TournamentError> {
        let username = username.trim();
        let display_name = display_name.trim();
        if username.is_empty() || display_name.is_empty() {
            return Err(TournamentError::validation(
                "username and display name must not be empty",
            ));
        }

        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction().context("Failed to open transaction")?;

        if database::players::find_by_username(&tx, username)?.is_some() {
            return Err(TournamentError::validation(format!(
                "username '{username}' is already taken"
            )));
        }

        let player = database::players::insert_player(
            &tx,
            username,
            display_name,
            self.settings.starter_rating,
            is_admin,
        )?;
        database::history::append_entry(
            &tx,
            player.id,
            player.rating,
            self.season_start(),
            Some("Account created"),
        )?;

        tx.commit().context("Failed to commit player creation")?;
        info!("Created player '{}' (id {})", player.username, player.id);
        Ok(player)
    }

    pub fn set_player_rating(
        &self,
        player_id: i64,
        rating: i32,
    ) -> Result<Player, TournamentError> {
        if rating < 0 {
            return Err(TournamentError::validation("rating must not be negative"));
        }

        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction().context("Failed to open transaction")?;

        let player = database::players::find_by_id(&tx, player_id)?
            .ok_or_else(|| TournamentError::not_found(format!("player {player_id}")))?;
        database::players::update_rating(&tx, player.id, rating)?;
        database::history::append_entry(
            &tx,
            player.id,
            rating,
            Utc::now().naive_utc(),
            Some("Manual rating adjustment"),
        )?;

        tx.commit().context("Failed to commit rating change")?;
        info!("Set rating of player {} to {}", player.id, rating);
        Ok(Player { rating, ..player })
    }

    /// Deletes a player. Their history goes with them; their matches stay,
    /// detached from the account but with the display name preserved so
    /// opponents' scores and old crosstables survive.
    pub fn delete_player(&self, player_id: i64) -> Result<(), TournamentError> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction().context("Failed to open transaction")?;

        let player = database::players::find_by_id(&tx, player_id)?
            .ok_or_else(|| TournamentError::not_found(format!("player {player_id}")))?;
        database::matches::detach_player(&tx, player.id)?;
        database::tournaments::remove_from_all_rosters(&tx, player.id)?;
        database::history::delete_for_player(&tx, player.id)?;
        database::players::delete_player(&tx, player.id)?;

        tx.commit().context("Failed to commit player deletion")?;
        info!("Deleted player '{}' (id {})", player.username, player.id);
        Ok(())
    }

    // --- tournaments ---

    pub fn create_tournament(
        &self,
        name: &str,
        total_rounds: i64,
    ) -> Result<Tournament, TournamentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::validation(
                "tournament name must not be empty",
            ));
        }
        if total_rounds < 1 {
            return Err(TournamentError::validation(
                "round count must be at least 1",
            ));
        }

        let conn = database::get_connection(&self.pool)?;
        let tournament = database::tournaments::insert_tournament(&conn, name, total_rounds)?;
        info!(
            "Created tournament '{}' with {} rounds",
            tournament.name, tournament.total_rounds
        );
        Ok(tournament)
    }

    pub fn delete_tournament(&self, tournament_id: i64) -> Result<(), TournamentError> {
        let lock = self.lock_handle(tournament_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction().context("Failed to open transaction")?;

        let tournament = find_tournament(&tx, tournament_id)?;
        database::matches::delete_by_tournament(&tx, tournament.id)?;
        database::tournaments::clear_roster(&tx, tournament.id)?;
        database::tournaments::delete_tournament(&tx, tournament.id)?;

        tx.commit().context("Failed to commit tournament deletion")?;
        info!("Deleted tournament '{}'", tournament.name);
        Ok(())
    }

    /// Adds a player to the roster. Self-registration closes once round 1
    /// is generated; an administrator may force an edit until completion.
    pub fn register_player(
        &self,
        tournament_id: i64,
        player_id: i64,
        force: bool,
    ) -> Result<(), TournamentError> {
        let lock = self.lock_handle(tournament_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction().context("Failed to open transaction")?;

        let tournament = find_tournament(&tx, tournament_id)?;
        match TournamentPhase::of(&tournament)? {
            TournamentPhase::Completed => {
                return Err(TournamentError::state("tournament is completed"));
            }
            TournamentPhase::InProgress if !force => {
                return Err(TournamentError::state(
                    "registration is closed, the tournament has already started",
                ));
            }
            _ => {}
        }

        let player = database::players::find_by_id(&tx, player_id)?
            .ok_or_else(|| TournamentError::not_found(format!("player {player_id}")))?;
        if database::tournaments::is_registered(&tx, tournament.id, player.id)? {
            return Err(TournamentError::state(format!(
                "player '{}' is already registered",
                player.username
            )));
        }
        database::tournaments::add_to_roster(&tx, tournament.id, player.id)?;

        tx.commit().context("Failed to commit registration")?;
        Ok(())
    }

    /// Removes a player from the roster. Their played matches keep
    /// counting; they are simply excluded from future pairing rounds.
    pub fn withdraw_player(
        &self,
        tournament_id: i64,
        player_id: i64,
    ) -> Result<(), TournamentError> {
        let lock = self.lock_handle(tournament_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction().context("Failed to open transaction")?;

        let tournament = find_tournament(&tx, tournament_id)?;
        if TournamentPhase::of(&tournament)? == TournamentPhase::Completed {
            return Err(TournamentError::state("tournament is completed"));
        }
        if !database::tournaments::is_registered(&tx, tournament.id, player_id)? {
            return Err(TournamentError::not_found(format!(
                "player {player_id} is not on the roster"
            )));
        }
        database::tournaments::remove_from_roster(&tx, tournament.id, player_id)?;

        tx.commit().context("Failed to commit withdrawal")?;
        Ok(())
    }

    // --- rounds ---

    /// Generates and persists the next round: checks the previous round is
    /// fully scored, ranks the roster, pairs it, and applies the bye's
    /// rating update, all atomically.
    pub fn advance_round(&self, tournament_id: i64) -> Result<GeneratedRound, TournamentError> {
        let lock = self.lock_handle(tournament_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction().context("Failed to open transaction")?;

        let tournament = find_tournament(&tx, tournament_id)?;
        if TournamentPhase::of(&tournament)? == TournamentPhase::Completed {
            return Err(TournamentError::state("tournament is already completed"));
        }
        if tournament.current_round >= tournament.total_rounds {
            return Err(TournamentError::state(
                "all rounds have been generated, awaiting final results",
            ));
        }

        let roster = database::tournaments::roster(&tx, tournament.id)?;
        let all_matches = database::matches::list_by_tournament(&tx, tournament.id)?;
        ensure_previous_round_scored(&tournament, &roster, &all_matches)?;

        let seeds: Vec<PlayerSeed> = roster
            .iter()
            .map(|p| PlayerSeed {
                id: p.id,
                rating: p.rating,
            })
            .collect();
        let records: Vec<MatchRecord> = all_matches.iter().map(MatchRecord::from).collect();
        let plan = pairing::generate_round(&seeds, &records)?;

        let next_round = tournament.current_round + 1;
        database::tournaments::set_current_round(&tx, tournament.id, next_round)?;

        let by_id: HashMap<i64, &Player> = roster.iter().map(|p| (p.id, p)).collect();
        let mut created = Vec::with_capacity(plan.pairings.len() + 1);
        for pair in &plan.pairings {
            let white = roster_player(&by_id, pair.white)?;
            let black = roster_player(&by_id, pair.black)?;
            created.push(database::matches::insert_pairing(
                &tx,
                tournament.id,
                next_round,
                white,
                black,
            )?);
        }

        if let Some(bye_id) = plan.bye {
            let player = roster_player(&by_id, bye_id)?;
            // The bye reuses the regular formula as a self-versus-self
            // draw; the resulting delta (zero at this K and rounding) is
            // recorded in the history like any other outcome.
            let new_rating = elo::update(player.rating, player.rating, 0.5);
            let delta = new_rating - player.rating;
            created.push(database::matches::insert_bye(
                &tx,
                tournament.id,
                next_round,
                player,
                delta,
            )?);
            database::players::update_rating(&tx, player.id, new_rating)?;
            database::history::append_entry(
                &tx,
                player.id,
                new_rating,
                Utc::now().naive_utc(),
                Some(&format!(
                    "Tournament {} round {} (bye)",
                    tournament.name, next_round
                )),
            )?;
        }

        tx.commit().context("Failed to commit round generation")?;
        info!(
            "Generated round {} of tournament '{}' ({} boards{})",
            next_round,
            tournament.name,
            plan.pairings.len(),
            if plan.bye.is_some() { ", 1 bye" } else { "" }
        );
        Ok(GeneratedRound {
            round: next_round,
            matches: created,
        })
    }

    /// Records results for the current round, applies the rating update to
    /// both sides of every newly decided match, appends their history
    /// entries, and flips the completion flag once the final round is
    /// fully scored. Atomic: either every write commits or none does.
    pub fn record_results(
        &self,
        tournament_id: i64,
        round: i64,
        results: &[MatchResultEntry],
    ) -> Result<(), TournamentError> {
        let lock = self.lock_handle(tournament_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction().context("Failed to open transaction")?;

        let tournament = find_tournament(&tx, tournament_id)?;
        if TournamentPhase::of(&tournament)? == TournamentPhase::Registering {
            return Err(TournamentError::state("no rounds have been generated yet"));
        }
        if round != tournament.current_round {
            return Err(TournamentError::state(format!(
                "results can only be recorded for the current round ({})",
                tournament.current_round
            )));
        }

        let round_matches = database::matches::list_by_round(&tx, tournament.id, round)?;
        let by_id: HashMap<i64, &Match> = round_matches.iter().map(|m| (m.id, m)).collect();

        let mut seen: HashSet<i64> = HashSet::with_capacity(results.len());
        let mut decided: Vec<(&Match, f64)> = Vec::with_capacity(results.len());
        for entry in results {
            if !seen.insert(entry.match_id) {
                return Err(TournamentError::validation(format!(
                    "match {} appears more than once",
                    entry.match_id
                )));
            }
            if !VALID_RESULTS.contains(&entry.result) {
                return Err(TournamentError::validation(format!(
                    "result must be 0, 0.5 or 1, got {}",
                    entry.result
                )));
            }
            let m = by_id.get(&entry.match_id).copied().ok_or_else(|| {
                TournamentError::not_found(format!(
                    "match {} in round {round}",
                    entry.match_id
                ))
            })?;
            if m.is_bye() {
                return Err(TournamentError::state(format!(
                    "match {} is a bye and is scored automatically",
                    m.id
                )));
            }
            if m.result.is_some() {
                return Err(TournamentError::state(format!(
                    "match {} is already scored",
                    m.id
                )));
            }
            decided.push((m, entry.result));
        }

        for (m, result) in decided {
            self.apply_result(&tx, &tournament, m, result)?;
        }

        if tournament.current_round == tournament.total_rounds {
            let final_round = database::matches::list_by_round(&tx, tournament.id, round)?;
            if final_round.iter().all(|m| m.result.is_some()) {
                database::tournaments::set_completed(&tx, tournament.id)?;
                info!("Tournament '{}' completed", tournament.name);
            }
        }

        tx.commit().context("Failed to commit round results")?;
        Ok(())
    }

    /// Writes one result and moves both ratings. A side whose account was
    /// deleted has no rating to move; the score still counts.
    fn apply_result(
        &self,
        tx: &Connection,
        tournament: &Tournament,
        m: &Match,
        result: f64,
    ) -> Result<(), TournamentError> {
        let white = match m.white_id {
            Some(id) => database::players::find_by_id(tx, id)?,
            None => None,
        };
        let black = match m.black_id {
            Some(id) => database::players::find_by_id(tx, id)?,
            None => None,
        };

        let (Some(white), Some(black)) = (white, black) else {
            database::matches::record_result(tx, m.id, result, None, None)?;
            return Ok(());
        };

        let new_white = elo::update(white.rating, black.rating, result);
        let new_black = elo::update(black.rating, white.rating, 1.0 - result);
        database::matches::record_result(
            tx,
            m.id,
            result,
            Some(new_white - white.rating),
            Some(new_black - black.rating),
        )?;

        let now = Utc::now().naive_utc();
        let note = format!("Tournament {} round {}", tournament.name, m.round);
        database::players::update_rating(tx, white.id, new_white)?;
        database::history::append_entry(tx, white.id, new_white, now, Some(&note))?;
        database::players::update_rating(tx, black.id, new_black)?;
        database::history::append_entry(tx, black.id, new_black, now, Some(&note))?;
        Ok(())
    }

    /// Handle to this tournament's writer lock. Callers hold the guard for
    /// the whole mutation:
    /// `let lock = self.lock_handle(id); let _guard = lock.lock()...;`
    fn lock_handle(&self, tournament_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(tournament_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Season opening of the current year, stamped on account-creation
    /// history entries.
    fn season_start(&self) -> NaiveDateTime {
        let now = Utc::now().naive_utc();
        NaiveDate::from_ymd_opt(
            now.year(),
            self.settings.season_start_month,
            self.settings.season_start_day,
        )
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(now)
    }
}

fn find_tournament(conn: &Connection, id: i64) -> Result<Tournament, TournamentError> {
    database::tournaments::find_by_id(conn, id)?
        .ok_or_else(|| TournamentError::not_found(format!("tournament {id}")))
}

fn roster_player<'a>(
    by_id: &HashMap<i64, &'a Player>,
    player_id: i64,
) -> Result<&'a Player, TournamentError> {
    by_id
        .get(&player_id)
        .copied()
        .ok_or_else(|| TournamentError::not_found(format!("player {player_id} left the roster")))
}

/// A round blocks advancement while any of its non-bye matches involving a
/// still-registered player is unscored. A match between two players who
/// both withdrew can no longer be scored and must not wedge the
/// tournament.
fn ensure_previous_round_scored(
    tournament: &Tournament,
    roster: &[Player],
    all_matches: &[Match],
) -> Result<(), TournamentError> {
    if tournament.current_round == 0 {
        return Ok(());
    }
    let active_ids: HashSet<i64> = roster.iter().map(|p| p.id).collect();
    let blocking = all_matches.iter().any(|m| {
        m.round == tournament.current_round
            && !m.is_bye()
            && m.result.is_none()
            && (m.white_id.is_some_and(|id| active_ids.contains(&id))
                || m.black_id.is_some_and(|id| active_ids.contains(&id)))
    });
    if blocking {
        return Err(TournamentError::state(format!(
            "round {} still has unscored matches",
            tournament.current_round
        )));
    }
    Ok(())
}
