use serde::Serialize;

use crate::database::models::Tournament;
use crate::errors::TournamentError;

/// Explicit lifecycle phase, derived from the stored counters instead of
/// being inferred ad hoc at every call site.
///
/// `InProgress` covers the window where the final round is generated but
/// not yet fully scored (`current_round == total_rounds`, `!completed`);
/// the completion flag only flips once those results are saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentPhase {
    Registering,
    InProgress,
    Completed,
}

impl TournamentPhase {
    /// Classifies a tournament, rejecting field combinations that no valid
    /// transition can produce.
    pub fn of(tournament: &Tournament) -> Result<Self, TournamentError> {
        if tournament.total_rounds < 1 {
            return Err(TournamentError::validation(format!(
                "tournament {} has a round count below 1",
                tournament.id
            )));
        }
        if tournament.current_round > tournament.total_rounds {
            return Err(TournamentError::state(format!(
                "tournament {} is past its final round ({} of {})",
                tournament.id, tournament.current_round, tournament.total_rounds
            )));
        }
        if tournament.completed {
            if tournament.current_round != tournament.total_rounds {
                return Err(TournamentError::state(format!(
                    "tournament {} is marked completed at round {} of {}",
                    tournament.id, tournament.current_round, tournament.total_rounds
                )));
            }
            return Ok(TournamentPhase::Completed);
        }
        if tournament.current_round == 0 {
            Ok(TournamentPhase::Registering)
        } else {
            Ok(TournamentPhase::InProgress)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TournamentPhase::Registering => "registering",
            TournamentPhase::InProgress => "in_progress",
            TournamentPhase::Completed => "completed",
        }
    }
}
