use thiserror::Error;

/// Domain failures surfaced by the core operations. Storage-level problems
/// travel separately as `anyhow::Error` with context attached.
#[derive(Debug, Error)]
pub enum TournamentError {
    /// Malformed input: bad result value, negative rating, round count < 1.
    #[error("validation error: {0}")]
    Validation(String),

    /// Operation not allowed in the tournament's current state.
    #[error("state error: {0}")]
    State(String),

    /// Referenced tournament, player or match does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Data store failure, carrying the storage context chain.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl TournamentError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TournamentError::Validation(msg.into())
    }

    pub fn state(msg: impl Into<String>) -> Self {
        TournamentError::State(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        TournamentError::NotFound(msg.into())
    }
}
