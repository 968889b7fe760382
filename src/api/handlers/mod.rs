use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use crate::api::models::ErrorBody;
use crate::database::DbPool;
use crate::errors::TournamentError;
use crate::services::lifecycle::TournamentService;

pub mod admin;
pub mod players;
pub mod tournaments;

pub struct AppState {
    pub pool: DbPool,
    pub service: TournamentService,
}

/// Boundary wrapper mapping the domain taxonomy onto HTTP statuses.
pub struct ApiError(TournamentError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            TournamentError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            TournamentError::State(msg) => (StatusCode::CONFLICT, msg),
            TournamentError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            TournamentError::Storage(err) => {
                log::error!("Storage failure: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal storage error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<TournamentError> for ApiError {
    fn from(err: TournamentError) -> Self {
        ApiError(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError(TournamentError::Storage(err))
    }
}
