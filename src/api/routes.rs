use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::api::handlers::{admin, players, tournaments, AppState};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/players",
            get(players::list_players).post(players::create_player),
        )
        .route("/api/player/:id", get(players::player_detail))
        .route("/api/admin/player/:id/rating", put(admin::set_rating))
        .route("/api/admin/player/:id", delete(admin::delete_player))
        .route(
            "/api/tournaments",
            get(tournaments::list_tournaments).post(tournaments::create_tournament),
        )
        .route(
            "/api/tournament/:id",
            get(tournaments::tournament_detail).delete(tournaments::delete_tournament),
        )
        .route(
            "/api/tournament/:id/register",
            post(tournaments::register_player),
        )
        .route(
            "/api/tournament/:id/withdraw",
            post(tournaments::withdraw_player),
        )
        .route("/api/tournament/:id/rounds", post(tournaments::advance_round))
        .route(
            "/api/tournament/:id/results",
            post(tournaments::record_results),
        )
        .route("/api/tournament/:id/report", get(tournaments::report))
        .with_state(state)
}
