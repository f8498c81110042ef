use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/view", get(handlers::get_view).post(handlers::post_view))
        .route("/api/locations", get(handlers::get_locations))
        .route("/api/nps", get(handlers::get_nps))
        .route("/api/dataset", get(handlers::get_dataset))
        .with_state(state)
}
