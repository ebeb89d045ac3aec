use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::schedules;
use crate::state::AppState;
use crate::virtual_posts;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/virtual-posts", get(virtual_posts::list_virtual_posts))
        .route("/schedules/{schedule_id}/slots", get(schedules::preview_slots))
        .route(
            "/schedules/{schedule_id}/skips",
            post(schedules::skip_slot).delete(schedules::unskip_slot),
        )
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
