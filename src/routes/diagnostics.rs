use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::routes::AppState;

/// GET {diag_path} - Which required settings are present
///
/// Only booleans are reported, never the values themselves.
pub async fn page(State(app_state): State<AppState>) -> impl IntoResponse {
    let presence = app_state.config.presence();
    let ready = presence.values().all(|present| *present);

    Json(json!({
        "ok": ready,
        "config": presence,
    }))
}
