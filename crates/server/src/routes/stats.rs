use axum::{extract::State, Json};
use service::StatsReport;

use crate::state::AppState;

#[utoipa::path(get, path = "/stats", tag = "stats", responses((status = 200, description = "Statistics")))]
pub async fn stats(State(state): State<AppState>) -> Json<StatsReport> {
    Json(StatsReport::from(&state.registry.stats()))
}
