use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{dto::dashboard_dto::DashboardSummary, error::Result, AppState};

#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Hiring pipeline counters", body = Json<DashboardSummary>)
    )
)]
#[axum::debug_handler]
pub async fn get_dashboard(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let summary = state.dashboard_service.summary().await?;
    Ok(Json(summary))
}
