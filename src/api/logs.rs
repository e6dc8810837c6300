//! Audit trail endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::activity_log::{ActivityLogDetails, LogQuery},
};

use super::AuthenticatedUser;

/// List the newest audit entries
#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "logs",
    security(("bearer_auth" = [])),
    params(LogQuery),
    responses(
        (status = 200, description = "Audit entries, newest first", body = Vec<ActivityLogDetails>),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_logs(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<LogQuery>,
) -> AppResult<Json<Vec<ActivityLogDetails>>> {
    let entries = state.services.logs.list_logs(&claims, query.limit).await?;
    Ok(Json(entries))
}
