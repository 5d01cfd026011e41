//! Site visit counter endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::db::counter;
use crate::{ApiResult, AppState};

/// Visit counter response
#[derive(Debug, Serialize)]
pub struct VisitResponse {
    pub visits: i64,
}

/// POST /api/visits
///
/// Bumps the counter and returns the new total. Ungated: every page
/// view calls this.
pub async fn record_visit(State(state): State<AppState>) -> ApiResult<Json<VisitResponse>> {
    let visits = counter::increment_visits(&state.db).await?;
    Ok(Json(VisitResponse { visits }))
}
