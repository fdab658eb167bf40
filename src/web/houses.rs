use crate::db;
use crate::domain::filter::{self, HouseSummary};
use crate::domain::models::ShiftType;
use crate::state::SharedState;
use crate::web::reports::ReportView;
use crate::web::session::UserSession;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::collections::HashMap;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(list_houses))
        .route("/:house/reports", get(house_reports))
        .with_state(state)
}

/// Per-house aggregates for the dashboard grid. Derived on every request
/// from the full report set.
async fn list_houses(
    UserSession(_claims): UserSession,
    State(state): State<SharedState>,
) -> Result<Json<Vec<HouseSummary>>, StatusCode> {
    let reports = db::get_all_shift_reports(&state.pool).await.map_err(|e| {
        tracing::error!("Failed to fetch shift reports: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(filter::house_summaries(&reports)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseReportsQuery {
    shift_type: Option<String>,
}

/// Reports for one house: the single place that uses the store's
/// server-side equality query instead of an in-process scan. An optional
/// shift-type criterion narrows the result the way the house drill-down
/// modal does.
async fn house_reports(
    UserSession(_claims): UserSession,
    State(state): State<SharedState>,
    Path(house): Path<u8>,
    Query(query): Query<HouseReportsQuery>,
) -> Result<Json<Vec<ReportView>>, StatusCode> {
    if !crate::domain::roster::HOUSES.contains(&house) {
        return Err(StatusCode::NOT_FOUND);
    }

    let shift_type = match query.shift_type.filter(|s| !s.trim().is_empty()) {
        Some(raw) => {
            Some(ShiftType::try_from(raw.as_str()).map_err(|_| StatusCode::BAD_REQUEST)?)
        }
        None => None,
    };

    let mut reports = db::get_shift_reports_by_house(&state.pool, house)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch reports for house {}: {}", house, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if let Some(shift) = shift_type {
        reports.retain(|r| r.shift_type == shift);
    }
    filter::sort_newest_first(&mut reports);

    let users: HashMap<_, _> = db::get_all_users(&state.pool)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect();

    let views = reports
        .into_iter()
        .map(|report| ReportView {
            submitter_name: users
                .get(&report.user_id)
                .map(|u| u.display_name.clone())
                .filter(|n| !n.is_empty()),
            report,
        })
        .collect();
    Ok(Json(views))
}
