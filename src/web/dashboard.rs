use crate::db;
use crate::domain::filter;
use crate::domain::models::{ShiftReport, ShiftType};
use crate::domain::shift_time;
use crate::state::SharedState;
use crate::web::session::UserSession;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/summary", get(summary))
        .with_state(state)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub reports_this_week: usize,
    pub reports_this_month: usize,
    pub total_reports: usize,
    pub total_incidents: usize,
    /// What the wall clock says the current shift is; pre-selects the
    /// capture form's shift type, nothing more.
    pub current_shift: ShiftType,
    pub recent_reports: Vec<ShiftReport>,
}

const RECENT_REPORTS: usize = 3;

async fn summary(
    UserSession(_claims): UserSession,
    State(state): State<SharedState>,
) -> Result<Json<DashboardSummary>, StatusCode> {
    let mut reports = db::get_all_shift_reports(&state.pool).await.map_err(|e| {
        tracing::error!("Failed to fetch shift reports: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    filter::sort_newest_first(&mut reports);

    let today = Local::now().date_naive();

    let reports_this_week = reports
        .iter()
        .filter(|r| within_past_week(r.shift_date, today))
        .count();
    let reports_this_month = reports
        .iter()
        .filter(|r| r.shift_date.year() == today.year() && r.shift_date.month() == today.month())
        .count();
    let total_reports = reports.len();
    let total_incidents = reports.iter().filter(|r| r.incident_status).count();

    let recent_reports = reports.into_iter().take(RECENT_REPORTS).collect();

    Ok(Json(DashboardSummary {
        reports_this_week,
        reports_this_month,
        total_reports,
        total_incidents,
        current_shift: shift_time::current_shift(),
        recent_reports,
    }))
}

/// The last seven calendar days, today included.
fn within_past_week(date: NaiveDate, today: NaiveDate) -> bool {
    date > today - Duration::days(7) && date <= today
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn past_week_spans_seven_days() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert!(within_past_week(today, today));
        assert!(within_past_week(today - Duration::days(6), today));
        assert!(!within_past_week(today - Duration::days(7), today));
        assert!(!within_past_week(today + Duration::days(1), today));
    }
}
