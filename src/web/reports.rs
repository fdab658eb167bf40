use crate::db;
use crate::domain::filter::{self, ReportFilter};
use crate::domain::form::{prepare_report, ReportDraft};
use crate::domain::models::{ShiftReport, ShiftType, UserProfile};
use crate::domain::roster;
use crate::domain::schema::{self, FieldDescriptor};
use crate::domain::shift_time;
use crate::i18n;
use crate::state::SharedState;
use crate::web::session::UserSession;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(list_reports))
        .route("/", post(create_report))
        .route("/form", get(form_template))
        .route("/:id", get(get_report))
        .with_state(state)
}

/// Raw filter criteria as they arrive on the query string. Empty strings
/// mean "no constraint", matching how the filter bar serializes cleared
/// inputs.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    shift_type: Option<String>,
    patient: Option<String>,
    incident: Option<String>,
    date_from: Option<String>,
    date_to: Option<String>,
    search: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> Result<ReportFilter, StatusCode> {
        Ok(ReportFilter {
            shift_type: parse_opt(self.shift_type, |s| ShiftType::try_from(s).ok())?,
            patient: none_if_empty(self.patient),
            incident: parse_opt(self.incident, parse_bool)?,
            date_from: parse_opt(self.date_from, |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())?,
            date_to: parse_opt(self.date_to, |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())?,
            search: none_if_empty(self.search),
        })
    }
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn parse_opt<T>(
    raw: Option<String>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, StatusCode> {
    match none_if_empty(raw) {
        None => Ok(None),
        Some(s) => parse(s.trim()).map(Some).ok_or(StatusCode::BAD_REQUEST),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// A report plus the resolved submitter display name, so the list view
/// never has to chase user documents itself.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitter_name: Option<String>,
    #[serde(flatten)]
    pub report: ShiftReport,
}

fn with_submitters(
    reports: Vec<ShiftReport>,
    users: &HashMap<String, UserProfile>,
) -> Vec<ReportView> {
    reports
        .into_iter()
        .map(|report| ReportView {
            submitter_name: users
                .get(&report.user_id)
                .map(|u| u.display_name.clone())
                .filter(|n| !n.is_empty()),
            report,
        })
        .collect()
}

async fn fetch_user_map(state: &SharedState) -> Result<HashMap<String, UserProfile>, StatusCode> {
    let users = db::get_all_users(&state.pool).await.map_err(|e| {
        tracing::error!("Failed to fetch users: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(users.into_iter().map(|u| (u.id.clone(), u)).collect())
}

/// The full report set, filtered in process and sorted newest first. The
/// collection is scanned whole by design; target volumes are small.
async fn list_reports(
    UserSession(_claims): UserSession,
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ReportView>>, StatusCode> {
    let criteria = query.into_filter()?;
    let reports = db::get_all_shift_reports(&state.pool).await.map_err(|e| {
        tracing::error!("Failed to fetch shift reports: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let users = fetch_user_map(&state).await?;

    let filtered = filter::filter_and_sort(reports, &users, &criteria);
    Ok(Json(with_submitters(filtered, &users)))
}

async fn get_report(
    UserSession(_claims): UserSession,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ShiftReport>, StatusCode> {
    let report = db::get_shift_report(&state.pool, &id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormQuery {
    shift_type: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseRoster {
    pub house: u8,
    pub patients: Vec<&'static str>,
}

/// Everything the capture form needs to render itself: the fields visible
/// for the chosen shift type (defaulting to the shift the clock says we
/// are in), the educator roster, and the house/patient coupling.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTemplate {
    pub shift_type: ShiftType,
    pub fields: Vec<FieldDescriptor>,
    pub educators: Vec<&'static str>,
    pub other_educator: &'static str,
    pub houses: Vec<HouseRoster>,
}

async fn form_template(
    UserSession(_claims): UserSession,
    State(state): State<SharedState>,
    Query(query): Query<FormQuery>,
) -> Result<Json<FormTemplate>, StatusCode> {
    let shift_type = match none_if_empty(query.shift_type) {
        Some(raw) => ShiftType::try_from(raw.as_str()).map_err(|_| StatusCode::BAD_REQUEST)?,
        None => shift_time::current_shift(),
    };

    let all_fields = db::get_all_form_fields(&state.pool).await.map_err(|e| {
        tracing::error!("Failed to fetch form fields: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let fields = schema::visible_fields(&all_fields, shift_type)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(FormTemplate {
        shift_type,
        fields,
        educators: roster::EDUCATORS.to_vec(),
        other_educator: roster::OTHER_EDUCATOR,
        houses: roster::HOUSES
            .iter()
            .map(|&house| HouseRoster {
                house,
                patients: roster::patients_for_house(house).to_vec(),
            })
            .collect(),
    }))
}

#[derive(Serialize)]
pub struct CreatedReport {
    pub id: String,
}

#[derive(Serialize)]
pub struct ValidationMessage {
    pub error: String,
    pub message: String,
}

/// Submit a report. Validation runs against the schema as it exists right
/// now; nothing is written when it fails, so the client keeps its draft
/// and the user can fix and resubmit.
async fn create_report(
    UserSession(claims): UserSession,
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(draft): Json<ReportDraft>,
) -> Result<(StatusCode, Json<CreatedReport>), (StatusCode, Json<ValidationMessage>)> {
    let fields = db::get_all_form_fields(&state.pool).await.map_err(|e| {
        tracing::error!("Failed to fetch form fields: {}", e);
        store_failure(&headers)
    })?;

    let lang = super::request_lang(&headers);
    let mut report = prepare_report(&fields, &draft).map_err(|e| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationMessage {
                error: e.to_string(),
                message: i18n::translate(lang, e.i18n_key()).to_string(),
            }),
        )
    })?;

    report.user_id = claims.user_id.clone();
    report.submitted_at = Some(Utc::now());

    let id = db::create_shift_report(&state.pool, &report)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create shift report: {}", e);
            store_failure(&headers)
        })?;

    tracing::info!(
        "Shift report {} created by {} (house {}, {})",
        id,
        claims.user_id,
        report.house,
        report.shift_type.as_str()
    );
    Ok((StatusCode::CREATED, Json(CreatedReport { id })))
}

fn store_failure(headers: &HeaderMap) -> (StatusCode, Json<ValidationMessage>) {
    let lang = super::request_lang(headers);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ValidationMessage {
            error: "store failure".to_string(),
            message: i18n::translate(lang, "error.create_failed").to_string(),
        }),
    )
}
