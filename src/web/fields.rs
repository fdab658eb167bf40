use crate::db;
use crate::domain::form;
use crate::domain::models::ShiftType;
use crate::domain::schema::{to_field_id, FieldDescriptor, FieldKind, Section};
use crate::state::SharedState;
use crate::web::session::UserSession;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPayload {
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub section: Section,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub shift_types: Vec<ShiftType>,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub placeholder: Option<String>,
}

#[derive(Serialize)]
pub struct CreatedField {
    pub id: String,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(list_fields))
        .route("/", post(create_field))
        .route("/:id", get(get_field))
        .route("/:id", put(update_field))
        .route("/:id", delete(delete_field))
        .with_state(state)
}

/// Schema editing requires a manager or admin role, read fresh from the
/// profile document so a revoked role takes effect before the session
/// cookie expires.
async fn require_editor(state: &SharedState, user_id: &str) -> Result<(), StatusCode> {
    let profile = db::get_user(&state.pool, user_id)
        .await
        .map_err(|e| {
            tracing::error!("Role lookup failed for {}: {}", user_id, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !profile.role.can_edit_schema() {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(())
}

/// Every signed-in user may read the schema; the capture form needs it.
async fn list_fields(
    UserSession(_claims): UserSession,
    State(state): State<SharedState>,
) -> Result<Json<Vec<FieldDescriptor>>, StatusCode> {
    let fields = db::get_all_form_fields(&state.pool).await.map_err(|e| {
        tracing::error!("Failed to fetch form fields: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(fields))
}

async fn get_field(
    UserSession(_claims): UserSession,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<FieldDescriptor>, StatusCode> {
    let field = db::get_form_field(&state.pool, &id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(field))
}

/// Create a descriptor. The id is a slug derived from the label here, once;
/// later label edits never regenerate it. Two labels that slug to the same
/// id are a conflict, not a silent overwrite.
async fn create_field(
    UserSession(claims): UserSession,
    State(state): State<SharedState>,
    Json(payload): Json<FieldPayload>,
) -> Result<(StatusCode, Json<CreatedField>), StatusCode> {
    require_editor(&state, &claims.user_id).await?;

    let id = to_field_id(&payload.label);
    // A label slugging to one of the report's fixed wire keys would shadow
    // that field on submission; refuse it like an empty slug.
    if id.is_empty() || form::is_reserved_field_id(&id) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let existing = db::get_form_field(&state.pool, &id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if existing.is_some() {
        return Err(StatusCode::CONFLICT);
    }

    let field = descriptor_from_payload(id.clone(), payload);
    db::create_form_field(&state.pool, &field).await.map_err(|e| {
        tracing::error!("Failed to create form field {}: {}", id, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    tracing::info!("Form field {} created by {}", id, claims.user_id);
    Ok((StatusCode::CREATED, Json(CreatedField { id })))
}

/// Update in place. The path id stays the document id regardless of how the
/// label changes.
async fn update_field(
    UserSession(claims): UserSession,
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<FieldPayload>,
) -> Result<Json<FieldDescriptor>, StatusCode> {
    require_editor(&state, &claims.user_id).await?;

    let field = descriptor_from_payload(id.clone(), payload);
    let updated = db::update_form_field(&state.pool, &field)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update form field {}: {}", id, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    if !updated {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(field))
}

async fn delete_field(
    UserSession(claims): UserSession,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    require_editor(&state, &claims.user_id).await?;

    let deleted = db::delete_form_field(&state.pool, &id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if !deleted {
        return Err(StatusCode::NOT_FOUND);
    }
    tracing::info!("Form field {} deleted by {}", id, claims.user_id);
    Ok(StatusCode::NO_CONTENT)
}

fn descriptor_from_payload(id: String, payload: FieldPayload) -> FieldDescriptor {
    FieldDescriptor {
        id,
        label: payload.label,
        kind: payload.kind,
        section: payload.section,
        required: payload.required,
        shift_types: payload.shift_types,
        order: payload.order,
        placeholder: payload.placeholder.filter(|p| !p.is_empty()),
    }
}
