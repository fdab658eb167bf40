use crate::db;
use crate::domain::models::{UserProfile, UserRole};
use crate::services::identity::IdentityError;
use crate::state::SharedState;
use crate::web::session::{self, UserSession};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub id_token: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user_id: String,
    pub display_name: String,
    pub role: UserRole,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .with_state(state)
}

/// Exchange a provider ID token for a session cookie. Every successful
/// sign-in also upserts the cached profile document with the latest
/// identity fields; the stored role is left untouched.
async fn login(
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let identity = state.identity.verify(&payload.id_token).await.map_err(|e| {
        match e {
            IdentityError::Rejected => {
                tracing::warn!("Sign-in rejected by identity provider");
                StatusCode::UNAUTHORIZED
            }
            IdentityError::Unreachable(err) => {
                tracing::error!("Identity provider unreachable: {}", err);
                StatusCode::BAD_GATEWAY
            }
        }
    })?;

    db::upsert_user_profile(
        &state.pool,
        &identity.uid,
        identity.display_name.as_deref().unwrap_or(""),
        identity.email.as_deref().unwrap_or(""),
        identity.photo_url.as_deref().unwrap_or(""),
    )
    .await
    .map_err(|e| {
        tracing::error!("Profile upsert failed for {}: {}", identity.uid, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let profile = db::get_user(&state.pool, &identity.uid)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    let token = session::sign_session(&identity.uid, profile.role, &state.session_key)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::SET_COOKIE,
        format!("session={token}; HttpOnly; SameSite=Lax; Path=/")
            .parse()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
    );

    tracing::info!("User {} signed in", identity.uid);

    Ok((
        headers,
        Json(LoginResponse {
            user_id: profile.id,
            display_name: profile.display_name,
            role: profile.role,
        }),
    ))
}

async fn logout() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    // Expire the cookie immediately; there is no server-side session list.
    if let Ok(value) = "session=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0".parse() {
        headers.insert(axum::http::header::SET_COOKIE, value);
    }
    (headers, StatusCode::NO_CONTENT)
}

async fn me(
    UserSession(claims): UserSession,
    State(state): State<SharedState>,
) -> Result<Json<UserProfile>, StatusCode> {
    let profile = db::get_user(&state.pool, &claims.user_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(profile))
}
