use crate::services::identity::IdentityProvider;
use sqlx::PgPool;
use std::sync::Arc;

pub struct AppState {
    pub pool: PgPool,
    pub identity: Arc<dyn IdentityProvider>,
    pub session_key: Vec<u8>,
}

pub type SharedState = Arc<AppState>;
