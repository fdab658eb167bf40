pub mod auth;
pub mod dashboard;
pub mod fields;
pub mod houses;
pub mod reports;
pub mod session;

use crate::i18n::Lang;
use crate::state::SharedState;
use axum::http::HeaderMap;
use axum::{routing::get, Router};

async fn health() -> &'static str {
    "OK"
}

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth::router(state.clone()))
        .nest("/fields", fields::router(state.clone()))
        .nest("/reports", reports::router(state.clone()))
        .nest("/houses", houses::router(state.clone()))
        .nest("/dashboard", dashboard::router(state))
}

/// Pick the response language: an explicit `X-Lang` header wins, then the
/// first Accept-Language entry, then the Hebrew default.
pub fn request_lang(headers: &HeaderMap) -> Lang {
    if let Some(value) = headers.get("x-lang").and_then(|v| v.to_str().ok()) {
        if let Some(lang) = Lang::from_code(value) {
            return lang;
        }
    }
    headers
        .get(axum::http::header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            v.split(',')
                .filter_map(|part| Lang::from_code(part.split(';').next().unwrap_or("")))
                .next()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_negotiation_prefers_explicit_header() {
        let mut headers = HeaderMap::new();
        headers.insert("accept-language", "en-US,en;q=0.9".parse().unwrap());
        assert_eq!(request_lang(&headers), Lang::En);

        headers.insert("x-lang", "he".parse().unwrap());
        assert_eq!(request_lang(&headers), Lang::He);

        let empty = HeaderMap::new();
        assert_eq!(request_lang(&empty), Lang::He);
    }
}
