//! Anonymous browser sessions.
//!
//! Every request gets a session id from the `radio_session` cookie. A
//! missing or malformed cookie starts a new session, and the response
//! carries the cookie back.

use super::state::ServerState;
use crate::config::MAX_DURATION_SEC;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use tracing::{debug, error};
use uuid::Uuid;

pub const COOKIE_SESSION_KEY: &str = "radio_session";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Response extension telling the session layer not to re-issue the cookie.
#[derive(Debug, Clone, Copy)]
pub struct SessionEnded;

pub enum SessionExtractionError {
    Missing,
}

impl IntoResponse for SessionExtractionError {
    fn into_response(self) -> Response {
        match self {
            SessionExtractionError::Missing => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SessionId {
    type Rejection = SessionExtractionError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionId>()
            .cloned()
            .ok_or(SessionExtractionError::Missing)
    }
}

fn session_from_cookie(jar: &CookieJar) -> Option<SessionId> {
    let value = jar.get(COOKIE_SESSION_KEY).map(Cookie::value)?;
    Uuid::parse_str(value)
        .ok()
        .map(|uuid| SessionId(uuid.to_string()))
}

pub fn session_cookie(session_id: &SessionId, max_age_sec: u64) -> Cookie<'static> {
    Cookie::build((COOKIE_SESSION_KEY, session_id.0.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            max_age_sec.min(MAX_DURATION_SEC) as i64,
        ))
        .build()
}

pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build((COOKIE_SESSION_KEY, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .expires(time::OffsetDateTime::now_utc() - time::Duration::days(1))
        .build()
}

pub async fn track_session(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let (session_id, is_new) = match session_from_cookie(&jar) {
        Some(session_id) => (session_id, false),
        None => {
            let session_id = SessionId(Uuid::new_v4().to_string());
            debug!("Starting session {}", session_id.as_str());
            (session_id, true)
        }
    };

    if let Err(err) = state
        .profile_store
        .touch_session(session_id.as_str(), Utc::now())
    {
        error!("Failed to record session {}: {:#}", session_id.as_str(), err);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    request.extensions_mut().insert(session_id.clone());
    let mut response = next.run(request).await;

    let ended = response.extensions().get::<SessionEnded>().is_some();
    if is_new && !ended {
        let cookie = session_cookie(&session_id, state.config.session_max_age_sec);
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(err) => error!("Invalid session cookie: {}", err),
        }
    }
    response
}
