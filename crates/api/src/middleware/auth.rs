//! Session-based authentication extractors for Axum handlers.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vidsqueeze_core::error::CoreError;

use crate::auth::session::Session;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller.
///
/// Read from the [`Session`] the access gate attached to the request. On a
/// route that is not behind the gate the session is resolved from the
/// request headers instead.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The identity provider's user id (from `claims.sub`).
    pub user_id: String,
    /// The identity provider's session id, when the token carries one.
    pub session_id: Option<String>,
}

impl AuthUser {
    fn from_session(session: &Session) -> Option<Self> {
        session.claims().map(|claims| AuthUser {
            user_id: claims.sub.clone(),
            session_id: claims.sid.clone(),
        })
    }
}

fn session_of(parts: &Parts, state: &AppState) -> Session {
    match parts.extensions.get::<Session>() {
        Some(session) => session.clone(),
        None => state.sessions.resolve(&parts.headers),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        AuthUser::from_session(&session_of(parts, state)).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Authentication required".into()))
        })
    }
}

/// The caller if signed in; never rejects.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(AuthUser::from_session(&session_of(parts, state))))
    }
}
