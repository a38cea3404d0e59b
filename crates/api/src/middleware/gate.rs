//! Access-control gate.
//!
//! Runs ahead of every application route (the health endpoint is mounted
//! outside it). Static assets pass straight through. For everything else the
//! caller's session is resolved once, the [`AccessPolicy`] decision table is
//! applied, and the request either continues with a [`Session`] in its
//! extensions or is answered with a `307 Temporary Redirect`.
//!
//! [`AccessPolicy`]: vidsqueeze_core::access::AccessPolicy

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use vidsqueeze_core::access::RouteClass;

use crate::auth::session::Session;
use crate::state::AppState;

pub async fn access_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let policy = &state.config.access;
    let path = request.uri().path().to_owned();

    if policy.classify(&path) == RouteClass::StaticAsset {
        return next.run(request).await;
    }

    let session = state.sessions.resolve(request.headers());
    let decision = policy.decide(&path, session.is_authenticated());

    if let Some(target) = policy.redirect_target(decision) {
        tracing::debug!(%path, redirect_to = target, ?decision, "Access gate redirect");
        return Redirect::temporary(target).into_response();
    }

    request.extensions_mut().insert::<Session>(session);
    next.run(request).await
}
