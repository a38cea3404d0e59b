use axum::http::header::RETRY_AFTER;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use vidsqueeze_core::error::CoreError;

/// Seconds a client should wait before retrying an overloaded upstream.
pub const RETRY_AFTER_SECS: u64 = 30;

/// Message returned in place of anything that could leak internals.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Postgres SQLSTATE for a unique violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Error type returned by every handler.
///
/// Domain failures arrive as [`CoreError`]; the remaining variants describe
/// what went wrong at the HTTP edge. Every variant renders as
/// `{"error": <message>, "code": <CODE>}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed or incomplete request; the message is shown as is.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An external service this endpoint needs is not configured.
    #[error("{0} is not configured")]
    Config(&'static str),

    /// An external service call failed. The message is shown to the client;
    /// the detail is only logged.
    #[error("{message}: {detail}")]
    Upstream { message: String, detail: String },

    /// An external service is temporarily overloaded.
    #[error("{0}")]
    Overloaded(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl AppError {
    /// Status, machine code and client-facing message. Logs whatever is
    /// withheld from the client.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(CoreError::Unauthorized(msg)) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Database(err) => database_parts(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Config(service) => {
                tracing::error!(service = %service, "Required service is not configured");
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR", self.to_string())
            }
            AppError::Upstream { message, detail } => {
                tracing::error!(error = %detail, "{message}");
                (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR", message.clone())
            }
            AppError::Overloaded(msg) => {
                tracing::warn!("{msg}");
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_OVERLOADED", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.parts();
        let body = Json(ErrorBody { error, code });

        match self {
            AppError::Overloaded(_) => (
                status,
                [(RETRY_AFTER, RETRY_AFTER_SECS.to_string())],
                body,
            )
                .into_response(),
            _ => (status, body).into_response(),
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

/// Missing rows are 404 and a second record for an already-recorded asset is
/// 409. Any other database failure is logged and sanitized.
fn database_parts(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if let sqlx::Error::RowNotFound = err {
        return (StatusCode::NOT_FOUND, "NOT_FOUND", "Video not found".to_string());
    }

    let duplicate_asset = err.as_database_error().is_some_and(|db| {
        db.code().as_deref() == Some(UNIQUE_VIOLATION)
            && db.constraint() == Some("uq_videos_public_id")
    });
    if duplicate_asset {
        return (
            StatusCode::CONFLICT,
            "CONFLICT",
            "This asset is already recorded".to_string(),
        );
    }

    tracing::error!(error = %err, "Database error");
    internal()
}
