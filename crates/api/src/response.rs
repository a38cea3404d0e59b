//! Shared response bodies for API handlers.

use serde::Serialize;

/// `{ "message": ... }` body used for outcomes that are not errors.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}
