/// Domain failures surfaced to the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
