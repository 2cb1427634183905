#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed threshold payload: {0}")]
    Payload(String),
}
