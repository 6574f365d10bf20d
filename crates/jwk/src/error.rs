#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("JWK serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
