use thiserror::Error;

/// Failure talking to a leaderboard store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store answered with status {0}")]
    Status(u16),
    #[error("leaderboard record JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("leaderboard file: {0}")]
    Io(#[from] std::io::Error),
}
