//! Leaderboard storage
//!
//! - `backend`: the remote JSONBin store and the local JSON file fallback
//! - `sync`: background worker so network calls never block the tick loop
//! - `error`: store failures

pub mod backend;
pub mod error;
pub mod sync;

pub use backend::{JsonBinBackend, LeaderboardBackend, LocalFileBackend, build_backend};
pub use error::StoreError;
pub use sync::{JobKind, LeaderboardSync, SyncJob, SyncOutcome};
