//! Leaderboard store backends

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use super::error::StoreError;
use crate::highscores::RemoteRecord;
use crate::settings::{BackendKind, LeaderboardSettings};

/// A keyed store holding one [`RemoteRecord`]
#[cfg_attr(test, mockall::automock)]
pub trait LeaderboardBackend: Send {
    /// Read the current record
    fn fetch(&self) -> Result<RemoteRecord, StoreError>;
    /// Replace the stored record
    fn put(&self, record: &RemoteRecord) -> Result<(), StoreError>;
}

/// JSONBin v3 bin
pub struct JsonBinBackend {
    client: Client,
    url: String,
    api_key: String,
    timeout: Duration,
}

/// GET responses wrap the stored document
#[derive(Deserialize)]
struct BinEnvelope {
    #[serde(default)]
    record: RemoteRecord,
}

impl JsonBinBackend {
    pub const BASE_URL: &'static str = "https://api.jsonbin.io/v3/b";

    /// `timeout` applies to reads; writes get twice as long
    pub fn new(bin_id: &str, api_key: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .user_agent(concat!("run-it/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: format!("{}/{}", Self::BASE_URL, bin_id),
            api_key: api_key.to_string(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl LeaderboardBackend for JsonBinBackend {
    fn fetch(&self) -> Result<RemoteRecord, StoreError> {
        let resp = self
            .client
            .get(&self.url)
            .header("X-Master-Key", &self.api_key)
            .timeout(self.timeout)
            .send()?;
        if !resp.status().is_success() {
            return Err(StoreError::Status(resp.status().as_u16()));
        }
        let body = resp.text()?;
        let envelope: BinEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.record)
    }

    fn put(&self, record: &RemoteRecord) -> Result<(), StoreError> {
        let resp = self
            .client
            .put(&self.url)
            .header("X-Master-Key", &self.api_key)
            .json(record)
            .timeout(self.timeout * 2)
            .send()?;
        if !resp.status().is_success() {
            return Err(StoreError::Status(resp.status().as_u16()));
        }
        Ok(())
    }
}

/// Record kept in a JSON file on disk
pub struct LocalFileBackend {
    path: PathBuf,
}

impl LocalFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LeaderboardBackend for LocalFileBackend {
    /// A missing file reads as an empty record
    fn fetch(&self) -> Result<RemoteRecord, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(RemoteRecord::default()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    /// Write to a sibling temp file, then rename over the record
    fn put(&self, record: &RemoteRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(record)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Backend selected by the settings, or `None` when the leaderboard is off
pub fn build_backend(settings: &LeaderboardSettings) -> Option<Box<dyn LeaderboardBackend>> {
    match settings.backend {
        BackendKind::Disabled => {
            log::info!("Leaderboard disabled");
            None
        }
        BackendKind::LocalFile => {
            log::info!("Leaderboard stored in {}", settings.local_path.display());
            Some(Box::new(LocalFileBackend::new(&settings.local_path)))
        }
        BackendKind::JsonBin => {
            if settings.jsonbin_bin_id.is_empty() || settings.jsonbin_api_key.is_empty() {
                log::warn!("JSONBin backend selected without bin id or key, leaderboard disabled");
                return None;
            }
            let timeout = Duration::from_secs(settings.timeout_secs);
            match JsonBinBackend::new(&settings.jsonbin_bin_id, &settings.jsonbin_api_key, timeout)
            {
                Ok(backend) => {
                    log::info!("Leaderboard at {}", backend.url());
                    Some(Box::new(backend))
                }
                Err(e) => {
                    log::warn!("Failed to set up HTTP client: {e}");
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScoreEntry;
    use tempfile::TempDir;

    fn record() -> RemoteRecord {
        RemoteRecord {
            player_name: "ANNA".into(),
            personal_highscore: 250,
            global_rankings: vec![HighScoreEntry::new("ANNA", 250, 3, 20.0, 9, "2024-05-01 10:00")],
            last_updated: "2024-05-01 10:00".into(),
        }
    }

    #[test]
    fn test_local_missing_file_is_empty() {
        let dir = TempDir::new().expect("temp dir");
        let backend = LocalFileBackend::new(dir.path().join("none.json"));
        assert_eq!(backend.fetch().expect("fetch"), RemoteRecord::default());
    }

    #[test]
    fn test_local_put_then_fetch() {
        let dir = TempDir::new().expect("temp dir");
        let backend = LocalFileBackend::new(dir.path().join("nested/board.json"));
        backend.put(&record()).expect("put");
        assert_eq!(backend.fetch().expect("fetch"), record());
        assert!(!dir.path().join("nested/board.json.tmp").exists());
    }

    #[test]
    fn test_local_corrupt_file_is_json_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("board.json");
        fs::write(&path, "{not json").expect("write");
        let backend = LocalFileBackend::new(&path);
        assert!(matches!(backend.fetch(), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_envelope_unwraps_record() {
        let body = r#"{"record": {"personal_highscore": 7, "global_rankings": []}, "metadata": {}}"#;
        let envelope: BinEnvelope = serde_json::from_str(body).expect("parse");
        assert_eq!(envelope.record.personal_highscore, 7);
    }

    #[test]
    fn test_build_backend_selection() {
        let mut settings = LeaderboardSettings::default();
        assert!(build_backend(&settings).is_some());

        settings.backend = BackendKind::Disabled;
        assert!(build_backend(&settings).is_none());

        // JSONBin without credentials falls back to no leaderboard
        settings.backend = BackendKind::JsonBin;
        assert!(build_backend(&settings).is_none());
    }

    #[test]
    fn test_jsonbin_url() {
        let backend = JsonBinBackend::new("abc123", "key", Duration::from_secs(5)).expect("client");
        assert_eq!(backend.url(), "https://api.jsonbin.io/v3/b/abc123");
    }
}
