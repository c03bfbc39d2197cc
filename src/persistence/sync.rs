//! Background leaderboard sync
//!
//! A worker thread owns the backend and runs jobs in the order they were
//! queued, so an upload always lands before the fetch queued after it. The
//! session drains finished jobs with [`LeaderboardSync::poll`] at the start
//! of each frame and replaces its [`LeaderboardState`] wholesale on success;
//! failures are logged and leave the state untouched.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use super::backend::LeaderboardBackend;
use super::error::StoreError;
use crate::highscores::{LeaderboardState, RemoteRecord};

/// Work handed to the sync thread
#[derive(Debug, Clone)]
pub enum SyncJob {
    Fetch,
    Upload(RemoteRecord),
}

impl SyncJob {
    pub fn kind(&self) -> JobKind {
        match self {
            SyncJob::Fetch => JobKind::Fetch,
            SyncJob::Upload(_) => JobKind::Upload,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Fetch,
    Upload,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobKind::Fetch => f.write_str("fetch"),
            JobKind::Upload => f.write_str("upload"),
        }
    }
}

/// Result of one job
#[derive(Debug)]
pub enum SyncOutcome {
    Fetched(RemoteRecord),
    /// The record that is now stored
    Uploaded(RemoteRecord),
    Failed { job: JobKind, error: StoreError },
}

fn run_job(backend: &dyn LeaderboardBackend, job: SyncJob) -> SyncOutcome {
    let kind = job.kind();
    let result = match job {
        SyncJob::Fetch => backend.fetch().map(SyncOutcome::Fetched),
        SyncJob::Upload(record) => backend.put(&record).map(|()| SyncOutcome::Uploaded(record)),
    };
    result.unwrap_or_else(|error| SyncOutcome::Failed { job: kind, error })
}

/// Handle to the sync thread
pub struct LeaderboardSync {
    jobs: Sender<SyncJob>,
    outcomes: Receiver<SyncOutcome>,
    in_flight: usize,
    fetches_in_flight: usize,
}

impl LeaderboardSync {
    /// Start the worker. It exits once this handle is dropped and its
    /// current job returns.
    pub fn spawn(backend: Box<dyn LeaderboardBackend>) -> Result<Self, StoreError> {
        let (job_tx, job_rx) = mpsc::channel::<SyncJob>();
        let (out_tx, out_rx) = mpsc::channel();

        thread::Builder::new()
            .name("leaderboard-sync".into())
            .spawn(move || {
                for job in job_rx {
                    log::debug!("leaderboard {} started", job.kind());
                    if out_tx.send(run_job(backend.as_ref(), job)).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            jobs: job_tx,
            outcomes: out_rx,
            in_flight: 0,
            fetches_in_flight: 0,
        })
    }

    /// Queue a fetch of the stored leaderboard
    pub fn request_fetch(&mut self) {
        if self.queue(SyncJob::Fetch) {
            self.fetches_in_flight += 1;
        }
    }

    /// Queue an upload of a finished run's record
    pub fn submit(&mut self, record: RemoteRecord) {
        self.queue(SyncJob::Upload(record));
    }

    fn queue(&mut self, job: SyncJob) -> bool {
        let kind = job.kind();
        if self.jobs.send(job).is_err() {
            log::warn!("Leaderboard worker gone, {kind} dropped");
            return false;
        }
        self.in_flight += 1;
        true
    }

    /// A fetch is still outstanding
    pub fn is_loading(&self) -> bool {
        self.fetches_in_flight > 0
    }

    /// No job is outstanding
    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }

    /// Apply every finished job without blocking. Returns how many were
    /// drained.
    pub fn poll(&mut self, board: &mut LeaderboardState) -> usize {
        let mut drained = 0;
        loop {
            match self.outcomes.try_recv() {
                Ok(outcome) => {
                    self.apply(outcome, board);
                    drained += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.worker_lost();
                    break;
                }
            }
        }
        drained
    }

    /// Block until every queued job has finished or `timeout` passes.
    /// Returns true if the queue drained.
    pub fn wait(&mut self, board: &mut LeaderboardState, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.is_idle() {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.outcomes.recv_timeout(left) {
                Ok(outcome) => self.apply(outcome, board),
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => {
                    self.worker_lost();
                    return false;
                }
            }
        }
        true
    }

    fn apply(&mut self, outcome: SyncOutcome, board: &mut LeaderboardState) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match outcome {
            SyncOutcome::Fetched(record) => {
                self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);
                *board = LeaderboardState::from_record(record);
                log::info!(
                    "Leaderboard loaded: personal best {}, {} global entries",
                    board.personal_best,
                    board.global.len()
                );
            }
            SyncOutcome::Uploaded(record) => {
                *board = LeaderboardState::from_record(record);
                log::info!(
                    "Score saved: personal best {}, {} global entries",
                    board.personal_best,
                    board.global.len()
                );
            }
            SyncOutcome::Failed { job, error } => {
                if job == JobKind::Fetch {
                    self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);
                }
                log::warn!("Leaderboard {job} failed: {error}");
            }
        }
    }

    fn worker_lost(&mut self) {
        if !self.is_idle() {
            log::warn!("Leaderboard worker stopped with {} jobs pending", self.in_flight);
        }
        self.in_flight = 0;
        self.fetches_in_flight = 0;
    }
}
