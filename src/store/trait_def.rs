use crate::models::{Event, Session};
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("tracking id not found")]
    NotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Concurrency-safe table of live tracking sessions.
///
/// The store exclusively owns all session and event data; callers get
/// request-scoped copies. Mutations on different sessions proceed
/// independently, and appends to the same session are serialized in
/// acceptance order.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Mint a fresh tracking id and store a new session for `target_url`
    /// with an empty event log. Always succeeds.
    async fn create(&self, target_url: &str) -> Session;

    /// Look up a session by id, reflecting the latest concurrent state.
    async fn get(&self, id: &str) -> Result<Option<Session>>;

    /// Append an event to an existing session's log. Never creates a
    /// session implicitly.
    async fn append_event(&self, id: &str, event: Event) -> StoreResult<()>;

    /// Remove a session. Returns `false` if the id was unknown.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Number of live sessions, for status reporting.
    async fn len(&self) -> usize;

    /// Remove every session whose age at `now_ms` exceeds `retention`.
    /// Returns the removed ids for logging.
    async fn sweep(&self, now_ms: i64, retention: Duration) -> Result<Vec<String>>;
}
