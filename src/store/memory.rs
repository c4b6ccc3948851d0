use crate::models::{Event, Session};
use crate::store::{generate_tracking_id, SessionStore, StoreError, StoreResult};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::time::Duration;

/// In-memory session table backed by a sharded concurrent map.
///
/// Per-key locking gives the required mutual exclusion: appends to one
/// session hold that shard's write guard, so concurrent appends serialize
/// without blocking work on other sessions, and reads never observe a
/// partially written record.
pub struct MemorySessionStore {
    sessions: DashMap<String, Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, target_url: &str) -> Session {
        let session = Session {
            id: generate_tracking_id(),
            target_url: target_url.to_string(),
            created_at: Utc::now().timestamp_millis(),
            events: Vec::new(),
        };
        self.sessions.insert(session.id.clone(), session.clone());
        session
    }

    async fn get(&self, id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.get(id).map(|entry| entry.value().clone()))
    }

    async fn append_event(&self, id: &str, event: Event) -> StoreResult<()> {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                entry.events.push(event);
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.sessions.remove(id).is_some())
    }

    async fn len(&self) -> usize {
        self.sessions.len()
    }

    async fn sweep(&self, now_ms: i64, retention: Duration) -> Result<Vec<String>> {
        let retention_ms = retention.as_millis() as i64;
        let mut removed = Vec::new();
        self.sessions.retain(|id, session| {
            let expired = now_ms - session.created_at > retention_ms;
            if expired {
                removed.push(id.clone());
            }
            !expired
        });
        Ok(removed)
    }
}
