//! Background eviction of tracking sessions past their retention window.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::store::SessionStore;

/// Handle to the recurring sweep task.
///
/// The task runs for the lifetime of the process; `shutdown` exists so
/// tests (and a graceful exit path) can stop it deterministically.
pub struct Sweeper {
    handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
}

impl Sweeper {
    /// Spawn the sweep loop. Every `period`, sessions older than
    /// `retention` are evicted. A failed sweep is logged and the schedule
    /// continues with the next tick.
    pub fn spawn(store: Arc<dyn SessionStore>, period: Duration, retention: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // Skip the first tick which fires immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let now = Utc::now().timestamp_millis();
                        match store.sweep(now, retention).await {
                            Ok(removed) => {
                                if removed.is_empty() {
                                    debug!("sweep found no expired sessions");
                                }
                                for id in &removed {
                                    info!(tracking_id = %id, "evicted expired tracking session");
                                }
                            }
                            Err(err) => {
                                error!(error = %err, "expiry sweep failed, will retry next tick");
                            }
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            info!("sweeper received shutdown signal");
                            break;
                        }
                    }
                }
            }
        });

        Self {
            handle,
            shutdown_tx,
        }
    }

    /// Signal the sweep loop to stop.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Wait for the loop to exit after `shutdown`.
    pub async fn join(self) {
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, Session};
    use crate::store::{MemorySessionStore, StoreResult};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn sweeper_evicts_expired_sessions() {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let session = store.create("https://example.com").await;

        // Zero retention: anything with measurable age is expired.
        let sweeper = Sweeper::spawn(
            Arc::clone(&store),
            Duration::from_millis(20),
            Duration::from_millis(0),
        );

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(store.get(&session.id).await.unwrap().is_none());
        assert_eq!(store.len().await, 0);

        sweeper.shutdown();
        sweeper.join().await;
    }

    #[tokio::test]
    async fn sweeper_leaves_fresh_sessions_alone() {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let session = store.create("https://example.com").await;

        let sweeper = Sweeper::spawn(
            Arc::clone(&store),
            Duration::from_millis(20),
            Duration::from_secs(60),
        );

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(store.get(&session.id).await.unwrap().is_some());

        sweeper.shutdown();
        sweeper.join().await;
    }

    /// Store wrapper whose first few sweeps fail, to prove a failed sweep
    /// does not kill the schedule.
    struct FlakySweepStore {
        inner: MemorySessionStore,
        failures_left: AtomicUsize,
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl SessionStore for FlakySweepStore {
        async fn create(&self, target_url: &str) -> Session {
            self.inner.create(target_url).await
        }

        async fn get(&self, id: &str) -> Result<Option<Session>> {
            self.inner.get(id).await
        }

        async fn append_event(&self, id: &str, event: Event) -> StoreResult<()> {
            self.inner.append_event(id, event).await
        }

        async fn delete(&self, id: &str) -> Result<bool> {
            self.inner.delete(id).await
        }

        async fn len(&self) -> usize {
            self.inner.len().await
        }

        async fn sweep(&self, now_ms: i64, retention: Duration) -> Result<Vec<String>> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(anyhow!("injected sweep failure"));
            }
            self.inner.sweep(now_ms, retention).await
        }
    }

    #[tokio::test]
    async fn failed_sweep_does_not_stop_the_schedule() {
        let store = Arc::new(FlakySweepStore {
            inner: MemorySessionStore::new(),
            failures_left: AtomicUsize::new(2),
            attempts: AtomicUsize::new(0),
        });
        let session = store.create("https://example.com").await;

        let sweeper = Sweeper::spawn(
            store.clone(),
            Duration::from_millis(20),
            Duration::from_millis(0),
        );

        tokio::time::sleep(Duration::from_millis(300)).await;

        // The first two ticks errored, later ticks still ran and evicted.
        assert!(store.attempts.load(Ordering::SeqCst) > 2);
        assert!(store.get(&session.id).await.unwrap().is_none());

        sweeper.shutdown();
        sweeper.join().await;
    }
}
