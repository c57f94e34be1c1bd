//! Toggle client with the cache-refresh lifecycle.
//!
//! The client owns the snapshot cache and a background refresh task. The
//! first load runs in the caller's context via [`ToggleClient::initialise`];
//! after that the background task repeats the fetch-parse-replace cycle on a
//! fixed interval until shut down, reporting each outcome on a capacity-1
//! updates channel.

use crate::error::{ClientError, ClientResult};
use crate::snapshot::{self, SnapshotCache};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use togglekit_common::{paths, AppName};
use togglekit_store::{EtcdStore, StoreError, StoreGateway};
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Outcome of one background refresh cycle, delivered on the updates channel.
pub type RefreshOutcome = Result<(), StoreError>;

/// Feature-toggle client for one application.
///
/// Starts in the uninitialized state: every lookup misses until
/// [`initialise`](Self::initialise) completes its first load. Lookups are
/// lock-free and always observe one complete snapshot; the background task
/// replaces the snapshot with a single atomic swap, so concurrent readers
/// never see a mix of two refresh generations.
#[derive(Debug)]
pub struct ToggleClient<G = EtcdStore> {
    app: AppName,
    toggle_path: String,
    refresh_interval: Duration,
    gateway: Arc<G>,
    cache: Arc<SnapshotCache>,
    updates_tx: mpsc::Sender<RefreshOutcome>,
    updates_rx: Mutex<Option<mpsc::Receiver<RefreshOutcome>>>,
    shutdown_tx: broadcast::Sender<()>,
    running: Arc<RwLock<bool>>,
}

impl ToggleClient<EtcdStore> {
    /// Creates a client reading toggles for `app` from the given etcd
    /// endpoints, refreshing every `refresh_interval_secs` seconds.
    pub fn new(
        endpoints: Vec<String>,
        app: &str,
        refresh_interval_secs: u64,
    ) -> ClientResult<Self> {
        let gateway = EtcdStore::new(&endpoints)?;
        Self::with_gateway(gateway, app, refresh_interval_secs)
    }
}

impl<G: StoreGateway + 'static> ToggleClient<G> {
    /// Creates a client over an arbitrary store gateway.
    ///
    /// The refresh interval must be at least one second; the application name
    /// must be non-empty and free of `/`.
    pub fn with_gateway(gateway: G, app: &str, refresh_interval_secs: u64) -> ClientResult<Self> {
        if refresh_interval_secs == 0 {
            return Err(ClientError::Config(
                "refresh interval must be at least one second".to_string(),
            ));
        }
        let app = AppName::new(app)?;
        let toggle_path = paths::toggle_path(&app);

        // Capacity 1: the worker's send waits until the previous outcome has
        // been drained, so an ignored channel stalls the next cycle rather
        // than piling up outcomes.
        let (updates_tx, updates_rx) = mpsc::channel(1);
        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Self {
            app,
            toggle_path,
            refresh_interval: Duration::from_secs(refresh_interval_secs),
            gateway: Arc::new(gateway),
            cache: Arc::new(SnapshotCache::empty()),
            updates_tx,
            updates_rx: Mutex::new(Some(updates_rx)),
            shutdown_tx,
            running: Arc::new(RwLock::new(false)),
        })
    }

    /// The application whose toggles this client serves.
    pub fn app(&self) -> &AppName {
        &self.app
    }

    /// The configured refresh interval.
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// The underlying store gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Whether the background refresh loop is running.
    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    /// Takes the receiving end of the updates channel.
    ///
    /// Each background refresh delivers one [`RefreshOutcome`] here. The
    /// channel holds a single outcome; a client that takes the receiver and
    /// stops draining it will stall its own refresh loop on the following
    /// cycle. Returns `None` after the first call.
    pub fn updates(&self) -> Option<mpsc::Receiver<RefreshOutcome>> {
        self.updates_rx
            .lock()
            .ok()
            .and_then(|mut slot| slot.take())
    }

    /// Performs the first load and starts the background refresh loop.
    ///
    /// The first fetch-parse-replace cycle runs in the caller's context; on
    /// failure the error is returned, no snapshot is installed and no
    /// background task is started. Callers retry by calling `initialise`
    /// again.
    pub async fn initialise(&self) -> ClientResult<()> {
        {
            let mut running = self.running.write().await;
            if *running {
                return Err(ClientError::AlreadyInitialised);
            }

            refresh_once(self.gateway.as_ref(), &self.toggle_path, &self.cache).await?;
            *running = true;
        }

        info!(app = %self.app, interval = ?self.refresh_interval, "toggle client initialised");
        self.spawn_refresh_loop();
        Ok(())
    }

    /// Signals the background refresh loop to stop.
    ///
    /// The loop exits between ticks; an in-flight store fetch is not aborted.
    /// Lookups keep serving the last installed snapshot. Idempotent.
    pub async fn shutdown(&self) {
        let mut running = self.running.write().await;
        if !*running {
            return;
        }
        *running = false;

        // No receiver means the loop already exited on its own.
        let _ = self.shutdown_tx.send(());
        info!(app = %self.app, "toggle client shut down");
    }

    /// Looks up a flag in the current snapshot.
    ///
    /// Non-blocking; returns `None` for flags absent from the last good
    /// snapshot, including every name before `initialise` completes. A stale
    /// snapshot is served over no data: lookups cannot tell "flag not found"
    /// from "store unreachable".
    pub fn get(&self, name: &str) -> Option<bool> {
        self.cache.load().get(name)
    }

    /// Looks up a flag, falling back to `default` when it is absent.
    pub fn get_or_default(&self, name: &str, default: bool) -> bool {
        self.get(name).unwrap_or(default)
    }

    fn spawn_refresh_loop(&self) {
        let gateway = Arc::clone(&self.gateway);
        let cache = Arc::clone(&self.cache);
        let path = self.toggle_path.clone();
        let updates = self.updates_tx.clone();
        let mut shutdown = self.shutdown_tx.subscribe();
        let period = self.refresh_interval;

        tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            // Ticks missed while a send was blocked are skipped, not bursted.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let outcome = refresh_once(gateway.as_ref(), &path, &cache).await;
                        if let Err(err) = &outcome {
                            warn!(error = %err, "background refresh failed");
                        }

                        tokio::select! {
                            sent = updates.send(outcome) => {
                                if sent.is_err() {
                                    // Receiver was taken and dropped; keep
                                    // refreshing so lookups stay warm.
                                    debug!("refresh outcome had no listener");
                                }
                            }
                            _ = shutdown.recv() => break,
                        }
                    }
                    _ = shutdown.recv() => break,
                }
            }

            debug!("refresh loop stopped");
        });
    }
}

/// Runs one fetch-parse-replace cycle.
///
/// The snapshot is installed only after the whole tree has been parsed, with
/// a single atomic swap; on error the previous snapshot stays in place.
async fn refresh_once<G: StoreGateway>(
    gateway: &G,
    path: &str,
    cache: &SnapshotCache,
) -> RefreshOutcome {
    let tree = gateway.fetch_tree(path).await?;
    let parsed = snapshot::parse_tree(&tree);
    debug!(flags = parsed.len(), "installing new flag snapshot");
    cache.replace(parsed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use togglekit_store::{Node, StoreResult};

    #[derive(Debug)]
    struct NeverStore;

    #[async_trait]
    impl StoreGateway for NeverStore {
        async fn fetch_tree(&self, _path: &str) -> StoreResult<Node> {
            unreachable!("construction tests never fetch")
        }
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = ToggleClient::with_gateway(NeverStore, "checkout", 0).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_rejects_invalid_app_name() {
        let err = ToggleClient::with_gateway(NeverStore, "a/b", 30).unwrap_err();
        assert!(matches!(err, ClientError::AppName(_)));

        let err = ToggleClient::with_gateway(NeverStore, "", 30).unwrap_err();
        assert!(matches!(err, ClientError::AppName(_)));
    }

    #[test]
    fn test_construction_inputs_are_kept() {
        let client = ToggleClient::with_gateway(NeverStore, "checkout", 30).unwrap();
        assert_eq!(client.app().as_str(), "checkout");
        assert_eq!(client.refresh_interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_updates_receiver_can_be_taken_once() {
        let client = ToggleClient::with_gateway(NeverStore, "checkout", 30).unwrap();
        assert!(client.updates().is_some());
        assert!(client.updates().is_none());
    }

    #[test]
    fn test_lookups_miss_before_initialise() {
        let client = ToggleClient::with_gateway(NeverStore, "checkout", 30).unwrap();
        assert_eq!(client.get("anything"), None);
        assert!(client.get_or_default("anything", true));
        assert!(!client.get_or_default("anything", false));
    }
}
