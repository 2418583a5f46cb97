//! Single-file watcher built on the notify crate
//!
//! The parent directory is watched non-recursively so the watch outlives
//! editors that save by replacing the file. Only modification events whose
//! path is exactly the watched file are forwarded.

use crate::{
    config::{RecoveryConfig, WatcherConfig},
    debouncer::{DebounceGate, EventDebouncer},
    events::{ChangeKind, FileChange},
};
use notify::{
    Config as NotifyConfig, Event as NotifyEvent, RecommendedWatcher, RecursiveMode,
    Watcher as NotifyWatcher,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};
use txtmon_core::error::{Error, Result};

/// Watches one file and yields debounced change notifications
pub struct FileWatcher {
    /// Configuration
    config: Arc<WatcherConfig>,
    /// Recovery configuration
    recovery_config: Arc<RecoveryConfig>,
    /// Active notify watcher
    watcher: Option<RecommendedWatcher>,
    /// Canonical path of the watched file
    watched_path: Option<PathBuf>,
    /// Gate shared with the event processor
    gate: Option<Arc<DebounceGate>>,
    /// Cancellation token for stopping background tasks
    cancellation_token: CancellationToken,
}

impl FileWatcher {
    /// Create a new file watcher
    pub fn new(config: WatcherConfig) -> Result<Self> {
        if config.max_queue_size == 0 {
            return Err(Error::watcher("max_queue_size must be greater than 0"));
        }

        Ok(Self {
            config: Arc::new(config),
            recovery_config: Arc::new(RecoveryConfig::default()),
            watcher: None,
            watched_path: None,
            gate: None,
            cancellation_token: CancellationToken::new(),
        })
    }

    /// Start watching a file
    ///
    /// Returns a receiver of notifications that passed the debounce gate.
    pub async fn watch(&mut self, path: impl AsRef<Path>) -> Result<mpsc::Receiver<FileChange>> {
        if let Some(current) = &self.watched_path {
            return Err(Error::watcher(format!(
                "Already watching {}",
                current.display()
            )));
        }

        let path = path.as_ref();
        let target = tokio::fs::canonicalize(path)
            .await
            .map_err(|e| Error::file_access(path, e))?;
        let parent = target
            .parent()
            .ok_or_else(|| {
                Error::invalid_input(format!("{} has no parent directory", target.display()))
            })?
            .to_path_buf();

        // Create channels
        let (notify_tx, notify_rx) = mpsc::channel(self.config.max_queue_size);
        let (debounced_tx, debounced_rx) = mpsc::channel(self.config.max_queue_size);

        let debouncer = EventDebouncer::new(self.config.debounce_duration(), debounced_tx);
        self.gate = Some(debouncer.gate());

        self.start_event_processor(notify_rx, debouncer, target.clone());

        let mut watcher = self.init_watcher_with_retry(notify_tx).await?;
        watcher
            .watch(&parent, RecursiveMode::NonRecursive)
            .map_err(|e| Error::watcher(format!("Failed to watch path {parent:?}: {e}")))?;

        info!(
            "Watching {:?} (debounce {:?})",
            target,
            self.config.debounce_duration()
        );

        self.watcher = Some(watcher);
        self.watched_path = Some(target);

        Ok(debounced_rx)
    }

    /// Initialize notify watcher with retry logic
    async fn init_watcher_with_retry(
        &self,
        tx: mpsc::Sender<NotifyEvent>,
    ) -> Result<RecommendedWatcher> {
        let mut attempts = 0;
        let max_attempts = self.recovery_config.max_init_retries;

        loop {
            attempts += 1;

            match self.create_notify_watcher(tx.clone()) {
                Ok(watcher) => {
                    debug!("Notify watcher initialized");
                    return Ok(watcher);
                }
                Err(e) if attempts < max_attempts => {
                    warn!(
                        "Failed to initialize watcher (attempt {}/{}): {}",
                        attempts, max_attempts, e
                    );
                    tokio::time::sleep(Duration::from_millis(self.recovery_config.retry_delay_ms))
                        .await;
                }
                Err(e) => {
                    error!("Failed to initialize watcher after {} attempts", attempts);
                    return Err(Error::watcher(format!(
                        "Watcher initialization failed: {e}"
                    )));
                }
            }
        }
    }

    /// Create a notify watcher whose callback never blocks
    fn create_notify_watcher(&self, tx: mpsc::Sender<NotifyEvent>) -> Result<RecommendedWatcher> {
        let config = NotifyConfig::default()
            .with_poll_interval(self.config.poll_interval())
            .with_compare_contents(false);

        RecommendedWatcher::new(
            move |res: std::result::Result<NotifyEvent, notify::Error>| match res {
                Ok(event) => {
                    if let Err(e) = tx.try_send(event) {
                        warn!("Failed to queue notify event: {}", e);
                    }
                }
                Err(e) => {
                    error!("Notify error: {}", e);
                }
            },
            config,
        )
        .map_err(|e| Error::watcher(format!("Failed to create watcher: {e}")))
    }

    /// Start the event processor
    fn start_event_processor(
        &self,
        mut notify_rx: mpsc::Receiver<NotifyEvent>,
        debouncer: EventDebouncer,
        target: PathBuf,
    ) {
        let cancel_token = self.cancellation_token.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    event = notify_rx.recv() => {
                        let Some(event) = event else { break };
                        trace!("Received notify event: {:?}", event);
                        if let Some(change) = Self::convert_notify_event(&event, &target) {
                            debouncer.process_event(change).await;
                        }
                    }
                }
            }
            debug!("Event processor stopped");
        });
    }

    /// Narrow a notify event to a change of the target file
    fn convert_notify_event(event: &NotifyEvent, target: &Path) -> Option<FileChange> {
        let kind = ChangeKind::from_event_kind(&event.kind)?;
        event
            .paths
            .iter()
            .find(|p| p.as_path() == target)
            .map(|p| FileChange::new(p.clone(), kind))
    }

    /// Stop watching
    pub async fn stop(&mut self) -> Result<()> {
        self.cancellation_token.cancel();
        if self.watcher.take().is_some() {
            self.watched_path = None;
            match &self.gate {
                Some(gate) => info!(
                    "File watcher stopped ({} notifications accepted, {} suppressed)",
                    gate.accepted_count(),
                    gate.suppressed_count()
                ),
                None => info!("File watcher stopped"),
            }
        }
        Ok(())
    }

    /// Canonical path of the watched file, if any
    pub fn watched_path(&self) -> Option<&Path> {
        self.watched_path.as_deref()
    }

    /// Debounce gate of the active watch
    pub fn gate(&self) -> Option<Arc<DebounceGate>> {
        self.gate.clone()
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, ModifyKind};
    use notify::EventKind;
    use tempfile::TempDir;

    fn setup_test_watcher() -> (TempDir, PathBuf, FileWatcher) {
        let temp_dir = TempDir::new().expect("test setup failed");
        let file = temp_dir.path().join("watched.txt");
        std::fs::write(&file, "line1\n").expect("test setup failed");
        let config = WatcherConfig::builder().debounce_ms(50).build();
        let watcher = FileWatcher::new(config).expect("test setup failed");
        (temp_dir, file, watcher)
    }

    #[test]
    fn test_rejects_zero_queue() {
        let config = WatcherConfig::builder().max_queue_size(0).build();
        assert!(FileWatcher::new(config).is_err());
    }

    #[tokio::test]
    async fn test_watcher_initialization() {
        let (_temp_dir, _file, watcher) = setup_test_watcher();
        assert!(watcher.watched_path().is_none());
        assert!(watcher.gate().is_none());
    }

    #[tokio::test]
    async fn test_watch_file() {
        let (_temp_dir, file, mut watcher) = setup_test_watcher();
        let _rx = watcher.watch(&file).await.expect("test setup failed");

        let canonical = std::fs::canonicalize(&file).expect("test setup failed");
        assert_eq!(watcher.watched_path(), Some(canonical.as_path()));
        assert!(watcher.gate().is_some());
    }

    #[tokio::test]
    async fn test_watch_twice_fails() {
        let (_temp_dir, file, mut watcher) = setup_test_watcher();
        let _rx = watcher.watch(&file).await.expect("test setup failed");
        assert!(watcher.watch(&file).await.is_err());
    }

    #[tokio::test]
    async fn test_watch_missing_file_fails() {
        let (temp_dir, _file, mut watcher) = setup_test_watcher();
        let err = watcher
            .watch(temp_dir.path().join("missing.txt"))
            .await
            .expect_err("missing file must not be watched");
        assert!(err.is_io());
    }

    #[test]
    fn test_convert_filters_path_and_kind() {
        let target = PathBuf::from("/data/watched.txt");

        let modify = NotifyEvent::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(target.clone());
        let change = FileWatcher::convert_notify_event(&modify, &target).expect("should match");
        assert_eq!(change.kind, ChangeKind::Content);

        let sibling = NotifyEvent::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(PathBuf::from("/data/other.txt"));
        assert!(FileWatcher::convert_notify_event(&sibling, &target).is_none());

        let create =
            NotifyEvent::new(EventKind::Create(CreateKind::File)).add_path(target.clone());
        assert!(FileWatcher::convert_notify_event(&create, &target).is_none());
    }
}
