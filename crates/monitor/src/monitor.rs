//! Monitor lifecycle
//!
//! [`Monitor`] owns the chunk store and the components that share it. It is
//! constructed once with the file's initial content, shared through `Arc`
//! with the detection and report tasks, and stopped with [`Monitor::shutdown`].

use crate::detector::{ChangeDetector, DetectionSummary};
use crate::report::{ReportGenerator, ReportOutcome};
use crate::sink::ReportSink;
use crate::store::ChunkStore;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use txtmon_core::error::{Error, Result};
use txtmon_core::Config;
use txtmon_watcher::{FileChange, FileWatcher, WatcherConfig};

/// Change-detection engine for a single file
pub struct Monitor {
    file_path: PathBuf,
    config: Config,
    store: Arc<ChunkStore>,
    detector: ChangeDetector,
    /// Serializes report passes
    reporter: Mutex<ReportGenerator>,
    watcher: Mutex<Option<FileWatcher>>,
    /// Detection passes triggered by accepted notifications
    triggered_detections: AtomicU64,
    cancellation_token: CancellationToken,
}

impl Monitor {
    /// Build the monitor and load the initial content as baseline
    ///
    /// No chunk is flagged by the initial load.
    pub fn initialize(
        file_path: impl Into<PathBuf>,
        log_path: impl Into<PathBuf>,
        initial_content: &[u8],
        config: Config,
        console: Arc<dyn ReportSink>,
    ) -> Result<Arc<Self>> {
        config.validate()?;

        let file_path = file_path.into();
        let store = Arc::new(ChunkStore::new());
        let detector = ChangeDetector::new(Arc::clone(&store), config.monitor.chunk_size)?;
        let reporter = ReportGenerator::new(Arc::clone(&store), log_path.into(), console);

        let summary = detector.load_initial(initial_content);
        info!(
            "Monitoring {:?}: {} bytes in {} chunks",
            file_path,
            initial_content.len(),
            summary.windows
        );

        Ok(Arc::new(Self {
            file_path,
            config,
            store,
            detector,
            reporter: Mutex::new(reporter),
            watcher: Mutex::new(None),
            triggered_detections: AtomicU64::new(0),
            cancellation_token: CancellationToken::new(),
        }))
    }

    /// Start watching the monitored file
    ///
    /// Accepted notifications are consumed by one task, so detection passes
    /// run one at a time in acceptance order.
    pub async fn start_watching(self: &Arc<Self>) -> Result<()> {
        let mut slot = self.watcher.lock().await;
        if slot.is_some() {
            return Err(Error::watcher("Monitor is already watching"));
        }

        let mut watcher = FileWatcher::new(WatcherConfig::from(&self.config.watcher))?;
        let events = watcher.watch(&self.file_path).await?;
        debug!("Detection bound to {:?}", watcher.watched_path());
        *slot = Some(watcher);

        self.spawn_detection_loop(events);
        Ok(())
    }

    fn spawn_detection_loop(self: &Arc<Self>, mut events: mpsc::Receiver<FileChange>) {
        let monitor = Arc::clone(self);
        let cancel = self.cancellation_token.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    change = events.recv() => {
                        let Some(change) = change else { break };
                        debug!("Running detection for {:?} ({:?})", change.path, change.kind);
                        monitor.triggered_detections.fetch_add(1, Ordering::Relaxed);
                        if let Err(e) = monitor.detect().await {
                            error!("Error processing file change: {}", e);
                        }
                    }
                }
            }
            debug!("Detection loop stopped");
        });
    }

    /// Start the periodic report task
    ///
    /// The first report runs one interval after start. A pass that outlasts
    /// the interval makes the loop skip ticks instead of overlapping.
    pub fn start_reporting(self: &Arc<Self>) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        let cancel = self.cancellation_token.clone();
        let period = self.report_interval();

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = monitor.report().await {
                            warn!("Error writing report: {}", e);
                        }
                    }
                }
            }
            debug!("Report loop stopped");
        })
    }

    /// Run one detection pass now
    pub async fn detect(&self) -> Result<DetectionSummary> {
        self.detector.detect(&self.file_path).await
    }

    /// Run one report pass now
    pub async fn report(&self) -> Result<ReportOutcome> {
        let reporter = self.reporter.lock().await;
        reporter.report().await
    }

    /// Whether any chunk changed since the last report
    pub fn has_pending_changes(&self) -> bool {
        self.store.has_any_changed()
    }

    /// Stop background tasks and the file watcher
    ///
    /// In-flight detection or report passes are abandoned.
    pub async fn shutdown(&self) {
        self.cancellation_token.cancel();
        if let Some(mut watcher) = self.watcher.lock().await.take() {
            if let Err(e) = watcher.stop().await {
                warn!("Failed to stop watcher: {}", e);
            }
        }
        info!("Monitor stopped");
    }

    /// Number of detection passes triggered by the watcher so far
    pub fn triggered_detections(&self) -> u64 {
        self.triggered_detections.load(Ordering::Relaxed)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    pub fn report_interval(&self) -> Duration {
        self.config.monitor.report_interval()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use tempfile::TempDir;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.monitor.chunk_size = 16;
        config.monitor.report_interval_ms = 50;
        config.watcher.debounce_ms = 20;
        config
    }

    #[tokio::test]
    async fn test_initialize_sets_baseline() {
        let dir = TempDir::new().expect("test setup failed");
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "0123456789abcdefXYZ").expect("write");

        let monitor = Monitor::initialize(
            &file,
            dir.path().join("report.log"),
            b"0123456789abcdefXYZ",
            small_config(),
            Arc::new(MemorySink::new()),
        )
        .expect("initialize");

        assert_eq!(monitor.store().len(), 2);
        assert!(!monitor.has_pending_changes());
    }

    #[test]
    fn test_initialize_rejects_invalid_config() {
        let mut config = small_config();
        config.monitor.chunk_size = 0;
        let result = Monitor::initialize(
            "notes.txt",
            "report.log",
            b"",
            config,
            Arc::new(MemorySink::new()),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_detect_then_report() {
        let dir = TempDir::new().expect("test setup failed");
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "a\nb\n").expect("write");
        let sink = Arc::new(MemorySink::new());

        let monitor = Monitor::initialize(
            &file,
            dir.path().join("report.log"),
            b"a\nb\n",
            small_config(),
            sink.clone(),
        )
        .expect("initialize");

        std::fs::write(&file, "a\nc\n").expect("write");
        let summary = monitor.detect().await.expect("detect");
        assert_eq!(summary.changed, 1);
        assert!(monitor.has_pending_changes());

        let outcome = monitor.report().await.expect("report");
        assert_eq!((outcome.deleted, outcome.inserted), (1, 1));
        assert!(!monitor.has_pending_changes());
    }

    #[tokio::test]
    async fn test_start_watching_twice_fails() {
        let dir = TempDir::new().expect("test setup failed");
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "x").expect("write");

        let monitor = Monitor::initialize(
            &file,
            dir.path().join("report.log"),
            b"x",
            small_config(),
            Arc::new(MemorySink::new()),
        )
        .expect("initialize");

        monitor.start_watching().await.expect("first watch");
        assert!(monitor.start_watching().await.is_err());
        monitor.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reporting_runs_on_interval() {
        let dir = TempDir::new().expect("test setup failed");
        let sink = Arc::new(MemorySink::new());
        let monitor = Monitor::initialize(
            dir.path().join("notes.txt"),
            dir.path().join("report.log"),
            b"steady\n",
            small_config(),
            sink.clone(),
        )
        .expect("initialize");

        let handle = monitor.start_reporting();

        // Paused clock auto-advances while the runtime is idle
        tokio::time::sleep(Duration::from_millis(175)).await;
        monitor.shutdown().await;
        handle.await.expect("report task");

        assert_eq!(sink.contents().matches("No changes detected.").count(), 3);
    }
}
