//! Snapshot persistence: the JSON state file, an in-memory store, and the
//! background writer that keeps the file in step with the tracker.

use crate::error::{TrackerError, TrackerResult};
use crate::ports::SnapshotStore;
use crate::store::StoreSnapshot;
use crate::tracker::Tracker;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Snapshot store backed by a single pretty-printed JSON file.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so a crash never leaves a half-written state file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store for the given file. Nothing is touched until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unreadable state file is moved aside to.
    pub fn quarantine_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".corrupt");
        PathBuf::from(name)
    }

    fn io_error(&self, source: std::io::Error) -> TrackerError {
        TrackerError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self) -> TrackerResult<StoreSnapshot> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No state file at {}, starting empty", self.path.display());
                return Ok(StoreSnapshot::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        match serde_json::from_slice::<StoreSnapshot>(&bytes) {
            Ok(snapshot) => {
                info!(
                    "Loaded {} mutes and {} presence records from {}",
                    snapshot.mutes.len(),
                    snapshot.presence.len(),
                    self.path.display()
                );
                Ok(snapshot)
            }
            Err(source) => {
                let quarantine = self.quarantine_path();
                if let Err(e) = tokio::fs::rename(&self.path, &quarantine).await {
                    warn!(
                        "Could not move corrupt state file {} aside: {}",
                        self.path.display(),
                        e
                    );
                } else {
                    warn!("Moved corrupt state file to {}", quarantine.display());
                }
                Err(TrackerError::CorruptSnapshot {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> TrackerResult<()> {
        let body = serde_json::to_vec_pretty(snapshot)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomically(&path, &body)).await??;

        debug!(
            "Saved {} mutes and {} presence records",
            snapshot.mutes.len(),
            snapshot.presence.len()
        );
        Ok(())
    }
}

fn write_atomically(path: &Path, body: &[u8]) -> TrackerResult<()> {
    let io_error = |source| TrackerError::Io {
        path: path.to_path_buf(),
        source,
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory).map_err(io_error)?;

    let mut staged = tempfile::NamedTempFile::new_in(directory).map_err(io_error)?;
    staged.write_all(body).map_err(io_error)?;
    staged.as_file().sync_all().map_err(io_error)?;
    staged.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}

/// Snapshot store kept in memory. Useful for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    snapshot: Option<StoreSnapshot>,
    saves: usize,
}

impl MemorySnapshotStore {
    /// Creates a store that starts with `snapshot` already saved.
    pub fn with_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryState {
                snapshot: Some(snapshot),
                saves: 0,
            })),
        }
    }

    /// The last saved snapshot.
    pub fn last_saved(&self) -> Option<StoreSnapshot> {
        self.inner.lock().snapshot.clone()
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.inner.lock().saves
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> TrackerResult<StoreSnapshot> {
        Ok(self.inner.lock().snapshot.clone().unwrap_or_default())
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> TrackerResult<()> {
        let mut state = self.inner.lock();
        state.snapshot = Some(snapshot.clone());
        state.saves += 1;
        Ok(())
    }
}

/// Background task that persists the tracker whenever its revision changes.
///
/// Bursts of mutations coalesce into one write. The snapshot is taken after
/// the change notification is consumed, so every write reflects at least the
/// mutation that triggered it and writes never go backwards in time.
pub struct SnapshotWriter {
    tracker: Tracker,
    store: Arc<dyn SnapshotStore>,
    revisions: watch::Receiver<u64>,
}

impl SnapshotWriter {
    /// Creates a writer for `tracker` that saves into `store`.
    pub fn new(tracker: Tracker, store: Arc<dyn SnapshotStore>) -> Self {
        let revisions = tracker.subscribe_revisions();
        Self {
            tracker,
            store,
            revisions,
        }
    }

    /// Saves on every change until `shutdown` fires, then saves once more.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!("Snapshot writer started");

        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                changed = self.revisions.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
            self.flush().await;
        }

        if self.flush().await {
            info!("Final snapshot flushed");
        }
    }

    /// Persists the current state. Failures are logged and reported as `false`.
    pub async fn flush(&mut self) -> bool {
        let revision = *self.revisions.borrow_and_update();
        let snapshot = self.tracker.snapshot();

        match self.store.save(&snapshot).await {
            Ok(()) => {
                debug!("Persisted revision {}", revision);
                true
            }
            Err(e) => {
                error!("Failed to persist revision {}: {}", revision, e);
                false
            }
        }
    }
}
