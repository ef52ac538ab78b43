use chrono::Utc;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::geo::Projector;
use crate::kml::{DescriptorStore, LookAtDescriptor};
use crate::viewer;

use super::error::SyncError;
use super::pipeline::ViewPipeline;
use super::types::{SyncState, SyncStatus, ViewportSample};

#[derive(Debug)]
struct Shared {
    status: SyncStatus,
}

impl Shared {
    fn record_written(&mut self, view: LookAtDescriptor) {
        self.status.cycles_written += 1;
        self.status.last_view = Some(view);
        self.status.last_sync_at = Some(Utc::now());
    }

    fn record_failed(&mut self, error: &SyncError) {
        self.status.cycles_failed += 1;
        self.status.last_error = Some(error.to_string());
    }
}

#[derive(Debug)]
struct WorkerHandle {
    stop_tx: oneshot::Sender<()>,
    sample_tx: watch::Sender<Option<ViewportSample>>,
    join: JoinHandle<()>,
}

/// Drives the globe viewer from map viewport notifications.
///
/// Inactive until [`activate`](Self::activate); while active every
/// [`notify`](Self::notify) replaces the pending sample, and a single worker
/// turns the newest one into a descriptor write.
pub struct SyncController {
    config: Arc<Config>,
    pipeline: ViewPipeline,
    store: DescriptorStore,
    shared: Arc<StdMutex<Shared>>,
    worker: Option<WorkerHandle>,
}

impl SyncController {
    pub fn new(config: Arc<Config>, projector: Arc<dyn Projector>) -> Self {
        let store = config.store();
        let pipeline = ViewPipeline::new(projector, config.range_model());
        let status = SyncStatus {
            state: SyncState::Inactive,
            view_path: store.view_path(),
            link_path: store.link_path(),
            cycles_written: 0,
            cycles_failed: 0,
            cycles_superseded: 0,
            last_view: None,
            last_error: None,
            last_sync_at: None,
        };

        Self {
            config,
            pipeline,
            store,
            shared: Arc::new(StdMutex::new(Shared { status })),
            worker: None,
        }
    }

    pub fn status(&self) -> SyncStatus {
        lock(&self.shared).status.clone()
    }

    pub fn is_active(&self) -> bool {
        self.worker.is_some()
    }

    pub async fn activate(&mut self, sample: Option<ViewportSample>) -> Result<SyncStatus, SyncError> {
        if self.worker.is_some() {
            return Err(SyncError::AlreadyActive);
        }

        let initial = match sample {
            Some(sample) => self.pipeline.compute(&sample).unwrap_or_else(|e| {
                log::warn!("Initial viewport could not be projected ({}), using home view", e);
                self.config.sync.home
            }),
            None => self.config.sync.home,
        };

        self.store.write_view(&initial).await?;
        if let Err(e) = self.store.write_link(&self.config.link_descriptor()).await {
            let _ = self.store.remove_view().await;
            return Err(e.into());
        }

        let link_path = self.store.link_path();
        if self.config.viewer.launch {
            if let Err(e) = viewer::launch(&self.config.viewer, &link_path) {
                log::warn!(
                    "Failed to launch globe viewer for {}: {}",
                    link_path.display(),
                    e
                );
            }
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let (sample_tx, sample_rx) = watch::channel(None);
        let join = tokio::spawn(run_sync_loop(
            self.shared.clone(),
            self.pipeline.clone(),
            self.store.clone(),
            sample_rx,
            stop_rx,
        ));
        self.worker = Some(WorkerHandle {
            stop_tx,
            sample_tx,
            join,
        });

        let mut locked = lock(&self.shared);
        locked.status.state = SyncState::Active { since: Utc::now() };
        locked.status.cycles_written = 0;
        locked.status.cycles_failed = 0;
        locked.status.cycles_superseded = 0;
        locked.status.last_error = None;
        locked.status.last_view = Some(initial);
        locked.status.last_sync_at = Some(Utc::now());

        log::info!("Sync activated, globe viewer link at {}", link_path.display());
        Ok(locked.status.clone())
    }

    /// Hand the newest viewport to the worker. A sample still waiting to be
    /// processed is replaced, never queued.
    pub fn notify(&self, sample: ViewportSample) -> Result<(), SyncError> {
        let worker = self.worker.as_ref().ok_or(SyncError::Inactive)?;
        worker.sample_tx.send_replace(Some(sample));
        Ok(())
    }

    /// Stop syncing and remove both descriptors. Does nothing when inactive.
    pub async fn deactivate(&mut self) -> Result<SyncStatus, SyncError> {
        let Some(worker) = self.worker.take() else {
            return Ok(self.status());
        };

        let _ = worker.stop_tx.send(());
        if let Err(e) = worker.join.await {
            log::error!("Sync worker ended abnormally: {}", e);
        }

        lock(&self.shared).status.state = SyncState::Inactive;

        // The link goes even if the view cannot, so the viewer stops polling.
        let view_removed = self.store.remove_view().await;
        let link_removed = self.store.remove_link().await;
        view_removed?;
        link_removed?;

        log::info!("Sync deactivated");
        Ok(self.status())
    }
}

fn lock(shared: &StdMutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn run_sync_loop(
    shared: Arc<StdMutex<Shared>>,
    pipeline: ViewPipeline,
    store: DescriptorStore,
    mut samples: watch::Receiver<Option<ViewportSample>>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    loop {
        let changed = tokio::select! {
            biased;
            _ = &mut stop_rx => break,
            changed = samples.changed() => changed,
        };
        if changed.is_err() {
            break;
        }

        let Some(sample) = *samples.borrow_and_update() else {
            continue;
        };

        let view = match pipeline.compute(&sample) {
            Ok(view) => view,
            Err(e) => {
                let err = SyncError::from(e);
                log::warn!("Skipping sync cycle: {}", err);
                lock(&shared).record_failed(&err);
                continue;
            }
        };

        if samples.has_changed().unwrap_or(false) {
            log::debug!("Sync cycle superseded by a newer viewport");
            lock(&shared).status.cycles_superseded += 1;
            continue;
        }

        match store.write_view(&view).await {
            Ok(()) => {
                log::debug!(
                    "Synced view lon={} lat={} range={} heading={} tilt={}",
                    view.longitude,
                    view.latitude,
                    view.range,
                    view.heading,
                    view.tilt
                );
                lock(&shared).record_written(view);
            }
            Err(e) => {
                let err = SyncError::from(e);
                log::warn!("Skipping sync cycle: {}", err);
                lock(&shared).record_failed(&err);
            }
        }
    }
}
