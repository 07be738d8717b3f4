//! A pool of worker threads slicing models off the main thread.

use crate::math::{Isometry, Point, Real, Vector};
use crate::mesh::{ModelTransform, SharedModel};
use crate::shape::{ColliderType, Plane};
use crate::slicing::{SliceError, SliceOptions, SliceOutput, Slicer};
use async_channel::{Receiver, Sender, TryRecvError};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Errors returned by the [`SliceTaskManager`].
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum SliceTaskError {
    /// The manager was not initialized, or was already finalized.
    #[error("the slice task manager is not running.")]
    NotRunning,
    /// `initialize` was called on a running manager.
    #[error("the slice task manager is already running.")]
    AlreadyRunning,
    /// A worker thread could not be spawned.
    #[error("failed to spawn a slicing worker: {0}")]
    SpawnFailed(String),
}

/// Configuration of the [`SliceTaskManager`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct SliceTaskManagerConfig {
    /// The number of worker threads. Zero is treated as one.
    pub worker_count: usize,
    /// The options of the slicer run by the workers.
    pub slice_options: SliceOptions,
    /// The workers are named `"{thread_name}-{index}"`.
    pub thread_name: String,
}

impl Default for SliceTaskManagerConfig {
    fn default() -> Self {
        SliceTaskManagerConfig {
            worker_count: 2,
            slice_options: SliceOptions::default(),
            thread_name: "cleave3d-slicer".to_string(),
        }
    }
}

/// The physical state of the body being sliced, captured when the request is made.
///
/// The result carries it back so that the fragments can be built without looking
/// at the (possibly modified) original object.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BodySnapshot {
    /// The world-space pose of the body.
    pub position: Isometry<Real>,
    /// The linear velocity of the body.
    pub linvel: Vector<Real>,
    /// The angular velocity of the body.
    pub angvel: Vector<Real>,
    /// The world-space center of mass of the body.
    pub center_of_mass: Point<Real>,
    /// The mass of the body.
    pub mass: Real,
    /// The world-space volume of the body.
    pub volume: Real,
    /// The world-space volume of the object this body was cut from.
    pub root_volume: Real,
    /// The type of collider used by the body.
    pub collider_type: ColliderType,
}

/// A request to slice a model along a world-space plane.
#[derive(Clone, Debug)]
pub struct SliceRequest {
    /// The model to slice. It is kept alive until the result is dropped.
    pub model: SharedModel,
    /// The placement of the model in the world.
    pub transform: ModelTransform,
    /// The world-space cutting plane.
    pub plane: Plane,
    /// The state of the body being sliced.
    pub body: BodySnapshot,
}

/// The outcome of a [`SliceRequest`].
#[derive(Clone, Debug)]
pub struct SliceResult {
    /// The id returned by [`SliceTaskManager::enqueue_slice`].
    pub request_id: u64,
    /// The model that was sliced.
    pub original_model: SharedModel,
    /// The placement of the original model.
    pub transform: ModelTransform,
    /// The world-space cutting plane.
    pub plane: Plane,
    /// The state of the body that was sliced.
    pub body: BodySnapshot,
    /// The two halves of the model, in its local space.
    pub output: Result<SliceOutput, SliceError>,
}

impl SliceResult {
    /// Did the slice produce two halves?
    pub fn success(&self) -> bool {
        self.output.is_ok()
    }
}

struct SliceJob {
    id: u64,
    request: SliceRequest,
}

struct SharedState {
    terminate: AtomicBool,
    pending: AtomicUsize,
}

/// A fixed-size pool of worker threads executing slice requests.
///
/// Both [`enqueue_slice`](Self::enqueue_slice) and
/// [`try_get_completed_result`](Self::try_get_completed_result) never block.
/// Results are published in completion order: use `request_id` to match them
/// with their requests.
pub struct SliceTaskManager {
    config: SliceTaskManagerConfig,
    job_tx: Option<Sender<SliceJob>>,
    result_rx: Option<Receiver<SliceResult>>,
    workers: Vec<JoinHandle<()>>,
    shared: Arc<SharedState>,
    next_id: AtomicU64,
}

impl Default for SliceTaskManager {
    fn default() -> Self {
        Self::new(SliceTaskManagerConfig::default())
    }
}

impl SliceTaskManager {
    /// Creates a manager. No thread is started until [`initialize`](Self::initialize).
    pub fn new(config: SliceTaskManagerConfig) -> Self {
        SliceTaskManager {
            config,
            job_tx: None,
            result_rx: None,
            workers: Vec::new(),
            shared: Arc::new(SharedState {
                terminate: AtomicBool::new(false),
                pending: AtomicUsize::new(0),
            }),
            next_id: AtomicU64::new(1),
        }
    }

    /// Creates a manager and starts its workers.
    pub fn start(config: SliceTaskManagerConfig) -> Result<Self, SliceTaskError> {
        let mut manager = Self::new(config);
        manager.initialize()?;
        Ok(manager)
    }

    /// The configuration of this manager.
    pub fn config(&self) -> &SliceTaskManagerConfig {
        &self.config
    }

    /// Are the workers running?
    pub fn is_running(&self) -> bool {
        self.job_tx.is_some()
    }

    /// The number of worker threads currently running.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Spawns the worker threads.
    pub fn initialize(&mut self) -> Result<(), SliceTaskError> {
        if self.is_running() {
            return Err(SliceTaskError::AlreadyRunning);
        }

        let (job_tx, job_rx) = async_channel::unbounded::<SliceJob>();
        let (result_tx, result_rx) = async_channel::unbounded::<SliceResult>();
        self.shared = Arc::new(SharedState {
            terminate: AtomicBool::new(false),
            pending: AtomicUsize::new(0),
        });

        let worker_count = self.config.worker_count.max(1);
        for i in 0..worker_count {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let shared = self.shared.clone();
            let slicer = Slicer::new(self.config.slice_options);

            let spawned = thread::Builder::new()
                .name(format!("{}-{}", self.config.thread_name, i))
                .spawn(move || worker_loop(slicer, job_rx, result_tx, shared));

            match spawned {
                Ok(handle) => self.workers.push(handle),
                Err(e) => {
                    let _ = job_tx.close();
                    self.shared.terminate.store(true, Ordering::Release);
                    self.join_workers();
                    return Err(SliceTaskError::SpawnFailed(e.to_string()));
                }
            }
        }

        self.job_tx = Some(job_tx);
        self.result_rx = Some(result_rx);
        log::info!("slice task manager started with {} worker(s)", worker_count);
        Ok(())
    }

    /// Stops and joins all the workers.
    ///
    /// Requests still queued are dropped. Results already published remain
    /// available through [`try_get_completed_result`](Self::try_get_completed_result).
    /// Calling this on a manager that is not running does nothing.
    pub fn finalize(&mut self) {
        let job_tx = match self.job_tx.take() {
            Some(tx) => tx,
            None => return,
        };

        self.shared.terminate.store(true, Ordering::Release);
        // Wakes up every idle worker.
        let _ = job_tx.close();
        self.join_workers();
        self.shared.pending.store(0, Ordering::Release);
        log::info!("slice task manager stopped");
    }

    fn join_workers(&mut self) {
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::error!("a slicing worker panicked outside of a slice");
            }
        }
    }

    /// Queues a request and returns its id immediately.
    ///
    /// Ids are strictly increasing, starting at 1.
    pub fn enqueue_slice(&self, request: SliceRequest) -> Result<u64, SliceTaskError> {
        let job_tx = self.job_tx.as_ref().ok_or(SliceTaskError::NotRunning)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let _ = self.shared.pending.fetch_add(1, Ordering::AcqRel);
        if job_tx.try_send(SliceJob { id, request }).is_err() {
            let _ = self.shared.pending.fetch_sub(1, Ordering::AcqRel);
            return Err(SliceTaskError::NotRunning);
        }

        Ok(id)
    }

    /// Pops one completed result, if any.
    pub fn try_get_completed_result(&self) -> Option<SliceResult> {
        let result_rx = self.result_rx.as_ref()?;
        match result_rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => None,
        }
    }

    /// Pops all the completed results.
    pub fn drain_completed_results(&self) -> Vec<SliceResult> {
        core::iter::from_fn(|| self.try_get_completed_result()).collect()
    }

    /// The number of requests queued or being processed.
    pub fn pending_task_count(&self) -> usize {
        self.shared.pending.load(Ordering::Acquire)
    }
}

impl Drop for SliceTaskManager {
    fn drop(&mut self) {
        self.finalize();
    }
}

fn worker_loop(
    slicer: Slicer,
    job_rx: Receiver<SliceJob>,
    result_tx: Sender<SliceResult>,
    shared: Arc<SharedState>,
) {
    while let Ok(job) = job_rx.recv_blocking() {
        if shared.terminate.load(Ordering::Acquire) {
            break;
        }

        let SliceJob { id, request } = job;
        let output = panic::catch_unwind(AssertUnwindSafe(|| {
            slicer.slice_world(&request.model, &request.transform, &request.plane)
        }))
        .unwrap_or_else(|_| {
            log::error!("slice request {} panicked", id);
            Err(SliceError::Panicked)
        });

        if let Err(e) = &output {
            log::warn!("slice request {} failed: {}", id, e);
        }

        let result = SliceResult {
            request_id: id,
            original_model: request.model,
            transform: request.transform,
            plane: request.plane,
            body: request.body,
            output,
        };

        // Publish before decrementing so that a zero pending count means every
        // result can be drained.
        let _ = result_tx.try_send(result);
        let _ = shared.pending.fetch_sub(1, Ordering::AcqRel);
    }
}
