//! Routed execution runtime.
//!
//! The [`FusionEngine`](crate::engine::FusionEngine) itself is a synchronous,
//! pure computation. This module provides the call-per-request boundary for
//! callers that fuse many unrelated observation groups concurrently: a
//! small, bounded, thread-based runtime that routes requests into separate
//! worker pools.
//!
//! The split exists because the external-model strategy is the one place
//! where per-call cost is unbounded. Deterministic strategies run on the
//! `direct` pool; `external_model` requests run on the `model` pool, so a
//! slow model cannot starve deterministic fusion.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::engine::{FusionEngine, FusionOutcome};
use crate::error::{ExecutionError, FusorError, FusorResult};
use crate::protocol::FuseRequest;
use crate::strategy::StrategyId;

/// Execution path selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionPath {
    /// Deterministic strategies: fast, bounded, CPU-only.
    Direct,
    /// External-model strategy: per-call cost unbounded.
    Model,
}

impl ExecutionPath {
    fn label(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Model => "model",
        }
    }
}

/// Routes requests to an execution path.
pub trait StrategyRouter: Send + Sync {
    /// Selects the execution path for the given request.
    fn route(&self, request: &FuseRequest) -> ExecutionPath;
}

/// Default router.
///
/// Policy: `external_model` is Model; every other strategy (and the engine
/// default applied when none is named) is Direct.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultRouter;

impl StrategyRouter for DefaultRouter {
    fn route(&self, request: &FuseRequest) -> ExecutionPath {
        match request.strategy {
            Some(StrategyId::ExternalModel) => ExecutionPath::Model,
            _ => ExecutionPath::Direct,
        }
    }
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct FusionRuntimeConfig {
    /// Number of direct-path workers.
    pub direct_workers: usize,
    /// Number of model-path workers.
    pub model_workers: usize,
    /// Maximum queued requests per pool.
    pub queue_capacity: usize,
}

impl Default for FusionRuntimeConfig {
    fn default() -> Self {
        Self {
            direct_workers: 2,
            model_workers: 1,
            queue_capacity: 1024,
        }
    }
}

struct Job {
    request: FuseRequest,
    reply: Sender<FusorResult<FusionOutcome>>,
}

struct WorkerPool {
    tx: Sender<Job>,
    workers: Vec<JoinHandle<()>>,
    queue_capacity: usize,
}

impl WorkerPool {
    fn start(
        name: &'static str,
        workers: usize,
        queue_capacity: usize,
        engine: Arc<FusionEngine>,
    ) -> Self {
        let workers = workers.max(1);
        let queue_capacity = queue_capacity.max(1);
        let (tx, rx) = bounded::<Job>(queue_capacity);

        let mut handles = Vec::with_capacity(workers);
        for idx in 0..workers {
            let rx: Receiver<Job> = rx.clone();
            let engine = Arc::clone(&engine);
            let thread_name = format!("fusor-{name}-{idx}");
            let handle = thread::Builder::new()
                .name(thread_name)
                .spawn(move || {
                    while let Ok(Job { request, reply }) = rx.recv() {
                        let result = engine.fuse(request);
                        let _ = reply.send(result);
                    }
                })
                .expect("failed to spawn fusor worker");
            handles.push(handle);
        }

        Self {
            tx,
            workers: handles,
            queue_capacity,
        }
    }

    fn try_submit(&self, job: Job, path: ExecutionPath) -> Result<(), FusorError> {
        match self.tx.try_send(job) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(FusorError::Execution(ExecutionError::QueueFull {
                path: path.label().to_string(),
                capacity: self.queue_capacity,
            })),
            Err(TrySendError::Disconnected(_)) => {
                Err(FusorError::Execution(ExecutionError::Disconnected {
                    path: path.label().to_string(),
                }))
            }
        }
    }

    fn shutdown(self) {
        // Close the channel: workers will drain queued jobs then exit.
        drop(self.tx);
        for handle in self.workers {
            let _ = handle.join();
        }
    }
}

/// Handle returned by [`FusionRuntime::fuse_async`].
pub struct ExecutionHandle {
    path: ExecutionPath,
    rx: Receiver<FusorResult<FusionOutcome>>,
}

impl ExecutionHandle {
    /// Returns the path selected by the router.
    #[must_use]
    pub const fn path(&self) -> ExecutionPath {
        self.path
    }

    /// Waits for the fusion call to complete.
    ///
    /// # Errors
    ///
    /// [`ExecutionError::Disconnected`] if the worker dropped the reply
    /// channel without answering, plus any error the engine returned.
    pub fn join(self) -> FusorResult<FusionOutcome> {
        let path = self.path.label().to_string();
        self.rx
            .recv()
            .map_err(|_| FusorError::Execution(ExecutionError::Disconnected { path }))?
    }

    /// Waits for the fusion call to complete with a timeout.
    ///
    /// A timed-out call is simply abandoned: the engine performs no partial
    /// work that would need rollback.
    ///
    /// # Errors
    ///
    /// [`ExecutionError::Timeout`] on expiry, [`ExecutionError::Disconnected`]
    /// if the worker vanished, plus any error the engine returned.
    pub fn join_timeout(self, timeout: Duration) -> FusorResult<FusionOutcome> {
        let path = self.path.label().to_string();
        self.rx.recv_timeout(timeout).map_err(|err| match err {
            crossbeam_channel::RecvTimeoutError::Timeout => {
                FusorError::Execution(ExecutionError::Timeout {
                    duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                })
            }
            crossbeam_channel::RecvTimeoutError::Disconnected => {
                FusorError::Execution(ExecutionError::Disconnected { path })
            }
        })?
    }
}

/// A routed runtime enforcing direct/model pool isolation.
pub struct FusionRuntime<R: StrategyRouter = DefaultRouter> {
    router: R,
    engine: Arc<FusionEngine>,
    direct: WorkerPool,
    model: WorkerPool,
}

impl FusionRuntime<DefaultRouter> {
    /// Creates a runtime with the default router.
    #[must_use]
    pub fn new(engine: FusionEngine, config: FusionRuntimeConfig) -> Self {
        Self::with_router(engine, DefaultRouter, config)
    }
}

impl<R: StrategyRouter> FusionRuntime<R> {
    /// Creates a runtime with a custom router.
    pub fn with_router(engine: FusionEngine, router: R, config: FusionRuntimeConfig) -> Self {
        let engine = Arc::new(engine);
        let direct = WorkerPool::start(
            "direct",
            config.direct_workers,
            config.queue_capacity,
            Arc::clone(&engine),
        );
        let model = WorkerPool::start(
            "model",
            config.model_workers,
            config.queue_capacity,
            Arc::clone(&engine),
        );
        Self {
            router,
            engine,
            direct,
            model,
        }
    }

    /// Submits a request to the routed pool without waiting.
    ///
    /// # Errors
    ///
    /// [`ExecutionError::QueueFull`] when the routed pool's queue is at
    /// capacity (callers retry or shed load; nothing is buffered beyond the
    /// bounded queue), [`ExecutionError::Disconnected`] when the pool is
    /// gone.
    pub fn fuse_async(&self, request: FuseRequest) -> Result<ExecutionHandle, FusorError> {
        let path = self.router.route(&request);
        let (tx, rx) = bounded::<FusorResult<FusionOutcome>>(1);
        let job = Job { request, reply: tx };
        match path {
            ExecutionPath::Direct => self.direct.try_submit(job, path)?,
            ExecutionPath::Model => self.model.try_submit(job, path)?,
        }
        Ok(ExecutionHandle { path, rx })
    }

    /// Submits a request and waits for the outcome.
    ///
    /// # Errors
    ///
    /// Everything [`FusionRuntime::fuse_async`] and
    /// [`ExecutionHandle::join`] can fail with.
    pub fn fuse(&self, request: FuseRequest) -> FusorResult<FusionOutcome> {
        self.fuse_async(request)?.join()
    }

    /// Returns a shared reference to the underlying engine.
    #[must_use]
    pub fn engine(&self) -> &FusionEngine {
        &self.engine
    }
}

impl<R: StrategyRouter> Drop for FusionRuntime<R> {
    fn drop(&mut self) {
        // Deterministic shutdown: stop workers and join threads.
        // This should be fast because worker loops are blocking on `recv()`.
        let direct = std::mem::replace(
            &mut self.direct,
            WorkerPool {
                tx: bounded::<Job>(1).0,
                workers: Vec::new(),
                queue_capacity: 1,
            },
        );
        let model = std::mem::replace(
            &mut self.model,
            WorkerPool {
                tx: bounded::<Job>(1).0,
                workers: Vec::new(),
                queue_capacity: 1,
            },
        );

        direct.shutdown();
        model.shutdown();
    }
}
