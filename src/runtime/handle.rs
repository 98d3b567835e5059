//! Runtime handle - serialized access to an [`ActionRuntime`] from async code
//!
//! The runtime itself is synchronous and expects its caller to serialize calls. The
//! handle moves it into a single tokio task; every [`RuntimeClient::call`] is queued and
//! executed there one after another, so any number of tasks can share the runtime.
//!
//! # State Machine
//!
//! ```text
//! Starting ──► Serving ──► Stopped
//!                 │            ▲
//!                 └────────────┘
//!        (shutdown signal or all clients dropped)
//! ```

use super::ActionRuntime;
use statum::{machine, state};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

type Job = Box<dyn FnOnce(&mut ActionRuntime) + Send>;

#[derive(Debug, thiserror::Error)]
pub enum HandleError {
    /// The worker task is no longer accepting calls
    #[error("Runtime worker stopped")]
    WorkerStopped,

    #[error("Runtime worker panicked: {0}")]
    WorkerPanicked(String),
}

/// Lifecycle of the worker owning the runtime
#[state]
#[derive(Debug, Clone)]
pub enum WorkerState {
    Starting,
    Serving,
    Stopped,
}

#[machine]
pub struct RuntimeWorker<S: WorkerState> {
    runtime: ActionRuntime,
    jobs: mpsc::Receiver<Job>,
    served: u64,
}

impl RuntimeWorker<Starting> {
    pub fn create(runtime: ActionRuntime, jobs: mpsc::Receiver<Job>) -> Self {
        Self::new(runtime, jobs, 0)
    }

    pub fn start(self) -> RuntimeWorker<Serving> {
        info!("Runtime worker serving");
        self.transition()
    }
}

impl RuntimeWorker<Serving> {
    /// Executes queued calls until a shutdown signal arrives or every client is gone
    pub async fn run_until_shutdown(
        mut self,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) -> RuntimeWorker<Stopped> {
        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Shutdown signal received for runtime worker");
                    break;
                }

                job = self.jobs.recv() => match job {
                    Some(job) => {
                        job(&mut self.runtime);
                        self.served += 1;
                    }
                    None => {
                        debug!("All runtime clients dropped");
                        break;
                    }
                }
            }
        }

        // Calls already queued still get their answer
        self.jobs.close();
        while let Ok(job) = self.jobs.try_recv() {
            job(&mut self.runtime);
            self.served += 1;
        }

        info!("Runtime worker stopping after {} calls", self.served);
        self.transition()
    }
}

impl RuntimeWorker<Stopped> {
    pub fn into_runtime(self) -> ActionRuntime {
        self.runtime
    }
}

/// Cloneable sender side of the runtime worker
#[derive(Clone, Debug)]
pub struct RuntimeClient {
    sender: mpsc::Sender<Job>,
}

impl RuntimeClient {
    /// Runs `f` on the runtime and returns its result
    pub async fn call<R, F>(&self, f: F) -> Result<R, HandleError>
    where
        F: FnOnce(&mut ActionRuntime) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job: Job = Box::new(move |runtime| {
            if reply_tx.send(f(runtime)).is_err() {
                debug!("Runtime caller went away before the reply");
            }
        });

        self.sender
            .send(job)
            .await
            .map_err(|_| HandleError::WorkerStopped)?;
        reply_rx.await.map_err(|_| HandleError::WorkerStopped)
    }
}

/// Owns the worker task
#[derive(Debug)]
pub struct RuntimeHandle {
    client: RuntimeClient,
    task_handle: Option<JoinHandle<ActionRuntime>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl RuntimeHandle {
    /// Moves `runtime` into a new tokio task; must be called inside a tokio runtime
    pub fn spawn(runtime: ActionRuntime) -> Self {
        let (sender, receiver) = mpsc::channel(64);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let worker = RuntimeWorker::create(runtime, receiver).start();

        let task_handle = tokio::spawn(async move {
            worker.run_until_shutdown(shutdown_rx).await.into_runtime()
        });

        Self {
            client: RuntimeClient { sender },
            task_handle: Some(task_handle),
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn client(&self) -> RuntimeClient {
        self.client.clone()
    }

    /// Stops the worker and hands the runtime back
    pub async fn shutdown(mut self) -> Result<ActionRuntime, HandleError> {
        if let Some(tx) = self.shutdown_tx.take() {
            if tx.send(()).is_err() {
                warn!("Runtime worker already terminated");
            }
        }

        let handle = self.task_handle.take().ok_or(HandleError::WorkerStopped)?;
        handle.await.map_err(|e| {
            error!("Runtime worker panicked: {}", e);
            HandleError::WorkerPanicked(e.to_string())
        })
    }
}
