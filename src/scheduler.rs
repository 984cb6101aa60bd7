//! worker pools for blocking http calls
//!
//! a [`Scheduler`] takes a blocking task and runs it somewhere other than the
//! caller's thread. [`TokioScheduler`] is the default and uses tokio's bounded
//! blocking pool; [`RayonScheduler`] runs tasks on a rayon thread pool.

use crate::error::{Error, Result};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::runtime::Handle;

/// unit of blocking work handed to a scheduler
pub type BlockingTask = Box<dyn FnOnce() + Send + 'static>;

/// executor for blocking work
pub trait Scheduler: Send + Sync + 'static {
    /// queue a task; an error means the task was dropped without running
    fn schedule(&self, task: BlockingTask) -> Result<()>;
}

/// scheduler backed by tokio's blocking thread pool
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler {
    handle: Option<Handle>,
}

impl TokioScheduler {
    /// pin the scheduler to a specific runtime
    ///
    /// without a handle, tasks go to whatever runtime is current when
    /// they are scheduled.
    pub fn new(handle: Handle) -> Self {
        Self {
            handle: Some(handle),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, task: BlockingTask) -> Result<()> {
        let handle = match &self.handle {
            Some(handle) => handle.clone(),
            None => Handle::try_current()
                .map_err(|err| Error::Scheduler(format!("no tokio runtime available: {err}")))?,
        };
        // detached; the task reports through its own channel
        drop(handle.spawn_blocking(task));
        Ok(())
    }
}

/// scheduler backed by a rayon thread pool
#[derive(Clone)]
pub struct RayonScheduler {
    pool: Arc<ThreadPool>,
}

impl RayonScheduler {
    /// build a dedicated pool with `num_threads` workers
    pub fn new(num_threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|index| format!("graphql-http-{index}"))
            .panic_handler(|_| tracing::error!("graphql http worker panicked"))
            .build()
            .map_err(|err| Error::Scheduler(format!("failed to build thread pool: {err}")))?;
        Ok(Self::from_pool(Arc::new(pool)))
    }

    /// share an existing pool
    pub fn from_pool(pool: Arc<ThreadPool>) -> Self {
        Self { pool }
    }

    /// number of worker threads
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl Scheduler for RayonScheduler {
    fn schedule(&self, task: BlockingTask) -> Result<()> {
        // rayon aborts on an unhandled panic unless the pool has a handler
        self.pool.spawn(move || {
            if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
                tracing::error!("blocking task panicked on rayon pool");
            }
        });
        Ok(())
    }
}

impl fmt::Debug for RayonScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RayonScheduler")
            .field("num_threads", &self.pool.current_num_threads())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_tokio_scheduler_without_runtime() {
        let err = TokioScheduler::default()
            .schedule(Box::new(|| {}))
            .unwrap_err();
        assert!(matches!(err, Error::Scheduler(_)));
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn test_tokio_scheduler_with_handle() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let scheduler = TokioScheduler::new(runtime.handle().clone());
        let (tx, rx) = mpsc::channel();

        scheduler
            .schedule(Box::new(move || {
                tx.send(std::thread::current().id()).unwrap();
            }))
            .unwrap();

        let worker = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_ne!(worker, std::thread::current().id());
    }

    #[cfg_attr(miri, ignore)]
    #[tokio::test]
    async fn test_tokio_scheduler_uses_ambient_runtime() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        TokioScheduler::default()
            .schedule(Box::new(move || {
                tx.send(7).unwrap();
            }))
            .unwrap();
        assert_eq!(rx.await.unwrap(), 7);
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn test_rayon_scheduler_runs_on_pool_thread() {
        let scheduler = RayonScheduler::new(2).unwrap();
        assert_eq!(scheduler.num_threads(), 2);

        let (tx, rx) = mpsc::channel();
        scheduler
            .schedule(Box::new(move || {
                let name = std::thread::current().name().map(str::to_string);
                tx.send(name).unwrap();
            }))
            .unwrap();

        let name = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
        assert!(name.starts_with("graphql-http-"));
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn test_rayon_scheduler_survives_task_panic() {
        let pool = ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let scheduler = RayonScheduler::from_pool(Arc::new(pool));

        let (tx, rx) = mpsc::channel::<()>();
        scheduler
            .schedule(Box::new(move || {
                let _tx = tx;
                panic!("worker blew up");
            }))
            .unwrap();
        // sender dropped while unwinding
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_err());

        let (tx, rx) = mpsc::channel();
        scheduler
            .schedule(Box::new(move || {
                tx.send(1).unwrap();
            }))
            .unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 1);
    }

    #[test]
    fn test_rayon_scheduler_debug() {
        let scheduler = RayonScheduler::new(1).unwrap();
        assert!(format!("{scheduler:?}").contains("num_threads: 1"));
    }
}
