//! Delayed one-shot tasks
//!
//! Used for the captain draw that follows a team lobby filling up. Tasks are
//! never cancelled; they re-check lobby state when they run.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// A unit of deferred work
pub type ScheduledTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Trait for running a task once after a delay
pub trait DelayScheduler: Send + Sync {
    fn after(&self, delay: Duration, task: ScheduledTask);
}

/// Scheduler backed by the tokio runtime
#[derive(Debug, Default, Clone)]
pub struct TokioScheduler;

impl DelayScheduler for TokioScheduler {
    fn after(&self, delay: Duration, task: ScheduledTask) {
        debug!("Scheduling task in {:?}", delay);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
    }
}

/// Scheduler that holds tasks until told to run them (for testing)
#[derive(Default)]
pub struct ManualScheduler {
    pending: Mutex<Vec<(Duration, ScheduledTask)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks waiting to run
    pub fn pending(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or_default()
    }

    /// Delays of the waiting tasks, in submission order
    pub fn pending_delays(&self) -> Vec<Duration> {
        self.pending
            .lock()
            .map(|p| p.iter().map(|(delay, _)| *delay).collect())
            .unwrap_or_default()
    }

    /// Run every task submitted so far, in submission order.
    ///
    /// Tasks submitted while running wait for the next call.
    pub async fn run_pending(&self) -> usize {
        let tasks = match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(_) => return 0,
        };

        let count = tasks.len();
        for (_, task) in tasks {
            task.await;
        }
        count
    }
}

impl DelayScheduler for ManualScheduler {
    fn after(&self, delay: Duration, task: ScheduledTask) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.push((delay, task));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_manual_scheduler_runs_in_order() {
        let scheduler = ManualScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let log = log.clone();
            scheduler.after(
                Duration::from_secs(i),
                Box::pin(async move {
                    log.lock().unwrap().push(i);
                }),
            );
        }

        assert_eq!(scheduler.pending(), 3);
        assert_eq!(scheduler.pending_delays()[2], Duration::from_secs(2));
        assert_eq!(scheduler.run_pending().await, 3);
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_waits_for_delay() {
        let scheduler = TokioScheduler;
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = runs.clone();
        scheduler.after(
            Duration::from_secs(10),
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
